//! Video references extracted from YouTube URLs.
//!
//! Two URL shapes are understood:
//!
//! - watch pages, `https://www.youtube.com/watch?v=<id>&t=<offset>`
//! - short links, `https://youtu.be/<id>` (optionally `?t=<offset>`)
//!
//! For short links the path segment is always the video id. Their query
//! string only contributes the other parameters, and a `v=` in it is ignored.
//! In a query, a bare token without `=` is taken as the value of `v`.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::EmbedError;

/// The (id, start offset) pair identifying a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRef {
    pub id: String,
    /// Start offset in whole seconds.
    pub start: Option<String>,
}

impl VideoRef {
    pub fn new(id: impl Into<String>) -> Self {
        VideoRef {
            id: id.into(),
            start: None,
        }
    }

    pub fn with_start(mut self, seconds: u64) -> Self {
        self.start = Some(seconds.to_string());
        self
    }

    /// Parse a watch or short URL.
    ///
    /// An unusable `t` parameter is reported as [`EmbedError::InvalidStart`].
    /// Use [`VideoRef::from_url_lenient`] to keep the reference and drop the
    /// offset instead.
    pub fn from_url(url: &str) -> Result<Self, EmbedError> {
        let parsed = ParsedUrl::parse(url)?;
        let start = match parsed.t {
            Some(t) => Some(parse_start(t)?.to_string()),
            None => None,
        };
        Ok(VideoRef {
            id: parsed.id.to_string(),
            start,
        })
    }

    /// Parse a URL, dropping an unusable start offset.
    ///
    /// Returns the reference and, if the offset was dropped, the error that
    /// caused it.
    pub fn from_url_lenient(url: &str) -> Result<(Self, Option<EmbedError>), EmbedError> {
        let parsed = ParsedUrl::parse(url)?;
        let mut video = VideoRef::new(parsed.id);
        let mut dropped = None;
        if let Some(t) = parsed.t {
            match parse_start(t) {
                Ok(seconds) => video.start = Some(seconds.to_string()),
                Err(e) => dropped = Some(e),
            }
        }
        Ok((video, dropped))
    }

    /// The player path: `<id>?start=<t>` with an offset, `<id>?` without.
    pub fn player_path(&self) -> String {
        match &self.start {
            Some(t) => format!("{}?start={t}", self.id),
            None => format!("{}?", self.id),
        }
    }
}

struct ParsedUrl<'a> {
    id: &'a str,
    t: Option<&'a str>,
}

impl<'a> ParsedUrl<'a> {
    fn parse(url: &'a str) -> Result<Self, EmbedError> {
        let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
        let (base, query) = match without_fragment.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (without_fragment, None),
        };

        let mut params = query.map(parse_query).unwrap_or_default();
        if let Some(id) = short_link_id(base) {
            params.insert("v", id);
        }

        match params.get("v").copied().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(ParsedUrl {
                id,
                t: params.get("t").copied().filter(|t| !t.is_empty()),
            }),
            _ => Err(EmbedError::MissingId {
                url: url.to_string(),
            }),
        }
    }
}

/// Split a query string into parameters. Last duplicate wins; a bare token
/// is the value of `v`. A value ends at its next `=`, so `v=abc=x` is `abc`.
fn parse_query(query: &str) -> HashMap<&str, &str> {
    let mut params = HashMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let mut parts = pair.split('=');
        let key = parts.next().unwrap_or(pair);
        match parts.next() {
            Some(value) => params.insert(key, value),
            None => params.insert("v", pair),
        };
    }
    params
}

/// The path segment following a `youtu.be/` host, if `base` is a short link.
fn short_link_id(base: &str) -> Option<&str> {
    let idx = base.to_ascii_lowercase().find("youtu.be/")?;
    let rest = &base[idx + "youtu.be/".len()..];
    Some(
        rest.split(|c: char| c == '/' || c.is_ascii_whitespace())
            .next()
            .unwrap_or(rest),
    )
}

/// Normalise a `t` value (`42`, `42s`, `1m30s`, `1h2m3s`) to whole seconds.
fn parse_start(value: &str) -> Result<u64, EmbedError> {
    let invalid = || EmbedError::InvalidStart {
        value: value.to_string(),
    };

    if let Ok(seconds) = value.parse::<u64>() {
        return Ok(seconds);
    }

    let mut total = 0u64;
    let mut digits = String::new();
    let mut last_unit = 0u8;
    for c in value.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let (rank, factor) = match c.to_ascii_lowercase() {
            'h' => (1, 3600),
            'm' => (2, 60),
            's' => (3, 1),
            _ => return Err(invalid()),
        };
        if digits.is_empty() || rank <= last_unit {
            return Err(invalid());
        }
        let n: u64 = digits.parse().map_err(|_| invalid())?;
        total = n
            .checked_mul(factor)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(invalid)?;
        digits.clear();
        last_unit = rank;
    }

    if !digits.is_empty() || last_unit == 0 {
        return Err(invalid());
    }
    Ok(total)
}
