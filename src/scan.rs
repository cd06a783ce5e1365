//! Link grammar: locate `[!preview](url "title")` candidates.
//!
//! A candidate is a markdown link whose text is itself an image (the text
//! starts with `!`) and whose target points at a YouTube watch or short URL.
//! Brackets and parentheses are balanced, so an image nested in the link text
//! (`[![alt](thumb.png)](url)`) is handled, and neither part may span lines.
//! Two links on the same line are two independent candidates.

/// One image-link to a YouTube URL found in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCandidate<'a> {
    /// Link text without the surrounding brackets. Always starts with `!`.
    pub preview: &'a str,
    /// Link target up to the first whitespace, without the optional title.
    pub url: &'a str,
    /// Optional `"title"` following the URL (without quotes).
    pub title: Option<&'a str>,
    /// Byte offset of the opening `[`.
    pub start: usize,
    /// Byte offset just past the closing `)`.
    pub end: usize,
}

/// Returns `true` if `url` names a YouTube watch page or a `youtu.be` short link.
///
/// The host tokens are compared ASCII case-insensitively.
pub fn is_youtube_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.contains("youtube.com/watch") || lower.contains("youtu.be")
}

/// Find every non-overlapping YouTube image-link in `source`, in document order.
pub fn find_candidates(source: &str) -> Vec<LinkCandidate<'_>> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(rel) = source[pos..].find("[!") {
        let start = pos + rel;
        match parse_link_at(source, start) {
            Some(candidate) if is_youtube_url(candidate.url) => {
                pos = candidate.end;
                found.push(candidate);
            }
            _ => pos = start + 1,
        }
    }

    found
}

/// Parse a `[...](...)` link whose `[` sits at `start`.
fn parse_link_at(source: &str, start: usize) -> Option<LinkCandidate<'_>> {
    let bytes = source.as_bytes();
    let text_close = matching_close(bytes, start + 1, b'[', b']')?;
    if bytes.get(text_close + 1) != Some(&b'(') {
        return None;
    }
    let target = parse_target(source, text_close + 2)?;

    // The URL ends at the first whitespace
    let url = target.url.split_ascii_whitespace().next()?;

    Some(LinkCandidate {
        preview: &source[start + 1..text_close],
        url,
        title: target.title,
        start,
        end: target.close + 1,
    })
}

struct Target<'a> {
    url: &'a str,
    title: Option<&'a str>,
    /// Byte index of the closing `)`.
    close: usize,
}

/// Parse a link target starting at `from`, just past the opening `(`.
///
/// A `<whitespace>"` opens the title, which runs to the first `")` on the
/// line; parentheses inside the title are not counted. Without a title the
/// target runs to the balancing `)`. Gives up at a line break.
fn parse_target(source: &str, from: usize) -> Option<Target<'_>> {
    let bytes = source.as_bytes();
    let mut depth = 1usize;

    for i in from..bytes.len() {
        match bytes[i] {
            b'\n' => return None,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(Target {
                        url: &source[from..i],
                        title: None,
                        close: i,
                    });
                }
            }
            b if b.is_ascii_whitespace() && bytes.get(i + 1) == Some(&b'"') => {
                let title_start = i + 2;
                let line = &source[title_start..];
                let line = line.find('\n').map_or(line, |end| &line[..end]);
                if let Some(rel) = line.find("\")") {
                    return Some(Target {
                        url: &source[from..i],
                        title: Some(&line[..rel]),
                        close: title_start + rel + 1,
                    });
                }
            }
            _ => {}
        }
    }
    None
}

/// Find the byte index of the delimiter closing an already-open `open`,
/// scanning from `from`. Gives up at a line break.
fn matching_close(bytes: &[u8], from: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 1usize;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        if b == b'\n' {
            return None;
        }
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}
