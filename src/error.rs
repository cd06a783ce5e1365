//! Error types and diagnostics.
//!
//! Rewriting a document never fails as a whole. Problems with a single link
//! are reported as [`Diagnostic`]s and the scan continues past them. Hard
//! errors ([`ConfigError`]) only come from loading configuration.

use serde::Serialize;

/// Why a single matched link could not be turned into a video reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbedError {
    #[error("no video id in `{url}`")]
    MissingId { url: String },

    #[error("unrecognised start offset `{value}`")]
    InvalidStart { value: String },
}

/// Errors raised while loading or validating an [`EmbedConfig`](crate::config::EmbedConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config field `{field}` {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Severity of a diagnostic.
///
/// `Info` notes a link deliberately left alone, `Warning` a degraded embed,
/// and `Error` a link that could not be embedded at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Location of a match in the source document.
///
/// Offsets are byte offsets into the original text. Lines are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start_offset: usize,
    pub end_offset: usize,
    pub start_line: usize,
    pub end_line: usize,
}

/// Newline offsets of a document, for turning byte offsets into line numbers.
///
/// Built once per document; each lookup is a binary search.
#[derive(Debug, Clone)]
pub struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        LineIndex {
            newlines: source
                .bytes()
                .enumerate()
                .filter_map(|(i, b)| (b == b'\n').then_some(i))
                .collect(),
        }
    }

    /// 1-based line containing byte `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&n| n < offset) + 1
    }

    /// Span of `start..end`.
    pub fn span(&self, start: usize, end: usize) -> Span {
        Span {
            start_offset: start,
            end_offset: end,
            start_line: self.line_of(start),
            end_line: self.line_of(end.saturating_sub(1).max(start)),
        }
    }
}

/// A message about one location in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn info(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Info, message, span)
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Warning, message, span)
    }

    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, message, span)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match self.span {
            Some(span) => write!(f, "{level} (line {}): {}", span.start_line, self.message),
            None => write!(f, "{level}: {}", self.message),
        }
    }
}
