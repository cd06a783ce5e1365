//! Per-document entry point for a site build.
//!
//! The site generator hands each markdown file to a [`Preprocessor`] before
//! rendering it. The preprocessor rewrites video links and logs what it did
//! against the file's path so build output points at the offending document.

use std::path::Path;

use crate::config::EmbedConfig;
use crate::error::{ConfigError, Diagnostic, Severity};
use crate::rewrite::{EmbeddedVideo, LinkRewriter};

/// Result of preprocessing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub output: String,
    pub embeds: Vec<EmbeddedVideo>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Processed {
    pub fn changed(&self) -> bool {
        !self.embeds.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    rewriter: LinkRewriter,
}

impl Preprocessor {
    pub fn new(config: EmbedConfig) -> Result<Self, ConfigError> {
        Ok(Preprocessor {
            rewriter: LinkRewriter::new(config)?,
        })
    }

    /// Text-in, text-out loader call.
    pub fn transform(&self, source: &str) -> String {
        self.process(source, None).output
    }

    /// Preprocess one document. `resource_path` only labels log records.
    pub fn process(&self, source: &str, resource_path: Option<&Path>) -> Processed {
        let name = resource_path.map_or_else(|| "<input>".to_string(), |p| p.display().to_string());
        let rewritten = self.rewriter.rewrite(source);

        for diagnostic in &rewritten.diagnostics {
            match diagnostic.severity {
                Severity::Info => log::debug!("{name}: {diagnostic}"),
                Severity::Warning => log::warn!("{name}: {diagnostic}"),
                Severity::Error => log::error!("{name}: {diagnostic}"),
            }
        }
        log::debug!(
            "{name}: {} embed(s), {} diagnostic(s)",
            rewritten.embeds.len(),
            rewritten.diagnostics.len()
        );

        Processed {
            output: rewritten.output,
            embeds: rewritten.embeds,
            diagnostics: rewritten.diagnostics,
        }
    }
}
