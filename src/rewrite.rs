//! Whole-document link rewriting.
//!
//! [`LinkRewriter::rewrite`] replaces each YouTube image-link with an embed
//! block and copies every other byte through unchanged. A link that cannot be
//! turned into a video reference never stops the document: it is reported as
//! a [`Diagnostic`] and handled according to [`MissingIdPolicy`].

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag};

use crate::config::{EmbedConfig, MissingIdPolicy};
use crate::embed::render_embed;
use crate::error::{ConfigError, Diagnostic, EmbedError, LineIndex, Span};
use crate::scan::{LinkCandidate, find_candidates};
use crate::video::VideoRef;

/// A link that was replaced by an embed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedVideo {
    pub video: VideoRef,
    pub url: String,
    /// Where the link was in the input.
    pub span: Span,
}

/// Output of a rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rewritten {
    pub output: String,
    pub embeds: Vec<EmbeddedVideo>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Rewrites YouTube image-links into embed blocks.
#[derive(Debug, Clone, Default)]
pub struct LinkRewriter {
    config: EmbedConfig,
}

impl LinkRewriter {
    /// Build a rewriter, validating `config`. Values such as `class` are
    /// emitted unescaped and rely on that validation.
    pub fn new(config: EmbedConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(LinkRewriter { config })
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    /// Rewrite `source`, returning only the new text.
    pub fn transform(&self, source: &str) -> String {
        self.rewrite(source).output
    }

    pub fn rewrite(&self, source: &str) -> Rewritten {
        let candidates = find_candidates(source);
        if candidates.is_empty() {
            return Rewritten {
                output: source.to_string(),
                ..Rewritten::default()
            };
        }

        let code = if self.config.skip_code {
            code_ranges(source)
        } else {
            Vec::new()
        };

        let mut result = Rewritten {
            output: String::with_capacity(source.len() + candidates.len() * 512),
            ..Rewritten::default()
        };
        let lines = LineIndex::new(source);
        let mut copied = 0;

        for candidate in candidates {
            let span = lines.span(candidate.start, candidate.end);
            if code.iter().any(|r| r.contains(&candidate.start)) {
                result
                    .diagnostics
                    .push(Diagnostic::info("video link inside code left unchanged", span));
                continue;
            }

            let Some(block) = self.embed_for(&candidate, span, &mut result) else {
                continue;
            };

            result.output.push_str(&source[copied..candidate.start]);
            result.output.push_str(&block);
            copied = candidate.end;
        }

        result.output.push_str(&source[copied..]);
        result
    }

    /// Build the block for one candidate, recording diagnostics. `None`
    /// leaves the candidate text in place.
    fn embed_for(
        &self,
        candidate: &LinkCandidate<'_>,
        span: Span,
        result: &mut Rewritten,
    ) -> Option<String> {
        let video = match VideoRef::from_url_lenient(candidate.url) {
            Ok((video, dropped)) => {
                if let Some(e) = dropped {
                    result
                        .diagnostics
                        .push(Diagnostic::warning(format!("{e}; embedding from the start"), span));
                }
                video
            }
            Err(e @ EmbedError::MissingId { .. }) => match self.config.missing_id {
                MissingIdPolicy::Skip => {
                    result
                        .diagnostics
                        .push(Diagnostic::error(format!("{e}; link left unchanged"), span));
                    return None;
                }
                MissingIdPolicy::EmptyId => {
                    result
                        .diagnostics
                        .push(Diagnostic::warning(format!("{e}; embedded with empty id"), span));
                    VideoRef::new("")
                }
            },
            Err(e) => {
                result.diagnostics.push(Diagnostic::error(e.to_string(), span));
                return None;
            }
        };

        let block = render_embed(&video, candidate.url, &self.config);
        result.embeds.push(EmbeddedVideo {
            video,
            url: candidate.url.to_string(),
            span,
        });
        Some(block)
    }
}

/// Byte ranges of code blocks and inline code spans in `source`.
fn code_ranges(source: &str) -> Vec<Range<usize>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    Parser::new_ext(source, options)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) | Event::Code(_) => Some(range),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use pretty_assertions::assert_eq;

    fn rewrite(source: &str) -> Rewritten {
        LinkRewriter::default().rewrite(source)
    }

    #[test]
    fn no_links_is_identity() {
        let src = "# Title\n\nSome [link](https://example.com) and ![img](a.png).\n";
        let r = rewrite(src);
        assert_eq!(r.output, src);
        assert!(r.embeds.is_empty());
        assert!(r.diagnostics.is_empty());
    }

    #[test]
    fn replaces_watch_link() {
        let src = "Intro\n\n[![alt](thumb.png)](https://www.youtube.com/watch?v=abc123)\n\nOutro\n";
        let r = rewrite(src);
        assert!(r.output.starts_with("Intro\n\n\n<a href="));
        assert!(r.output.ends_with("</a>\n\nOutro\n"));
        assert!(r.output.contains("data-id=\"abc123\""));
        assert!(r.output.contains("/embed/abc123?&autoplay=1"));
        assert!(!r.output.contains("thumb.png"));
        assert_eq!(r.embeds.len(), 1);
        assert_eq!(r.embeds[0].span.start_line, 3);
    }

    #[test]
    fn start_offset() {
        let r = rewrite("[![alt](thumb.png)](https://www.youtube.com/watch?v=abc123&t=42)");
        assert!(r.output.contains("/embed/abc123?start=42&autoplay=1&autohide=1"));
    }

    #[test]
    fn short_link() {
        let r = rewrite("[![alt](thumb.png)](https://youtu.be/xyz789)");
        assert!(r.output.contains("data-id=\"xyz789\""));
    }

    #[test]
    fn title_is_discarded() {
        let r = rewrite(r#"[![alt](thumb.png)](https://youtu.be/xyz789 "My talk")"#);
        assert!(r.output.contains("href=\"https://youtu.be/xyz789\""));
        assert!(!r.output.contains("My talk"));
    }

    #[test]
    fn multiple_links_keep_order() {
        let src = "A [![a](a.png)](https://youtu.be/one) B [![b](b.png)](https://youtu.be/two) C";
        let r = rewrite(src);
        let one = r.output.find("data-id=\"one\"").unwrap();
        let two = r.output.find("data-id=\"two\"").unwrap();
        assert!(one < two);
        assert!(r.output.starts_with("A \n<a"));
        assert!(r.output.contains("</a> B \n<a"));
        assert!(r.output.ends_with("</a> C"));
        assert_eq!(r.embeds.len(), 2);
    }

    #[test]
    fn missing_id_is_skipped_by_default() {
        let src = "x [![a](a.png)](https://www.youtube.com/watch?t=5) [![b](b.png)](https://youtu.be/ok) y";
        let r = rewrite(src);
        assert!(r.output.starts_with("x [![a](a.png)](https://www.youtube.com/watch?t=5) \n<a"));
        assert!(r.output.contains("data-id=\"ok\""));
        assert_eq!(r.embeds.len(), 1);
        assert_eq!(r.diagnostics.len(), 1);
        assert_eq!(r.diagnostics[0].severity, Severity::Error);
        assert!(r.diagnostics[0].message.contains("link left unchanged"));
    }

    #[test]
    fn missing_id_empty_policy() {
        let rewriter = LinkRewriter::new(EmbedConfig {
            missing_id: MissingIdPolicy::EmptyId,
            ..EmbedConfig::default()
        })
        .unwrap();
        let r = rewriter.rewrite("[![a](a.png)](https://youtu.be/)");
        assert!(r.output.contains("data-id=\"\""));
        assert_eq!(r.embeds.len(), 1);
        assert_eq!(r.diagnostics.len(), 1);
        assert_eq!(r.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn bad_start_still_embeds() {
        let r = rewrite("[![a](a.png)](https://www.youtube.com/watch?v=abc&t=soon)");
        assert!(r.output.contains("/embed/abc?&autoplay=1"));
        assert_eq!(r.diagnostics.len(), 1);
        assert!(r.diagnostics[0].message.contains("soon"));
    }

    #[test]
    fn second_pass_is_noop() {
        let once = LinkRewriter::default().transform(
            "Text [![a](a.png)](https://www.youtube.com/watch?v=abc123&t=42) more",
        );
        let twice = LinkRewriter::default().transform(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn code_is_rewritten_unless_skipped() {
        let src = "```md\n[![a](a.png)](https://youtu.be/in_fence)\n```\n\n`[![b](b.png)](https://youtu.be/inline)`\n\n[![c](c.png)](https://youtu.be/outside)\n";

        let r = rewrite(src);
        assert_eq!(r.embeds.len(), 3);

        let rewriter = LinkRewriter::new(EmbedConfig {
            skip_code: true,
            ..EmbedConfig::default()
        })
        .unwrap();
        let r = rewriter.rewrite(src);
        assert_eq!(r.embeds.len(), 1);
        assert_eq!(r.embeds[0].video.id, "outside");
        assert!(r.output.contains("[![a](a.png)](https://youtu.be/in_fence)"));
        assert!(r.output.contains("`[![b](b.png)](https://youtu.be/inline)`"));
        assert_eq!(r.diagnostics.len(), 2);
        assert!(r.diagnostics.iter().all(|d| d.severity == Severity::Info));
        assert_eq!(r.diagnostics[0].span.map(|s| s.start_line), Some(2));
    }

    #[test]
    fn title_with_parens_is_discarded() {
        let r = rewrite(r#"[![a](a.png)](https://youtu.be/xyz789 "Part 1)") next"#);
        assert!(r.output.contains("href=\"https://youtu.be/xyz789\""));
        assert!(r.output.contains("data-id=\"xyz789\""));
        assert!(r.output.contains("/embed/xyz789?&autoplay=1"));
        assert!(r.output.ends_with("</a> next"));
        assert!(!r.output.contains("Part 1"));

        let r = rewrite(r#"[![a](a.png)](https://youtu.be/xyz789 "see (b")"#);
        assert_eq!(r.embeds.len(), 1);
        assert_eq!(r.embeds[0].video.id, "xyz789");
        assert!(r.output.ends_with("</a>"));
    }

    #[test]
    fn unsafe_class_is_rejected() {
        let err = LinkRewriter::new(EmbedConfig {
            class: "a\" onclick=\"x".into(),
            ..EmbedConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "class", .. }));
    }

    #[test]
    fn spans_follow_document_lines() {
        let src = "one\n[![a](a.png)](https://youtu.be/a)\n\ntwo [![b](b.png)](https://youtu.be/b)\n";
        let r = rewrite(src);
        let lines: Vec<_> = r.embeds.iter().map(|e| e.span.start_line).collect();
        assert_eq!(lines, [2, 4]);
    }
}
