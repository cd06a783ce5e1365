//! `md-preprocess` — markdown preprocessing for documentation sites.
//!
//! The main job is turning image-links to YouTube videos into click-to-load
//! embed blocks before the site generator renders the markdown. The page then
//! ships a thumbnail instead of a player until the reader asks for the video.
//!
//! # Quick start
//!
//! ```
//! let md = "Watch: [![demo](demo.png)](https://www.youtube.com/watch?v=abc123&t=42)";
//! let html = md_preprocess::transform(md);
//! assert!(html.contains(r#"data-id="abc123""#));
//! assert!(html.contains("/embed/abc123?start=42&autoplay=1"));
//! ```
//!
//! Text without such links comes back unchanged. Use [`Preprocessor`] or
//! [`LinkRewriter`] with an [`EmbedConfig`] to change the embed output or to
//! get diagnostics for links that could not be embedded.

pub mod config;
pub mod embed;
pub mod error;
pub mod preprocess;
#[cfg(feature = "terminal")]
pub mod render_term;
pub mod rewrite;
pub mod scan;
pub mod template;
pub mod theme;
pub mod video;

pub use config::{EmbedConfig, MissingIdPolicy, ThumbnailQuality};
pub use error::*;
pub use preprocess::{Preprocessor, Processed};
pub use rewrite::{EmbeddedVideo, LinkRewriter, Rewritten};
pub use theme::{ColorMode, ThemeStore, ThemeTarget, set_color_mode, stored_color_mode};
pub use video::VideoRef;

/// Rewrite YouTube image-links in `source` using the default configuration.
pub fn transform(source: &str) -> String {
    LinkRewriter::default().transform(source)
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn text_without_image_links_is_unchanged(s in "[^\\[]*") {
            prop_assert_eq!(super::transform(&s), s);
        }

        #[test]
        fn non_youtube_links_are_unchanged(
            alt in "[a-z ]{0,8}",
            host in "(example\\.com|vimeo\\.com|youtube\\.com/channel)",
            path in "[a-zA-Z0-9_-]{1,12}",
        ) {
            let s = format!("before [![{alt}](t.png)](https://{host}/{path}) after");
            prop_assert_eq!(super::transform(&s), s);
        }

        #[test]
        fn every_link_embeds_once_and_second_pass_is_noop(
            ids in proptest::collection::vec("[a-zA-Z0-9_-]{1,11}", 1..5),
            sep in "[a-z .\\n]{0,6}",
        ) {
            let doc: Vec<String> = ids
                .iter()
                .map(|id| format!("[![x](x.png)](https://www.youtube.com/watch?v={id})"))
                .collect();
            let doc = doc.join(&sep);

            let once = super::transform(&doc);
            prop_assert_eq!(once.matches("class=\"ytEmbed\"").count(), ids.len());
            for id in &ids {
                let needle = format!("data-id=\"{id}\"");
                prop_assert!(once.contains(&needle));
            }
            prop_assert_eq!(super::transform(&once), once);
        }
    }
}
