//! Embed block rendering.
//!
//! An embed block is an anchor showing the video thumbnail, wrapping an
//! iframe whose `data-src` the site's script promotes to `src` on click. The
//! anchor keeps the original URL as `href` for readers without scripts.

use crate::config::EmbedConfig;
use crate::template::{TemplateContext, escape_html};
use crate::video::VideoRef;

/// Built-in embed template. The leading newline keeps the HTML on its own
/// line when the link was inline.
pub const DEFAULT_TEMPLATE: &str = r#"
<a href="{= href =}" class="{= class =}" data-id="{= id =}" style="background-image:url({= thumbnail =});">
  <iframe
    title="{= title =}"
    data-src="{= src =}"
    frameborder="0"
    allow="autoplay;encrypted-media;picture-in-picture"
    allowfullscreen
  ></iframe>
</a>"#;

/// Render the embed block for `video`, linking back to `href`.
pub fn render_embed(video: &VideoRef, href: &str, config: &EmbedConfig) -> String {
    let id = escape_html(&video.id);

    let thumbnail = format!(
        "{}/{id}/{}",
        config.thumbnail_base.trim_end_matches('/'),
        config.thumbnail_quality.filename()
    );
    let src = player_src(video, config);

    let mut ctx = TemplateContext::new();
    ctx.insert("href", href)
        .insert("id", &video.id)
        .insert("title", &config.iframe_title)
        .insert_raw("class", config.class.as_str())
        .insert_raw("thumbnail", thumbnail)
        .insert_raw("src", src);

    let template = config.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
    ctx.resolve(template)
}

/// Player URL: `<embed base>/<id>?[start=<t>]&<player params>`.
fn player_src(video: &VideoRef, config: &EmbedConfig) -> String {
    let mut src = format!(
        "{}/{}",
        config.embed_base.trim_end_matches('/'),
        escape_html(&video.player_path())
    );
    if !config.player_params.is_empty() {
        src.push('&');
        src.push_str(&config.player_params);
    }
    src
}
