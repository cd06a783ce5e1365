//! Embed configuration.
//!
//! Every field has a default, and the defaults reproduce the stock embed
//! block. A site only lists the fields it changes:
//!
//! ```
//! use md_preprocess::config::{EmbedConfig, MissingIdPolicy};
//!
//! let config = EmbedConfig::from_yaml_str("class: video\nmissing_id: empty_id\n").unwrap();
//! assert_eq!(config.class, "video");
//! assert_eq!(config.missing_id, MissingIdPolicy::EmptyId);
//! assert_eq!(config.iframe_title, "YouTube");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_EMBED_BASE: &str = "https://www.youtube-nocookie.com/embed";
pub const DEFAULT_THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";
pub const DEFAULT_PLAYER_PARAMS: &str = "autoplay=1&autohide=1&modestbranding=1&color=white&rel=0";
pub const DEFAULT_CLASS: &str = "ytEmbed";
pub const DEFAULT_IFRAME_TITLE: &str = "YouTube";

/// What to do with a matched link whose URL carries no video id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingIdPolicy {
    /// Leave the link text as it is.
    #[default]
    Skip,
    /// Emit the embed block with an empty `data-id`.
    EmptyId,
}

/// Thumbnail image served by the thumbnail host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailQuality {
    /// 120x90
    Default,
    /// 320x180
    Medium,
    /// 480x360
    #[default]
    High,
    /// 640x480
    Standard,
    /// 1280x720, not available for every video
    MaxRes,
}

impl ThumbnailQuality {
    pub fn filename(self) -> &'static str {
        match self {
            ThumbnailQuality::Default => "default.jpg",
            ThumbnailQuality::Medium => "mqdefault.jpg",
            ThumbnailQuality::High => "hqdefault.jpg",
            ThumbnailQuality::Standard => "sddefault.jpg",
            ThumbnailQuality::MaxRes => "maxresdefault.jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbedConfig {
    /// Base URL of the player; the video path is appended after a `/`.
    pub embed_base: String,
    /// Base URL of thumbnails; `/<id>/<quality file>` is appended.
    pub thumbnail_base: String,
    pub thumbnail_quality: ThumbnailQuality,
    /// Query parameters appended to every player URL, without a leading `&`.
    pub player_params: String,
    /// CSS class of the anchor; the site's script hooks onto it.
    pub class: String,
    pub iframe_title: String,
    /// Replacement for the built-in embed template.
    ///
    /// Variables: `href`, `id`, `class`, `thumbnail`, `title`, `src`.
    pub template: Option<String>,
    pub missing_id: MissingIdPolicy,
    /// Leave links inside code blocks and inline code untouched.
    pub skip_code: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        EmbedConfig {
            embed_base: DEFAULT_EMBED_BASE.to_string(),
            thumbnail_base: DEFAULT_THUMBNAIL_BASE.to_string(),
            thumbnail_quality: ThumbnailQuality::default(),
            player_params: DEFAULT_PLAYER_PARAMS.to_string(),
            class: DEFAULT_CLASS.to_string(),
            iframe_title: DEFAULT_IFRAME_TITLE.to_string(),
            template: None,
            missing_id: MissingIdPolicy::default(),
            skip_code: false,
        }
    }
}

impl EmbedConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EmbedConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: EmbedConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty("embed_base", &self.embed_base)?;
        non_empty("thumbnail_base", &self.thumbnail_base)?;
        non_empty("class", &self.class)?;
        if self.class.contains(['"', '<', '>', '&']) {
            return Err(ConfigError::Invalid {
                field: "class",
                reason: "must not contain HTML special characters".into(),
            });
        }
        if self.player_params.starts_with(['&', '?']) {
            return Err(ConfigError::Invalid {
                field: "player_params",
                reason: "must not start with `&` or `?`".into(),
            });
        }
        if let Some(template) = &self.template {
            if !template.contains("{= src =}") && !template.contains("{=src=}") {
                return Err(ConfigError::Invalid {
                    field: "template",
                    reason: "must reference `{= src =}`".into(),
                });
            }
        }
        Ok(())
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field,
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}
