//! Light/dark colour-mode preference.
//!
//! The preference lives in a key-value store supplied by the caller (browser
//! local storage on the site) and is mirrored onto a document attribute that
//! stylesheets select on. Nothing here holds global state.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Attribute set on the document root.
pub const THEME_ATTR: &str = "data-theme";
/// Key the preference is stored under.
pub const STORE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

pub const COLOR_MODES: [ColorMode; 2] = [ColorMode::Light, ColorMode::Dark];

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown colour mode `{0}`")]
pub struct UnknownColorMode(pub String);

impl FromStr for ColorMode {
    type Err = UnknownColorMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COLOR_MODES
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownColorMode(s.to_string()))
    }
}

/// Persistent key-value storage for the preference.
pub trait ThemeStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Receiver of the theme attribute (the document root on the site).
pub trait ThemeTarget {
    fn set_attribute(&mut self, name: &str, value: &str);
}

/// Persist `mode` and apply it to `target`.
///
/// Unknown modes change nothing and return `None`.
pub fn set_color_mode(
    store: &mut impl ThemeStore,
    target: &mut impl ThemeTarget,
    mode: &str,
) -> Option<ColorMode> {
    let Ok(mode) = mode.parse::<ColorMode>() else {
        log::debug!("ignoring unknown colour mode {mode:?}");
        return None;
    };
    store.set(STORE_KEY, mode.as_str());
    target.set_attribute(THEME_ATTR, mode.as_str());
    Some(mode)
}

/// The stored preference, if any valid one was saved.
pub fn stored_color_mode(store: &impl ThemeStore) -> Option<ColorMode> {
    store.get(STORE_KEY)?.parse().ok()
}

/// In-memory [`ThemeStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl ThemeStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// In-memory [`ThemeTarget`] recording attributes.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    attrs: HashMap<String, String>,
}

impl AttributeMap {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

impl ThemeTarget for AttributeMap {
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_and_read_back() {
        let mut store = MemoryStore::default();
        let mut root = AttributeMap::default();

        assert_eq!(set_color_mode(&mut store, &mut root, "dark"), Some(ColorMode::Dark));
        assert_eq!(root.get(THEME_ATTR), Some("dark"));
        assert_eq!(store.get(STORE_KEY).as_deref(), Some("dark"));
        assert_eq!(stored_color_mode(&store), Some(ColorMode::Dark));

        set_color_mode(&mut store, &mut root, "light");
        assert_eq!(stored_color_mode(&store), Some(ColorMode::Light));
        assert_eq!(root.get(THEME_ATTR), Some("light"));
    }

    #[test]
    fn unknown_mode_is_noop() {
        let mut store = MemoryStore::default();
        let mut root = AttributeMap::default();
        set_color_mode(&mut store, &mut root, "dark");

        assert_eq!(set_color_mode(&mut store, &mut root, "sepia"), None);
        assert_eq!(set_color_mode(&mut store, &mut root, "Dark"), None);
        assert_eq!(stored_color_mode(&store), Some(ColorMode::Dark));
        assert_eq!(root.get(THEME_ATTR), Some("dark"));
    }

    #[test]
    fn nothing_stored() {
        assert_eq!(stored_color_mode(&MemoryStore::default()), None);
    }

    #[test]
    fn corrupt_stored_value_is_ignored() {
        let mut store = MemoryStore::default();
        store.set(STORE_KEY, "purple");
        assert_eq!(stored_color_mode(&store), None);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("light".parse::<ColorMode>(), Ok(ColorMode::Light));
        assert_eq!(
            "".parse::<ColorMode>(),
            Err(UnknownColorMode(String::new()))
        );
        assert_eq!(ColorMode::Dark.to_string(), "dark");
        assert_eq!(serde_json::to_string(&ColorMode::Light).unwrap(), "\"light\"");
    }
}
