//! `{= key =}` interpolation for embed templates.
//!
//! Values taken from the document are HTML-escaped when they are inserted.
//! Values assembled from configuration go in verbatim through
//! [`TemplateContext::insert_raw`].
//!
//! # Usage
//!
//! ```
//! use md_preprocess::template::TemplateContext;
//!
//! let mut ctx = TemplateContext::new();
//! ctx.insert("href", "https://youtu.be/a?x=\"1\"");
//! ctx.insert_raw("class", "ytEmbed");
//!
//! let html = r#"<a href="{= href =}" class="{= class =}">"#;
//! assert_eq!(
//!     ctx.resolve(html),
//!     r#"<a href="https://youtu.be/a?x=&quot;1&quot;" class="ytEmbed">"#
//! );
//! ```

use std::collections::HashMap;

/// Variables available to a template. Values are stored ready for output.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    vars: HashMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable, HTML-escaping its value. Returns `&mut Self` for chaining.
    pub fn insert(&mut self, key: impl Into<String>, value: &str) -> &mut Self {
        self.vars.insert(key.into(), escape_html(value));
        self
    }

    /// Insert a variable whose value is already safe to emit.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Resolve `{= key =}` patterns in `template`.
    ///
    /// - Missing keys resolve to an empty string.
    /// - Whitespace inside the delimiters is trimmed.
    /// - An unclosed `{=` is emitted literally.
    pub fn resolve(&self, template: &str) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start_pos) = rest.find("{=") {
            result.push_str(&rest[..start_pos]);

            let after_open = &rest[start_pos + 2..];
            if let Some(end_pos) = after_open.find("=}") {
                let key = after_open[..end_pos].trim();
                if let Some(value) = self.vars.get(key) {
                    result.push_str(value);
                }
                rest = &after_open[end_pos + 2..];
            } else {
                result.push_str("{=");
                rest = after_open;
            }
        }

        result.push_str(rest);
        result
    }
}

/// Escape HTML special characters for use in text or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
