//! ANSI-coloured rendering of diagnostics for build output.
//!
//! Enabled by the `terminal` feature.

use colored::Colorize;

use crate::error::{Diagnostic, Severity};

/// Render diagnostics for one document, one per line, prefixed by `name`.
pub fn diagnostics_to_terminal(name: &str, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for d in diagnostics {
        let level = match d.severity {
            Severity::Info => "info".blue().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Error => "error".red().bold(),
        };
        let location = match d.span {
            Some(span) => format!("{name}:{}", span.start_line),
            None => name.to_string(),
        };
        out.push_str(&format!("{level}: {} {}\n", location.dimmed(), d.message));
    }
    out
}
