//! Inline rich text formatting.
//!
//! Annotation tags are applied innermost-first in a fixed order:
//! bold, italic, strikethrough, underline, code. A hyperlink wraps the result.
//! Equation runs skip annotations and are delimited for a downstream math
//! renderer instead.

use std::fmt::Write;

use crate::block::{RichTextRun, RichTextVariant};

/// Render a run sequence to HTML.
#[must_use]
pub fn render_rich_text(runs: &[RichTextRun]) -> String {
    let mut out = String::new();
    for run in runs {
        render_run(run, &mut out);
    }
    out
}

fn render_run(run: &RichTextRun, out: &mut String) {
    if run.variant == RichTextVariant::Equation {
        write!(
            out,
            r#"<span class="equation">$${}$$</span>"#,
            escape_html(&run.text)
        )
        .unwrap();
        return;
    }

    let mut content = escape_html(&run.text);
    let annotations = run.annotations;
    for (enabled, tag) in [
        (annotations.bold, "strong"),
        (annotations.italic, "em"),
        (annotations.strikethrough, "s"),
        (annotations.underline, "u"),
        (annotations.code, "code"),
    ] {
        if enabled {
            content = format!("<{tag}>{content}</{tag}>");
        }
    }

    match &run.link {
        Some(href) => write!(
            out,
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{content}</a>"#,
            escape_html(href)
        )
        .unwrap(),
        None => out.push_str(&content),
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
