//! Syntax highlighting for code blocks.
//!
//! The renderer calls a [`Highlighter`] for every code block. Highlighter
//! failures are isolated to the block: the renderer falls back to an escaped
//! `<pre>` with an error note.
//!
//! With the `highlight` feature (default), [`SyntectHighlighter`] renders
//! inline-styled HTML from syntect's bundled grammars and themes. The syntax
//! and theme sets are built once per process on first use.

use crate::inline::escape_html;

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Highlighting failure.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// The requested theme is not available.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// The highlighter failed on the input.
    #[error("highlighting failed for language '{language}': {message}")]
    Syntax { language: String, message: String },
}

/// Code-to-HTML highlighter.
///
/// Output must be a complete `<pre>` element containing a single `<code>`
/// element with the highlighted source.
pub trait Highlighter: Send + Sync {
    /// Highlight `code` written in `language` using `theme`.
    fn highlight(&self, code: &str, language: &str, theme: &str) -> Result<String, HighlightError>;
}

/// Highlighter that only escapes its input.
///
/// Used when the `highlight` feature is disabled and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, code: &str, _language: &str, _theme: &str) -> Result<String, HighlightError> {
        Ok(format!("<pre><code>{}</code></pre>", escape_html(code)))
    }
}

/// Default highlighter for the enabled feature set.
#[must_use]
pub fn default_highlighter() -> Box<dyn Highlighter> {
    #[cfg(feature = "highlight")]
    {
        Box::new(SyntectHighlighter)
    }
    #[cfg(not(feature = "highlight"))]
    {
        Box::new(PlainHighlighter)
    }
}

#[cfg(feature = "highlight")]
pub use syntect_impl::SyntectHighlighter;

#[cfg(feature = "highlight")]
mod syntect_impl {
    use std::sync::LazyLock;

    use syntect::easy::HighlightLines;
    use syntect::highlighting::ThemeSet;
    use syntect::html::{
        IncludeBackground, append_highlighted_html_for_styled_line, start_highlighted_html_snippet,
    };
    use syntect::parsing::{SyntaxReference, SyntaxSet};
    use syntect::util::LinesWithEndings;

    use super::{HighlightError, Highlighter};

    static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
    static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

    /// Highlighter backed by syntect's bundled grammars and themes.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SyntectHighlighter;

    impl SyntectHighlighter {
        /// Resolve a language name to a grammar.
        ///
        /// Accepts grammar names and file extensions case-insensitively, plus
        /// a few common aliases. Unknown languages resolve to plain text.
        fn find_syntax(language: &str) -> &'static SyntaxReference {
            let token = match language.to_ascii_lowercase().as_str() {
                "plain text" | "plaintext" | "text" => return SYNTAXES.find_syntax_plain_text(),
                "c++" => "cpp".to_owned(),
                "c#" => "cs".to_owned(),
                "shell" | "sh" => "bash".to_owned(),
                other => other.to_owned(),
            };
            SYNTAXES
                .find_syntax_by_token(&token)
                .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text())
        }
    }

    impl Highlighter for SyntectHighlighter {
        fn highlight(
            &self,
            code: &str,
            language: &str,
            theme: &str,
        ) -> Result<String, HighlightError> {
            let theme = THEMES
                .themes
                .get(theme)
                .ok_or_else(|| HighlightError::UnknownTheme(theme.to_owned()))?;
            let syntax = Self::find_syntax(language);
            let syntax_error = |e: syntect::Error| HighlightError::Syntax {
                language: language.to_owned(),
                message: e.to_string(),
            };

            let (pre, background) = start_highlighted_html_snippet(theme);
            let mut html = pre.trim_end().to_owned();
            html.push_str("<code>");

            let mut lines = HighlightLines::new(syntax, theme);
            for line in LinesWithEndings::from(code) {
                let regions = lines.highlight_line(line, &SYNTAXES).map_err(syntax_error)?;
                append_highlighted_html_for_styled_line(
                    &regions,
                    IncludeBackground::IfDifferent(background),
                    &mut html,
                )
                .map_err(syntax_error)?;
            }

            html.push_str("</code></pre>");
            Ok(html)
        }
    }
}
