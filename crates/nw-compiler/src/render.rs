//! Block tree to HTML renderer.
//!
//! [`Renderer::render_block`] dispatches on the block kind and recurses into
//! children through [`Renderer::render_siblings`], which applies list grouping
//! and per-block failure isolation: a failing block is replaced by an inline
//! error fragment and its siblings render normally.

use std::any::Any;
use std::fmt::Write;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::warn;

use crate::block::{Block, BlockContent, BlockKind, Media, RichTextRun, plain_text};
use crate::convert::Mode;
use crate::error::RenderError;
use crate::group::group_siblings;
use crate::highlight::{DEFAULT_THEME, Highlighter, default_highlighter};
use crate::inline::{escape_html, render_rich_text};
use crate::media::MediaResolver;

/// Callout icon used when the block has none.
pub const DEFAULT_CALLOUT_ICON: &str = "💡";

/// Code language used when the block has none.
pub const DEFAULT_CODE_LANGUAGE: &str = "plaintext";

/// Block tree renderer.
///
/// # Example
///
/// ```
/// use nw_compiler::{Block, BlockContent, Mode, Renderer};
///
/// let blocks = vec![
///     Block::new("a", BlockContent::bulleted("one")),
///     Block::new("b", BlockContent::bulleted("two")),
/// ];
/// let html = Renderer::new().render_siblings(&blocks, Mode::Preview);
/// assert_eq!(html, "<ul><li>one</li><li>two</li></ul>");
/// ```
pub struct Renderer {
    highlighter: Box<dyn Highlighter>,
    theme: String,
    media: Option<MediaResolver>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Create a renderer with the default highlighter and theme and no asset
    /// pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            highlighter: default_highlighter(),
            theme: DEFAULT_THEME.to_owned(),
            media: None,
        }
    }

    /// Replace the code highlighter.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Set the highlighting theme.
    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Set the publish-mode image pipeline.
    #[must_use]
    pub fn with_media(mut self, media: MediaResolver) -> Self {
        self.media = Some(media);
        self
    }

    /// Render a sibling sequence with list grouping and failure isolation.
    #[must_use]
    pub fn render_siblings(&self, blocks: &[Block], mode: Mode) -> String {
        group_siblings(blocks, |block| self.render_isolated(block, mode))
    }

    /// Render one block and its subtree.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedBlock`] for kinds with no markup
    /// shape and [`RenderError::InvalidPayload`] for undecodable payloads.
    /// Failures of descendants never surface here.
    pub fn render_block(&self, block: &Block, mode: Mode) -> Result<String, RenderError> {
        let html = match &block.content {
            BlockContent::Paragraph { text } => {
                let text = render_rich_text(text);
                if text.is_empty() {
                    "<p><br></p>".to_owned()
                } else {
                    format!("<p>{text}</p>")
                }
            }
            BlockContent::Heading1 { text } => format!("<h1>{}</h1>", render_rich_text(text)),
            BlockContent::Heading2 { text } => format!("<h2>{}</h2>", render_rich_text(text)),
            BlockContent::Heading3 { text } => format!("<h3>{}</h3>", render_rich_text(text)),
            BlockContent::BulletedListItem { text } | BlockContent::NumberedListItem { text } => {
                format!(
                    "<li>{}{}</li>",
                    render_rich_text(text),
                    self.render_children(block, mode)
                )
            }
            BlockContent::Todo { text, checked } => {
                let checked = if *checked { "checked " } else { "" };
                format!(
                    r#"<div class="todo-item"><input type="checkbox" {checked}disabled /> {}{}</div>"#,
                    render_rich_text(text),
                    self.render_children(block, mode)
                )
            }
            BlockContent::Toggle { text } => format!(
                "<details><summary>{}</summary>{}</details>",
                render_rich_text(text),
                self.render_children(block, mode)
            ),
            BlockContent::Code { text, language } => {
                self.render_code(&block.id, text, language.as_deref())
            }
            BlockContent::Quote { text } => {
                format!("<blockquote>{}</blockquote>", render_rich_text(text))
            }
            BlockContent::Callout { text, icon } => format!(
                r#"<div class="callout"><span class="callout-icon">{}</span><div>{}{}</div></div>"#,
                escape_html(icon.as_deref().unwrap_or(DEFAULT_CALLOUT_ICON)),
                render_rich_text(text),
                self.render_children(block, mode)
            ),
            BlockContent::Divider => "<hr />".to_owned(),
            BlockContent::Image(media) => self.render_image(media, mode),
            BlockContent::Video(media) => {
                format!(r#"<video controls src="{}"></video>"#, escape_html(&media.url))
            }
            BlockContent::File(_) => return Err(RenderError::UnsupportedBlock(BlockKind::File)),
            BlockContent::Bookmark { url, caption } => {
                let mut label = render_rich_text(caption);
                if label.is_empty() {
                    label = escape_html(url);
                }
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="bookmark">{label}</a>"#,
                    escape_html(url)
                )
            }
            BlockContent::Table { .. } => render_table(&block.children),
            BlockContent::TableRow { cells } => render_row(cells, "td"),
            BlockContent::Unsupported { kind } => format!(
                r#"<p class="unknown-block">Unsupported block type: {}</p>"#,
                escape_html(kind)
            ),
            BlockContent::Invalid { kind, detail } => {
                return Err(RenderError::InvalidPayload {
                    kind: kind.clone(),
                    detail: detail.clone(),
                });
            }
        };
        Ok(html)
    }

    fn render_children(&self, block: &Block, mode: Mode) -> String {
        self.render_siblings(&block.children, mode)
    }

    fn render_isolated(&self, block: &Block, mode: Mode) -> String {
        let result = catch_unwind(AssertUnwindSafe(|| self.render_block(block, mode)))
            .unwrap_or_else(|payload| Err(RenderError::Panicked(panic_message(&*payload))));
        match result {
            Ok(html) => html,
            Err(e) => {
                let kind = block.kind();
                warn!(block = %block.id, kind = %kind, error = %e, "Block failed to render");
                error_fragment(&kind, &e)
            }
        }
    }

    fn render_code(&self, block_id: &str, text: &str, language: Option<&str>) -> String {
        let language = language
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_CODE_LANGUAGE);
        let lang = escape_html(language);

        match self.highlighter.highlight(text, language, &self.theme) {
            Ok(html) => format!(
                "<div class=\"w-embed\"><div class=\"code-container\">\n\
                 <span class=\"label {lang}\">{lang}</span>\n\
                 <div class=\"language-{lang}\">\n\
                 {html}\n\
                 </div>\n\
                 <button onclick=\"copyToClipboard(this)\">Copy</button>\n\
                 </div></div>"
            )
            .replacen("<code>", r#"<code class="no-highlight">"#, 1),
            Err(e) => {
                warn!(block = block_id, language, error = %e, "Highlighting failed");
                format!(
                    "<pre data-language=\"{lang}\"><code class=\"language-{lang}\">\
                     Error highlighting code block:\n{}\ncode:\n{}</code></pre>",
                    escape_html(&e.to_string()),
                    escape_html(text)
                )
            }
        }
    }

    fn render_image(&self, media: &Media, mode: Mode) -> String {
        let src = match (&self.media, mode) {
            (Some(resolver), _) => resolver.resolve(&media.url, mode),
            (None, Mode::Publish) => {
                warn!(source = %media.url, "No asset pipeline configured, using source URL");
                media.url.clone()
            }
            (None, Mode::Preview) => media.url.clone(),
        };

        let mut html = format!(
            r#"<figure><img src="{}" alt="{}" />"#,
            escape_html(&src),
            escape_html(&plain_text(&media.caption))
        );
        let caption = render_rich_text(&media.caption);
        if !caption.is_empty() {
            write!(html, "<figcaption>{caption}</figcaption>").unwrap();
        }
        html.push_str("</figure>");
        html
    }
}

/// Render a table from its children. The first row is always the header.
fn render_table(children: &[Block]) -> String {
    let mut rows = children.iter().filter_map(|child| match &child.content {
        BlockContent::TableRow { cells } => Some(cells),
        _ => None,
    });

    let Some(header) = rows.next() else {
        return "<table></table>".to_owned();
    };

    let mut html = String::from("<table>");
    write!(html, "<thead>{}</thead>", render_row(header, "th")).unwrap();

    let body: String = rows.map(|cells| render_row(cells, "td")).collect();
    if !body.is_empty() {
        write!(html, "<tbody>{body}</tbody>").unwrap();
    }

    html.push_str("</table>");
    html
}

fn render_row(cells: &[Vec<RichTextRun>], tag: &str) -> String {
    let mut html = String::from("<tr>");
    for cell in cells {
        write!(html, "<{tag}>{}</{tag}>", render_rich_text(cell)).unwrap();
    }
    html.push_str("</tr>");
    html
}

/// Text of a caught panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}

/// Inline replacement for a block that failed to render.
fn error_fragment(kind: &BlockKind, error: &RenderError) -> String {
    format!(
        "<pre><code>Error processing block type: {}\n{}</code></pre>",
        escape_html(kind.name()),
        escape_html(&error.to_string())
    )
}
