//! Notion API wire types.

mod block;
mod page;
mod rich_text;

pub use block::{BlockChildrenResponse, RawBlock};
pub use page::PageResponse;
pub use rich_text::{RawAnnotations, RichTextItem};
