//! Notion integration for nw.
//!
//! [`NotionClient`] talks to the Notion REST API over a blocking `ureq`
//! agent and implements [`nw_compiler::BlockStore`], decoding block JSON into
//! the compiler's block model.
//!
//! # Example
//!
//! ```ignore
//! use nw_compiler::{Converter, Mode, Renderer};
//! use nw_notion::NotionClient;
//!
//! let client = NotionClient::new(std::env::var("NOTION_API_KEY")?);
//! let conversion = Converter::new(client, Renderer::new()).convert(page_id, Mode::Preview)?;
//! ```

mod client;
mod error;
mod store;
pub mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_NOTION_VERSION, DEFAULT_PAGE_SIZE, NotionClient};
pub use error::NotionError;
