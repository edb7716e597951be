//! Content extraction from fetched markup
//!
//! - `text`: streaming conversion of markup to its visible text blocks
//! - `links`: anchor discovery, resolution and scope filtering

mod links;
mod text;

pub use links::extract_links;
pub use text::{extract_text, SKIPPED_TAGS};
