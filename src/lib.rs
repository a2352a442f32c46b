#![doc = include_str!("../README.md")]

/// Article value type
pub mod article;
/// Per-block seek-and-decompress
pub mod block;
/// Markup cleaning pipeline
pub mod cleaner;
mod error;
/// Article extraction from decompressed blocks
pub mod extract;
/// Block offset index over the companion index file
pub mod index;
/// Composed random-access dump reader
pub mod reader;

pub use article::Article;
pub use block::{DEFAULT_READ_BLOCK_SIZE, extract_block, extract_block_with};
pub use cleaner::MarkupCleaner;
pub use error::{DumpError, Result};
pub use extract::ArticleExtractor;
pub use index::BlockOffsetIndex;
pub use reader::DumpReader;
