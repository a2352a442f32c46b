//! Dump reader error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while indexing, decompressing, or extracting articles
#[derive(Error, Debug)]
pub enum DumpError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The compressed index stream could not be parsed
    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// The persisted offset file does not exist
    #[error("missing offset file: {0}")]
    MissingIndexFile(PathBuf),

    /// A line of the persisted offset file is not a decimal integer
    #[error("malformed offset file at line {line}: {content:?}")]
    MalformedIndexFile {
        /// 1-based line number of the offending line
        line: usize,
        /// Offending line content
        content: String,
    },

    /// Decompression hit end of input before a clean block boundary
    ///
    /// Recoverable: callers running a multi-block batch should skip the
    /// block and continue.
    #[error("truncated block at offset {offset}")]
    TruncatedBlock {
        /// Byte offset of the block that failed to decompress
        offset: u64,
    },

    /// Requested byte offset lies beyond the end of the archive
    #[error("seek offset {offset} out of range for archive of {len} bytes")]
    SeekOutOfRange {
        /// Requested byte offset
        offset: u64,
        /// Archive length in bytes
        len: u64,
    },

    /// Requested block index exceeds the number of indexed blocks
    #[error("block index {index} out of range ({count} blocks)")]
    IndexOutOfRange {
        /// Requested block index
        index: usize,
        /// Number of indexed blocks
        count: usize,
    },

    /// Required text was absent where a value is mandatory
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Structural XML parse failure for a whole block
    #[error("XML parse error: {0}")]
    Xml(String),

    /// Decompressed block was not valid UTF-8
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias using DumpError
pub type Result<T> = std::result::Result<T, DumpError>;
