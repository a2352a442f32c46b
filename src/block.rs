//! Per-block seek-and-decompress over the multistream archive
//!
//! Each block of the archive is an independent bzip2 stream, so a decoder
//! started at a block offset halts cleanly at the block boundary without
//! any length field. Input is fed in fixed-size chunks through a buffered
//! reader, keeping memory bounded regardless of archive size.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use bzip2::read::BzDecoder;
use tracing::trace;

use crate::{DumpError, Result};

/// Default chunk size in bytes fed to the decompressor
pub const DEFAULT_READ_BLOCK_SIZE: usize = 622_144;

/// Synthetic root wrapper, required because a block decompresses to a flat
/// sequence of sibling page records with no shared root element.
const ROOT_OPEN: &str = "<root>";
const ROOT_CLOSE: &str = "</root>";

/// Decompress the single block starting at `offset` into wrapped XML text
///
/// Uses [`DEFAULT_READ_BLOCK_SIZE`] as the input chunk size.
pub fn extract_block(archive: impl AsRef<Path>, offset: u64) -> Result<String> {
    extract_block_with(archive, offset, DEFAULT_READ_BLOCK_SIZE)
}

/// Decompress the single block starting at `offset`, reading input in
/// chunks of `read_block_size` bytes
///
/// Seeks into the archive, decompresses forward until the decoder reports
/// a clean end-of-stream, and wraps the result as `<root>...</root>` so it
/// parses as a forest of page records.
///
/// # Errors
///
/// [`DumpError::SeekOutOfRange`] if `offset` exceeds the archive length,
/// [`DumpError::TruncatedBlock`] if the archive ends mid-stream (skippable
/// by batch callers), [`DumpError::Io`] for underlying file failures.
pub fn extract_block_with(
    archive: impl AsRef<Path>,
    offset: u64,
    read_block_size: usize,
) -> Result<String> {
    let mut file = File::open(archive)?;
    let len = file.metadata()?.len();
    if offset >= len {
        return Err(DumpError::SeekOutOfRange { offset, len });
    }
    file.seek(SeekFrom::Start(offset))?;

    // BzDecoder stops at the end of one compressed stream, which is
    // exactly the block boundary.
    let mut decoder = BzDecoder::new(BufReader::with_capacity(read_block_size, file));
    let mut raw = Vec::new();
    if let Err(e) = decoder.read_to_end(&mut raw) {
        return Err(match e.kind() {
            ErrorKind::UnexpectedEof => DumpError::TruncatedBlock { offset },
            _ => DumpError::Io(e),
        });
    }

    let text = String::from_utf8(raw)?;
    trace!(offset, bytes = text.len(), "decompressed block");

    let mut wrapped =
        String::with_capacity(ROOT_OPEN.len() + text.len() + ROOT_CLOSE.len());
    wrapped.push_str(ROOT_OPEN);
    wrapped.push_str(&text);
    wrapped.push_str(ROOT_CLOSE);
    Ok(wrapped)
}
