//! Composed random-access reader over a multistream dump archive
//!
//! Ties the offset index, per-block decompression, and article extraction
//! together behind an explicit indexed accessor: blocks are addressed by
//! index, each independently decompressible, which makes data-parallel
//! batch processing straightforward.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::block::{DEFAULT_READ_BLOCK_SIZE, extract_block_with};
use crate::cleaner::MarkupCleaner;
use crate::extract::ArticleExtractor;
use crate::index::BlockOffsetIndex;
use crate::{Article, DumpError, Result};

/// Random-access reader over a block-compressed dump archive
///
/// Stateless across calls: each [`articles`](DumpReader::articles) call
/// opens its own read handle, so a shared reader can serve a thread pool
/// without locking.
///
/// # Example
///
/// ```no_run
/// use wikidump_rs::{DumpReader, MarkupCleaner};
///
/// let reader = DumpReader::new("enwiki-multistream.xml.bz2", "offsets.txt")?
///     .with_cleaner(MarkupCleaner::new());
/// for article in reader.articles(0)? {
///     println!("{}: {} chars", article.title, article.text.len());
/// }
/// # Ok::<(), wikidump_rs::DumpError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DumpReader {
    archive_path: PathBuf,
    index: BlockOffsetIndex,
    extractor: ArticleExtractor,
    read_block_size: usize,
}

impl DumpReader {
    /// Open a reader over `archive` using the persisted offsets file
    pub fn new(archive: impl AsRef<Path>, offsets: impl AsRef<Path>) -> Result<Self> {
        let index = BlockOffsetIndex::load(offsets)?;
        Ok(Self::with_index(archive, index))
    }

    /// Open a reader over `archive` with an already-built index
    pub fn with_index(archive: impl AsRef<Path>, index: BlockOffsetIndex) -> Self {
        debug!(blocks = index.len(), archive = %archive.as_ref().display(), "opened dump reader");
        Self {
            archive_path: archive.as_ref().to_path_buf(),
            index,
            extractor: ArticleExtractor::new(),
            read_block_size: DEFAULT_READ_BLOCK_SIZE,
        }
    }

    /// Run `cleaner` over every extracted article's text
    #[must_use]
    pub fn with_cleaner(mut self, cleaner: MarkupCleaner) -> Self {
        self.extractor = ArticleExtractor::with_cleaner(cleaner);
        self
    }

    /// Override the decompression input chunk size
    #[must_use]
    pub fn read_block_size(mut self, bytes: usize) -> Self {
        self.read_block_size = bytes;
        self
    }

    /// Number of indexed blocks
    pub fn block_count(&self) -> usize {
        self.index.len()
    }

    /// Articles of block `block`, in document order
    ///
    /// Returns [`DumpError::IndexOutOfRange`] if `block >= block_count()`.
    pub fn articles(&self, block: usize) -> Result<Vec<Article>> {
        let offset = self.index.get(block).ok_or(DumpError::IndexOutOfRange {
            index: block,
            count: self.index.len(),
        })?;
        let xml = extract_block_with(&self.archive_path, offset, self.read_block_size)?;
        self.extractor.extract(&xml)
    }

    /// Extract many blocks in parallel
    ///
    /// Per-block failures are isolated: a failed block is logged with its
    /// offset and returned as an `Err` entry without aborting the batch.
    /// Output order follows `blocks`; within one block document order is
    /// preserved. No cross-block ordering is implied by the extraction
    /// itself.
    pub fn articles_batch(&self, blocks: &[usize]) -> Vec<(usize, Result<Vec<Article>>)> {
        blocks
            .par_iter()
            .map(|&block| {
                let result = self.articles(block);
                if let Err(ref e) = result {
                    warn!(
                        block,
                        offset = ?self.index.get(block),
                        error = %e,
                        "block failed, continuing batch"
                    );
                }
                (block, result)
            })
            .collect()
    }
}
