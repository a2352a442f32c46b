//! Block offset index over the companion multistream index file
//!
//! The companion index file is itself bzip2-compressed; decompressed, it
//! holds one `offset:articleId:title` record per line. Many records share
//! one compressed block, so building the index deduplicates the offset
//! column. The result is persisted as a plain offsets file (one decimal
//! per line, ascending) and reloaded on later runs without recomputation.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use bzip2::read::MultiBzDecoder;
use tracing::debug;

use crate::{DumpError, Result};

/// Sorted set of byte offsets at which compressed blocks begin
///
/// Invariant: offsets are unique and strictly ascending.
///
/// # Example
///
/// ```no_run
/// use wikidump_rs::BlockOffsetIndex;
///
/// let index = BlockOffsetIndex::build_to_file(
///     "enwiki-multistream-index.txt.bz2",
///     "offsets.txt",
/// )?;
/// println!("{} blocks", index.len());
/// # Ok::<(), wikidump_rs::DumpError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOffsetIndex {
    offsets: Vec<u64>,
}

impl BlockOffsetIndex {
    /// Derive block offsets from the raw compressed index stream
    ///
    /// Decompresses the stream, parses the offset field of every
    /// `offset:articleId:title` line, deduplicates and sorts ascending.
    /// Blank lines are skipped. Returns [`DumpError::CorruptIndex`] if a
    /// line does not start with a decimal offset field.
    pub fn build<R: Read>(raw: R) -> Result<Self> {
        let reader = BufReader::new(MultiBzDecoder::new(raw));
        let mut seen = BTreeSet::new();

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let field = match line.split_once(':') {
                Some((field, _)) => field,
                None => line.as_str(),
            };
            let offset: u64 = field.parse().map_err(|_| {
                DumpError::CorruptIndex(format!("bad offset field in line {line:?}"))
            })?;
            seen.insert(offset);
        }

        // BTreeSet iteration is ascending, so the invariant holds by construction
        let offsets: Vec<u64> = seen.into_iter().collect();
        debug!(blocks = offsets.len(), "built offset index");
        Ok(Self { offsets })
    }

    /// Build the index from a compressed index file and persist it in one pass
    ///
    /// Convenience for the usual first run: read `index_path`, write the
    /// plain offsets file to `out_path`, return the built index.
    pub fn build_to_file(
        index_path: impl AsRef<Path>,
        out_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let index = Self::build(File::open(index_path)?)?;
        index.persist(out_path)?;
        Ok(index)
    }

    /// Write the offsets as plain text, one decimal integer per line
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        for offset in &self.offsets {
            writeln!(out, "{offset}")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Load a previously persisted offsets file
    ///
    /// Returns [`DumpError::MissingIndexFile`] if the path does not exist
    /// and [`DumpError::MalformedIndexFile`] if any non-empty line is not
    /// a valid non-negative integer.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DumpError::MissingIndexFile(path.to_path_buf()));
        }

        let reader = BufReader::new(File::open(path)?);
        let mut offsets = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let offset: u64 =
                line.trim().parse().map_err(|_| DumpError::MalformedIndexFile {
                    line: i + 1,
                    content: line.clone(),
                })?;
            offsets.push(offset);
        }
        Ok(Self { offsets })
    }

    /// Block offsets in ascending order
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Number of indexed blocks
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// True if no blocks are indexed
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offset of block `i`, if in range
    pub fn get(&self, i: usize) -> Option<u64> {
        self.offsets.get(i).copied()
    }
}

impl From<Vec<u64>> for BlockOffsetIndex {
    /// Build an index from already-known offsets, enforcing the
    /// sorted-unique invariant.
    fn from(offsets: Vec<u64>) -> Self {
        let seen: BTreeSet<u64> = offsets.into_iter().collect();
        Self {
            offsets: seen.into_iter().collect(),
        }
    }
}
