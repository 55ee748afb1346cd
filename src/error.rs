//! Error handling for the bcdemux library.
//!
//! The matching engine and classifier are pure computations over data that is
//! already in memory, so every error here originates at the I/O boundary:
//! opening the barcode or sequence file, decompressing it, or parsing its
//! records.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for bcdemux operations.
///
/// # Examples
///
/// ```rust
/// use bcdemux::{BarcodeSet, Result};
///
/// fn load() -> Result<BarcodeSet> {
///     Ok(BarcodeSet::from_lines(vec![b"ACGT".to_vec()]))
/// }
/// assert_eq!(load().unwrap().len(), 1);
/// ```
pub type Result<T> = std::result::Result<T, DemuxError>;

/// Error types for bcdemux operations.
///
/// # Examples
///
/// ```rust
/// use bcdemux::{BarcodeSet, DemuxError};
///
/// match BarcodeSet::from_path("/definitely/not/here.txt") {
///     Err(DemuxError::OpenPath { path, .. }) => {
///         println!("could not open {}", path.display());
///     }
///     Err(e) => println!("Other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum DemuxError {
    /// I/O error from the underlying reader or writer.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// A barcode or sequence file could not be opened.
    ///
    /// Carries the offending path so that a missing input fails fast with a
    /// message naming it.
    #[error("Unable to open {}", path.display())]
    OpenPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Compression sniffing or decompression failed.
    #[cfg(feature = "niffler")]
    #[error("Niffler error")]
    Niffler(#[from] niffler::Error),

    /// A FASTA/FASTQ record was malformed.
    ///
    /// Malformed records are never skipped; the run stops here.
    #[error("Malformed sequence record: {0}")]
    Parse(#[from] needletail::errors::ParseError),

    /// The requested thread count could not be satisfied.
    #[error("Invalid thread count ({0})")]
    InvalidThreads(usize),

    /// A worker thread panicked while processing a batch of reads.
    #[error("Worker thread {tid} panicked")]
    WorkerPanic { tid: usize },
}

impl DemuxError {
    /// Wraps an I/O error raised while opening `path`.
    pub fn open<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::OpenPath {
            path: path.into(),
            source,
        }
    }
}
