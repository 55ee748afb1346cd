//! # bcdemux - Strand-Aware Barcode Counting for Sequencing Reads
//!
//! `bcdemux` detects known short DNA barcodes inside sequencing reads and
//! tallies, per barcode, how many clean reads carry it. A barcode is
//! recognized on either strand: its reverse complement folds back onto the
//! same barcode id.
//!
//! ## Classification
//!
//! Every read is scanned once against all barcodes and their reverse
//! complements. A read whose occurrences resolve to a single barcode (or to
//! none) is *clean* and adds its occurrences to that barcode's count. A read
//! holding two or more distinct barcodes is *mixed*: it is counted separately
//! and contributes nothing to the per-barcode counts.
//!
//! ```rust
//! use bcdemux::{AhoCorasick, BarcodeSet, Classifier, ReadClass};
//!
//! let barcodes = BarcodeSet::from_lines(vec![b"AAAA".to_vec(), b"CCCC".to_vec()]);
//! let matcher = AhoCorasick::new(barcodes.patterns());
//! let mut classifier = Classifier::for_barcodes(&matcher, &barcodes);
//!
//! classifier.classify(b"read1", b"AAAAXXXX");
//! classifier.classify(b"read2", b"CCCCYYYY");
//! assert_eq!(classifier.classify(b"read3", b"AAAACCCC"), ReadClass::Mixed);
//!
//! let tally = classifier.into_tally();
//! assert_eq!(tally.counts, vec![1, 1]);
//! assert_eq!(tally.mixed, 1);
//! ```
//!
//! ## Matching Strategies
//!
//! The production path is an Aho–Corasick automaton that reports every
//! occurrence of every pattern in a single pass. Border-array (KMP) and
//! bit-parallel single-pattern scans are kept as reference strategies; all
//! three implement [`PatternMatcher`] and report identical occurrence streams.
//!
//! ```rust
//! use bcdemux::{bit_parallel_find, border_array, kmp_find, AhoCorasick, Occurrence};
//!
//! let text = b"AGCTGGTTAGCT";
//! assert_eq!(kmp_find(b"AGCT", &border_array(b"AGCT"), text), vec![3, 11]);
//! assert_eq!(bit_parallel_find(b"GGTT", text), vec![7]);
//!
//! let ac = AhoCorasick::new(&[b"AGCT", b"GGTT"]);
//! let hits: Vec<Occurrence> = ac.scan(text).collect();
//! assert_eq!(
//!     hits,
//!     vec![Occurrence::new(0, 3), Occurrence::new(1, 7), Occurrence::new(0, 11)]
//! );
//! ```
//!
//! ## Reverse Complements
//!
//! Complementation is a table lookup over all 256 byte values. Case is
//! preserved and anything other than `ACGTacgt` maps to itself.
//!
//! ```rust
//! use bcdemux::revcomp;
//!
//! assert_eq!(revcomp(b"Acgt"), b"acgT");
//! assert_eq!(revcomp(b"AN-G"), b"C-NT");
//! ```
//!
//! ## File Processing
//!
//! [`AnalyzeConfig`] and [`FilterConfig`] drive whole runs over (possibly
//! compressed) FASTA/FASTQ files, the same way the `bcdemux` binary does.
//!
//! ```rust,no_run
//! use bcdemux::AnalyzeConfig;
//!
//! # fn main() -> bcdemux::Result<()> {
//! let mut config = AnalyzeConfig::new("reads.fq.gz", "barcodes.txt");
//! config.threads = 0; // 0 = use all available cores
//! let analysis = config.analyze()?;
//! println!("{} mixed reads", analysis.tally.mixed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Parallel Processing
//!
//! Any [`ReadSource`](io::ReadSource) can be spread over worker threads with
//! [`process_parallel`]. Each worker owns a clone of the processor; the
//! clones are returned for a final reduction.
//!
//! ```rust
//! use bcdemux::io::{MemorySource, OwnedRead, ReadRef};
//! use bcdemux::{process_parallel, ParallelProcessor};
//!
//! #[derive(Clone, Default)]
//! struct BaseCounter {
//!     bases: u64,
//! }
//!
//! impl ParallelProcessor for BaseCounter {
//!     fn process_read(&mut self, _ordinal: u64, read: ReadRef<'_>) -> bcdemux::Result<()> {
//!         self.bases += read.seq.len() as u64;
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> bcdemux::Result<()> {
//! let reads = (0..100)
//!     .map(|i| OwnedRead { header: format!("r{i}").into_bytes(), seq: b"ACGT".to_vec(), qual: None })
//!     .collect();
//! let workers = process_parallel(&mut MemorySource::new(reads), BaseCounter::default(), 0)?;
//! assert_eq!(workers.iter().map(|w| w.bases).sum::<u64>(), 400);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Matching and classification cannot fail; errors come only from the I/O
//! boundary and are reported as [`DemuxError`]:
//!
//! ```rust
//! use bcdemux::{AnalyzeConfig, DemuxError};
//!
//! match AnalyzeConfig::new("missing_reads.fq", "missing_barcodes.txt").analyze() {
//!     Err(DemuxError::OpenPath { path, .. }) => {
//!         println!("Unable to open {}", path.display());
//!     }
//!     Err(e) => println!("Other error: {}", e),
//!     Ok(_) => unreachable!(),
//! }
//! ```

mod barcode;
mod classify;
pub mod cli;
mod config;
mod error;
mod filter;
pub mod io;
mod matcher;
mod parallel;
mod revcomp;

pub use barcode::BarcodeSet;
pub use classify::{classify_reads, Analysis, Classifier, LocalTally, MixedRead, ReadClass, Tally};
pub use config::{AnalyzeConfig, FilterConfig};
pub use error::{DemuxError, Result};
pub use filter::{contains_any, filter_reads, FilterSummary};
pub use matcher::{
    bit_parallel_count, bit_parallel_find, border_array, kmp_count, kmp_find, AhoCorasick,
    AnyMatcher, BitParallelMatcher, KmpMatcher, Occurrence, PatternMatcher, Scan, Strategy,
};
pub use parallel::{process_parallel, resolve_threads, ParallelProcessor, BATCH_SIZE};
pub use revcomp::{complement, revcomp, revcomp_in_place, COMPLEMENT};
