//! Barcode sets with both strand orientations.
//!
//! A set of `N` canonical barcodes is laid out as `2N` patterns: entry `i` is
//! barcode `i` and entry `N + i` is its reverse complement. Folding a pattern
//! index with `% N` recovers the canonical barcode id for either strand.

use std::{
    io::{BufRead, BufReader},
    path::Path,
};

use log::{info, warn};

use crate::{io::open_path, revcomp::revcomp_in_place, Result};

/// Ordered barcodes plus their reverse complements.
///
/// # Examples
///
/// ```
/// use bcdemux::BarcodeSet;
///
/// let set = BarcodeSet::from_lines(vec![b"AACG".to_vec(), b"GGGA".to_vec()]);
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.patterns()[3], b"TCCC");
/// assert_eq!(set.canonical(3), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeSet {
    /// Canonical barcodes followed by their reverse complements
    patterns: Vec<Vec<u8>>,
    /// Number of canonical barcodes
    len: usize,
}
impl BarcodeSet {
    /// Builds a set from canonical barcodes in id order.
    pub fn from_lines(barcodes: Vec<Vec<u8>>) -> Self {
        let len = barcodes.len();
        let mut patterns = barcodes;
        patterns.reserve(len);
        for i in 0..len {
            let mut rc = patterns[i].clone();
            revcomp_in_place(&mut rc);
            patterns.push(rc);
        }
        Self { patterns, len }
    }

    /// Reads one barcode per line from `path`.
    ///
    /// Line bytes are taken verbatim apart from the line terminator (`\n` or
    /// `\r\n`). Compressed files are decompressed transparently when the
    /// `niffler` feature is enabled.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(open_path(path)?);
        let set = Self::from_reader(reader)?;
        info!(
            "Loaded {} barcodes ({} patterns) from {}",
            set.len(),
            set.patterns.len(),
            path.display()
        );
        Ok(set)
    }

    /// Reads one barcode per line from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut barcodes = Vec::new();
        for line in reader.split(b'\n') {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            barcodes.push(line);
        }
        let set = Self::from_lines(barcodes);
        if set.is_empty() {
            warn!("Barcode list is empty; every read will be counted as clean with no barcode");
        }
        let num_empty = set.barcodes().iter().filter(|b| b.is_empty()).count();
        if num_empty > 0 {
            warn!("{num_empty} empty barcode line(s) will never match");
        }
        Ok(set)
    }

    /// Number of canonical barcodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The canonical barcodes, in id order.
    pub fn barcodes(&self) -> &[Vec<u8>] {
        &self.patterns[..self.len]
    }

    /// The canonical barcode with 0-based id `id`.
    pub fn get(&self, id: usize) -> Option<&[u8]> {
        self.barcodes().get(id).map(Vec::as_slice)
    }

    /// All `2N` patterns fed to a matcher.
    pub fn patterns(&self) -> &[Vec<u8>] {
        &self.patterns
    }

    /// Folds a pattern index onto its canonical barcode id.
    #[inline]
    pub fn canonical(&self, pattern: usize) -> usize {
        pattern % self.len
    }
}
