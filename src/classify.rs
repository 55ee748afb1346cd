//! Per-read barcode classification and counting.
//!
//! Each read is scanned once. Every occurrence is folded onto its canonical
//! barcode id (`pattern % N`), so a barcode and its reverse complement count
//! as the same barcode. A read whose occurrences resolve to two or more
//! distinct barcodes is *mixed*: it bumps the mixed counter and contributes
//! nothing to any per-barcode count. Any other read is *clean* and adds its
//! per-barcode occurrence counts to the running totals.

use log::debug;

use crate::{
    io::{ReadRef, ReadSource},
    matcher::{Occurrence, PatternMatcher},
    parallel::{process_parallel, ParallelProcessor},
    BarcodeSet, Result,
};

/// Outcome of classifying one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadClass {
    /// At most one distinct barcode; `None` when nothing matched
    Clean { barcode: Option<usize> },
    /// Two or more distinct barcodes
    Mixed,
}

/// Per-read scratch state, reset before every read.
#[derive(Debug, Clone, Default)]
pub struct LocalTally {
    /// `(canonical id, occurrences)` in first-seen order
    counts: Vec<(usize, u64)>,
    /// End position of the occurrences in `at_end`
    end: Option<usize>,
    /// Canonical ids already counted at `end`
    at_end: Vec<usize>,
}
impl LocalTally {
    pub fn reset(&mut self) {
        self.counts.clear();
        self.end = None;
        self.at_end.clear();
    }

    /// Records one occurrence of barcode `id` ending at `end`.
    ///
    /// Entries reporting the same barcode over the same span (a palindromic
    /// barcode is its own reverse complement) are counted once.
    pub fn observe(&mut self, id: usize, end: usize) {
        if self.end != Some(end) {
            self.end = Some(end);
            self.at_end.clear();
        }
        if self.at_end.contains(&id) {
            return;
        }
        self.at_end.push(id);

        match self.counts.iter_mut().find(|(seen, _)| *seen == id) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((id, 1)),
        }
    }

    /// Number of distinct barcodes seen in the current read.
    pub fn num_distinct(&self) -> usize {
        self.counts.len()
    }

    /// Distinct barcode ids in first-seen order.
    pub fn distinct(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts.iter().map(|&(id, _)| id)
    }

    /// Occurrence count of each distinct barcode, in first-seen order.
    pub fn counts(&self) -> &[(usize, u64)] {
        &self.counts
    }
}

/// Run-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    /// Clean-read occurrence count per canonical barcode id
    pub counts: Vec<u64>,
    /// Number of mixed reads
    pub mixed: u64,
    /// Number of reads classified
    pub reads: u64,
}
impl Tally {
    pub fn new(num_barcodes: usize) -> Self {
        Self {
            counts: vec![0; num_barcodes],
            mixed: 0,
            reads: 0,
        }
    }

    /// Adds another partial tally into this one.
    pub fn merge(&mut self, other: &Tally) {
        debug_assert_eq!(self.counts.len(), other.counts.len());
        self.counts
            .iter_mut()
            .zip(&other.counts)
            .for_each(|(a, b)| *a += b);
        self.mixed += other.mixed;
        self.reads += other.reads;
    }
}

/// Diagnostic record of a mixed read.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixedRead {
    /// 0-based position of the read in the input
    pub ordinal: u64,
    pub header: Vec<u8>,
    /// Distinct canonical barcode ids (0-based), in first-seen order
    pub barcodes: Vec<usize>,
}

/// Final result of an analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub tally: Tally,
    /// Mixed reads in input order; empty unless diagnostics were enabled
    pub mixed_reads: Vec<MixedRead>,
}

/// Classifies reads against a barcode set and accumulates a [`Tally`].
///
/// The matcher is borrowed read-only, so clones of a classifier can scan
/// reads on different threads against the same matcher.
///
/// # Examples
///
/// ```
/// use bcdemux::{AhoCorasick, BarcodeSet, Classifier, ReadClass};
///
/// let barcodes = BarcodeSet::from_lines(vec![b"AAAA".to_vec(), b"CCCC".to_vec()]);
/// let matcher = AhoCorasick::new(barcodes.patterns());
/// let mut classifier = Classifier::new(&matcher, barcodes.len());
///
/// assert_eq!(classifier.classify(b"r1", b"AAAAXXXX"), ReadClass::Clean { barcode: Some(0) });
/// assert_eq!(classifier.classify(b"r2", b"GGGGYYYY"), ReadClass::Clean { barcode: Some(1) });
/// assert_eq!(classifier.classify(b"r3", b"AAAACCCC"), ReadClass::Mixed);
///
/// let tally = classifier.into_analysis().tally;
/// assert_eq!(tally.counts, vec![1, 1]);
/// assert_eq!(tally.mixed, 1);
/// ```
pub struct Classifier<'a, M: PatternMatcher + ?Sized> {
    matcher: &'a M,
    num_barcodes: usize,
    diagnostics: bool,
    local: LocalTally,
    tally: Tally,
    mixed_reads: Vec<MixedRead>,
    tid: Option<usize>,
}
impl<M: PatternMatcher + ?Sized> Clone for Classifier<'_, M> {
    fn clone(&self) -> Self {
        Self {
            matcher: self.matcher,
            num_barcodes: self.num_barcodes,
            diagnostics: self.diagnostics,
            local: self.local.clone(),
            tally: self.tally.clone(),
            mixed_reads: self.mixed_reads.clone(),
            tid: self.tid,
        }
    }
}
impl<'a, M: PatternMatcher + ?Sized> Classifier<'a, M> {
    /// Creates a classifier for `num_barcodes` canonical barcodes.
    ///
    /// `matcher` must have been built from the `2 * num_barcodes` patterns of
    /// a [`BarcodeSet`].
    pub fn new(matcher: &'a M, num_barcodes: usize) -> Self {
        debug_assert_eq!(matcher.num_patterns(), 2 * num_barcodes);
        Self {
            matcher,
            num_barcodes,
            diagnostics: false,
            local: LocalTally::default(),
            tally: Tally::new(num_barcodes),
            mixed_reads: Vec::new(),
            tid: None,
        }
    }

    /// Creates a classifier sized for `barcodes`.
    pub fn for_barcodes(matcher: &'a M, barcodes: &BarcodeSet) -> Self {
        Self::new(matcher, barcodes.len())
    }

    /// Keeps a [`MixedRead`] record for every mixed read.
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Classifies the next read in input order.
    pub fn classify(&mut self, header: &[u8], seq: &[u8]) -> ReadClass {
        let ordinal = self.tally.reads;
        self.classify_at(ordinal, header, seq)
    }

    /// Classifies the read at input position `ordinal`.
    pub fn classify_at(&mut self, ordinal: u64, header: &[u8], seq: &[u8]) -> ReadClass {
        self.local.reset();
        let num_barcodes = self.num_barcodes;
        let local = &mut self.local;
        self.matcher.for_each_match(seq, &mut |occ: Occurrence| {
            local.observe(occ.pattern % num_barcodes, occ.end)
        });
        self.tally.reads += 1;

        let class = if self.local.num_distinct() >= 2 {
            self.tally.mixed += 1;
            if self.diagnostics {
                let record = MixedRead {
                    ordinal,
                    header: header.to_vec(),
                    barcodes: self.local.distinct().collect(),
                };
                debug!(
                    "Mixed read {}: barcodes {:?}",
                    String::from_utf8_lossy(header),
                    record.barcodes
                );
                self.mixed_reads.push(record);
            }
            ReadClass::Mixed
        } else {
            for &(id, count) in self.local.counts() {
                self.tally.counts[id] += count;
            }
            ReadClass::Clean {
                barcode: self.local.distinct().next(),
            }
        };
        self.local.reset();
        class
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn mixed_reads(&self) -> &[MixedRead] {
        &self.mixed_reads
    }

    /// Number of reads classified so far.
    pub fn reads_processed(&self) -> u64 {
        self.tally.reads
    }

    pub fn into_tally(self) -> Tally {
        self.tally
    }

    pub fn into_analysis(self) -> Analysis {
        Analysis {
            tally: self.tally,
            mixed_reads: self.mixed_reads,
        }
    }

    /// Reduces per-worker classifiers into one result.
    ///
    /// Counts are sums, so the result does not depend on how reads were
    /// distributed; mixed-read records are restored to input order.
    pub fn reduce<I: IntoIterator<Item = Self>>(num_barcodes: usize, workers: I) -> Analysis {
        let mut analysis = Analysis {
            tally: Tally::new(num_barcodes),
            mixed_reads: Vec::new(),
        };
        for worker in workers {
            analysis.tally.merge(&worker.tally);
            analysis.mixed_reads.extend(worker.mixed_reads);
        }
        analysis.mixed_reads.sort_by_key(|r| r.ordinal);
        analysis
    }
}
impl<M: PatternMatcher + ?Sized> ParallelProcessor for Classifier<'_, M> {
    fn process_read(&mut self, ordinal: u64, read: ReadRef<'_>) -> Result<()> {
        self.classify_at(ordinal, read.header, read.seq);
        Ok(())
    }
    fn set_tid(&mut self, tid: usize) {
        self.tid = Some(tid);
    }
    fn get_tid(&self) -> Option<usize> {
        self.tid
    }
}

/// Classifies every read of `source` and returns the reduced result.
///
/// `threads == 1` classifies on the calling thread straight from the
/// source's buffers; any other value goes through [`process_parallel`]
/// (`0` meaning all cores). The result is the same either way.
pub fn classify_reads<S, M>(
    source: &mut S,
    matcher: &M,
    num_barcodes: usize,
    diagnostics: bool,
    threads: usize,
) -> Result<Analysis>
where
    S: ReadSource + ?Sized,
    M: PatternMatcher + ?Sized,
{
    let mut classifier = Classifier::new(matcher, num_barcodes).with_diagnostics(diagnostics);
    if threads == 1 {
        while let Some(read) = source.next_read()? {
            classifier.classify(read.header, read.seq);
        }
        return Ok(classifier.into_analysis());
    }
    let workers = process_parallel(source, classifier, threads)?;
    Ok(Classifier::reduce(num_barcodes, workers))
}
