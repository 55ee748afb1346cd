//! Run configuration for the `analyze` and `filter` commands.
//!
//! A configuration names the input files and the options of one run and
//! knows how to execute it. The command line is the only source of
//! configuration; see [`crate::cli`].

use std::path::{Path, PathBuf};

use log::info;

use crate::{
    classify::classify_reads,
    filter::{filter_reads, FilterSummary},
    io::{open_output, write_report, RecordWriter, SeqReader},
    parallel::resolve_threads,
    Analysis, AnyMatcher, BarcodeSet, PatternMatcher, Result, Strategy,
};

/// Loads the barcode list and builds the matcher over its `2N` patterns.
fn load_matcher(barcodes: &Path, strategy: Strategy) -> Result<(BarcodeSet, AnyMatcher)> {
    let set = BarcodeSet::from_path(barcodes)?;
    let matcher = AnyMatcher::build(strategy, set.patterns());
    if let AnyMatcher::Aho(ac) = &matcher {
        info!("Built automaton with {} states", ac.num_states());
    }
    info!(
        "Matching {} patterns with the {} strategy",
        matcher.num_patterns(),
        strategy
    );
    Ok((set, matcher))
}

/// Configuration of an `analyze` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeConfig {
    /// FASTA/FASTQ reads, optionally compressed
    pub input: PathBuf,
    /// One barcode per line
    pub barcodes: PathBuf,
    /// Report destination; standard output when `None`
    pub output: Option<PathBuf>,
    /// Report every mixed read before the counts
    pub diagnostics: bool,
    pub strategy: Strategy,
    /// Worker threads; `1` is sequential and `0` uses every core
    pub threads: usize,
}
impl AnalyzeConfig {
    pub fn new(input: impl Into<PathBuf>, barcodes: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            barcodes: barcodes.into(),
            output: None,
            diagnostics: false,
            strategy: Strategy::default(),
            threads: 1,
        }
    }

    /// Classifies every read of the input and returns the result without
    /// writing a report.
    pub fn analyze(&self) -> Result<Analysis> {
        let (set, matcher) = load_matcher(&self.barcodes, self.strategy)?;
        let mut reader = SeqReader::from_path(&self.input)?;
        if self.threads != 1 {
            info!("Classifying on {} threads", resolve_threads(self.threads));
        }
        let analysis = classify_reads(
            &mut reader,
            &matcher,
            set.len(),
            self.diagnostics,
            self.threads,
        )?;
        info!(
            "Classified {} reads ({} mixed)",
            analysis.tally.reads, analysis.tally.mixed
        );
        Ok(analysis)
    }

    /// Runs the analysis and writes the report.
    ///
    /// The output file is only created once the whole input has been
    /// classified.
    pub fn run(&self) -> Result<Analysis> {
        let analysis = self.analyze()?;
        let writer = open_output(self.output.as_deref())?;
        write_report(writer, &analysis, self.diagnostics)?;
        Ok(analysis)
    }
}

/// Configuration of a `filter` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// FASTA/FASTQ reads, optionally compressed
    pub input: PathBuf,
    /// One barcode per line
    pub barcodes: PathBuf,
    /// Destination for the kept reads; standard output when `None`
    pub output: Option<PathBuf>,
    pub strategy: Strategy,
}
impl FilterConfig {
    pub fn new(input: impl Into<PathBuf>, barcodes: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            barcodes: barcodes.into(),
            output: None,
            strategy: Strategy::default(),
        }
    }

    /// Writes every read without a barcode occurrence to the output.
    pub fn run(&self) -> Result<FilterSummary> {
        let (_set, matcher) = load_matcher(&self.barcodes, self.strategy)?;
        let mut reader = SeqReader::from_path(&self.input)?;
        let mut writer = RecordWriter::new(open_output(self.output.as_deref())?);
        let summary = filter_reads(&mut reader, &matcher, &mut writer)?;
        info!("Kept: {}", summary.kept);
        info!("Removed: {}", summary.removed);
        Ok(summary)
    }
}
