//! Exact pattern matching strategies.
//!
//! Three interchangeable strategies report every occurrence of every pattern
//! in a text:
//!
//! - [`AhoCorasick`]: one pass over the text for all patterns (production path)
//! - [`KmpMatcher`]: one border-array scan per pattern
//! - [`BitParallelMatcher`]: one word-chunked window scan per pattern
//!
//! All of them emit [`Occurrence`]s in the same order: ascending end position,
//! then longer patterns first, then ascending pattern index. Zero-length
//! patterns never match.

mod aho;
mod bitpar;
mod kmp;

pub use aho::{AhoCorasick, Scan};
pub use bitpar::{bit_parallel_count, bit_parallel_find, BitParallelMatcher};
pub use kmp::{border_array, kmp_count, kmp_find, KmpMatcher};

use std::{fmt, str::FromStr};

/// A single pattern match.
///
/// `end` is the 0-based index of the last matched byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occurrence {
    pub pattern: usize,
    pub end: usize,
}
impl Occurrence {
    pub fn new(pattern: usize, end: usize) -> Self {
        Self { pattern, end }
    }
}

/// Capability shared by every matching strategy.
///
/// Implementors are immutable once built, so a single matcher can be shared
/// by reference across threads scanning different reads.
pub trait PatternMatcher: Send + Sync {
    /// Number of patterns the matcher was built from.
    fn num_patterns(&self) -> usize;

    /// Calls `f` for each occurrence in `text`, in stream order.
    fn for_each_match(&self, text: &[u8], f: &mut dyn FnMut(Occurrence));

    /// Collects every occurrence in `text`.
    fn find_all(&self, text: &[u8]) -> Vec<Occurrence> {
        let mut out = Vec::new();
        self.for_each_match(text, &mut |occ| out.push(occ));
        out
    }
}

/// Matching strategy, selected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    #[default]
    Aho,
    Kmp,
    BitParallel,
}
impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aho => "aho",
            Self::Kmp => "kmp",
            Self::BitParallel => "bitpar",
        }
    }
}
impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
impl FromStr for Strategy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aho" | "aho-corasick" => Ok(Self::Aho),
            "kmp" => Ok(Self::Kmp),
            "bitpar" | "bit-parallel" => Ok(Self::BitParallel),
            other => Err(format!(
                "unknown strategy '{other}' (expected aho, kmp or bitpar)"
            )),
        }
    }
}

/// A matcher of any strategy.
#[derive(Debug, Clone)]
pub enum AnyMatcher {
    Aho(AhoCorasick),
    Kmp(KmpMatcher),
    BitParallel(BitParallelMatcher),
}
impl AnyMatcher {
    /// Builds a matcher over `patterns` using `strategy`.
    pub fn build<P: AsRef<[u8]>>(strategy: Strategy, patterns: &[P]) -> Self {
        match strategy {
            Strategy::Aho => Self::Aho(AhoCorasick::new(patterns)),
            Strategy::Kmp => Self::Kmp(KmpMatcher::new(patterns)),
            Strategy::BitParallel => Self::BitParallel(BitParallelMatcher::new(patterns)),
        }
    }
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Aho(_) => Strategy::Aho,
            Self::Kmp(_) => Strategy::Kmp,
            Self::BitParallel(_) => Strategy::BitParallel,
        }
    }
}
impl PatternMatcher for AnyMatcher {
    fn num_patterns(&self) -> usize {
        match self {
            Self::Aho(m) => m.num_patterns(),
            Self::Kmp(m) => m.num_patterns(),
            Self::BitParallel(m) => m.num_patterns(),
        }
    }
    fn for_each_match(&self, text: &[u8], f: &mut dyn FnMut(Occurrence)) {
        match self {
            Self::Aho(m) => m.for_each_match(text, f),
            Self::Kmp(m) => m.for_each_match(text, f),
            Self::BitParallel(m) => m.for_each_match(text, f),
        }
    }
}

/// Sorts per-pattern occurrences into stream order.
///
/// Used by the strategies that scan one pattern at a time.
pub(crate) fn sort_stream(occurrences: &mut [Occurrence], lens: &[usize]) {
    occurrences.sort_unstable_by(|a, b| {
        a.end
            .cmp(&b.end)
            .then_with(|| lens[b.pattern].cmp(&lens[a.pattern]))
            .then_with(|| a.pattern.cmp(&b.pattern))
    });
}
