//! Barcode-free read filtering.
//!
//! A read passes when its sequence holds no occurrence of any pattern, which
//! for a [`BarcodeSet`](crate::BarcodeSet) matcher means no barcode in either
//! orientation. Passing reads are written through in input order.

use std::io::Write;

use crate::{
    io::{ReadSource, RecordWriter},
    matcher::PatternMatcher,
    Result,
};

/// Counts from a filtering run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterSummary {
    /// Reads written through
    pub kept: u64,
    /// Reads containing at least one barcode
    pub removed: u64,
}

/// Returns `true` if any pattern occurs in `seq`.
pub fn contains_any<M: PatternMatcher + ?Sized>(matcher: &M, seq: &[u8]) -> bool {
    let mut found = false;
    matcher.for_each_match(seq, &mut |_| found = true);
    found
}

/// Writes every read of `source` without a pattern occurrence to `writer`.
///
/// The writer is finished before returning.
pub fn filter_reads<S, M, W>(
    source: &mut S,
    matcher: &M,
    writer: &mut RecordWriter<W>,
) -> Result<FilterSummary>
where
    S: ReadSource + ?Sized,
    M: PatternMatcher + ?Sized,
    W: Write,
{
    let mut summary = FilterSummary::default();
    while let Some(read) = source.next_read()? {
        if contains_any(matcher, read.seq) {
            summary.removed += 1;
        } else {
            writer.write_read(read)?;
            summary.kept += 1;
        }
    }
    writer.finish()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        io::{MemorySource, OwnedRead},
        AnyMatcher, BarcodeSet, Strategy,
    };

    fn read(header: &str, seq: &[u8], qual: bool) -> OwnedRead {
        OwnedRead {
            header: header.as_bytes().to_vec(),
            seq: seq.to_vec(),
            qual: qual.then(|| vec![b'I'; seq.len()]),
        }
    }

    #[test]
    fn test_contains_any() {
        let set = BarcodeSet::from_lines(vec![b"GATTACA".to_vec()]);
        let matcher = AnyMatcher::build(Strategy::Aho, set.patterns());
        assert!(contains_any(&matcher, b"xxGATTACAxx"));
        assert!(contains_any(&matcher, b"TGTAATC"));
        assert!(!contains_any(&matcher, b"GATTAC"));
        assert!(!contains_any(&matcher, b""));
    }

    #[test]
    fn test_filter_keeps_barcode_free_reads_in_order() {
        let set = BarcodeSet::from_lines(vec![b"AAAA".to_vec(), b"CCCC".to_vec()]);
        for strategy in [Strategy::Aho, Strategy::Kmp, Strategy::BitParallel] {
            let matcher = AnyMatcher::build(strategy, set.patterns());
            let mut source = MemorySource::new(vec![
                read("a", b"ACGTACGT", true),
                read("b", b"xxAAAAxx", true),
                read("c", b"GGGG", false),
                read("d", b"ACAC", false),
                read("e", b"TTTTT", true),
            ]);
            let mut writer = RecordWriter::new(Vec::new());
            let summary = filter_reads(&mut source, &matcher, &mut writer).unwrap();

            assert_eq!(summary, FilterSummary { kept: 2, removed: 3 });
            assert_eq!(
                String::from_utf8(writer.into_inner()).unwrap(),
                "@a\nACGTACGT\n+\nIIIIIIII\n>d\nACAC\n"
            );
        }
    }

    #[test]
    fn test_empty_barcode_set_keeps_everything() {
        let set = BarcodeSet::from_lines(Vec::new());
        let matcher = AnyMatcher::build(Strategy::Aho, set.patterns());
        let mut source = MemorySource::new(vec![read("a", b"ACGT", false)]);
        let mut writer = RecordWriter::new(Vec::new());
        let summary = filter_reads(&mut source, &matcher, &mut writer).unwrap();
        assert_eq!(summary, FilterSummary { kept: 1, removed: 0 });
    }
}
