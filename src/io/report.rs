//! Text report for the `analyze` command.

use std::io::Write;

use crate::{Analysis, Result};

/// Writes the analysis report.
///
/// When `diagnostics` is set, every mixed read contributes two lines first:
/// its header, then its distinct barcode ids (space-separated, first-seen
/// order). Then one `Barcode <id>: <count>` line per barcode and a final
/// `Mixed: <count>` line. Ids are 1-based.
///
/// # Examples
///
/// ```rust
/// use bcdemux::{io::write_report, Analysis, Tally};
///
/// # fn main() -> bcdemux::Result<()> {
/// let analysis = Analysis {
///     tally: Tally { counts: vec![1, 1], mixed: 1, reads: 3 },
///     mixed_reads: Vec::new(),
/// };
/// let mut out = Vec::new();
/// write_report(&mut out, &analysis, false)?;
/// assert_eq!(out, b"Barcode 1: 1\nBarcode 2: 1\nMixed: 1\n");
/// # Ok(())
/// # }
/// ```
pub fn write_report<W: Write>(mut writer: W, analysis: &Analysis, diagnostics: bool) -> Result<()> {
    if diagnostics {
        for read in &analysis.mixed_reads {
            writer.write_all(&read.header)?;
            writer.write_all(b"\n")?;
            for (i, id) in read.barcodes.iter().enumerate() {
                if i > 0 {
                    writer.write_all(b" ")?;
                }
                write!(writer, "{}", id + 1)?;
            }
            writer.write_all(b"\n")?;
        }
    }
    for (id, count) in analysis.tally.counts.iter().enumerate() {
        writeln!(writer, "Barcode {}: {}", id + 1, count)?;
    }
    writeln!(writer, "Mixed: {}", analysis.tally.mixed)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MixedRead, Tally};

    fn analysis() -> Analysis {
        Analysis {
            tally: Tally {
                counts: vec![3, 0, 7],
                mixed: 2,
                reads: 12,
            },
            mixed_reads: vec![
                MixedRead {
                    ordinal: 4,
                    header: b"read4 lane=1".to_vec(),
                    barcodes: vec![2, 0],
                },
                MixedRead {
                    ordinal: 9,
                    header: b"read9".to_vec(),
                    barcodes: vec![1, 2, 0],
                },
            ],
        }
    }

    #[test]
    fn test_counts_only() {
        let mut out = Vec::new();
        write_report(&mut out, &analysis(), false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Barcode 1: 3\nBarcode 2: 0\nBarcode 3: 7\nMixed: 2\n"
        );
    }

    #[test]
    fn test_diagnostics_precede_counts() {
        let mut out = Vec::new();
        write_report(&mut out, &analysis(), true).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "read4 lane=1\n3 1\nread9\n2 3 1\nBarcode 1: 3\nBarcode 2: 0\nBarcode 3: 7\nMixed: 2\n"
        );
    }

    #[test]
    fn test_no_barcodes() {
        let mut out = Vec::new();
        write_report(&mut out, &Analysis::default(), true).unwrap();
        assert_eq!(out, b"Mixed: 0\n");
    }
}
