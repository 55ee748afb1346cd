//! Sequence reader for FASTA/FASTQ input.
//!
//! Records are pulled one at a time into buffers owned by the reader and lent
//! out as a [`ReadRef`]. The next pull overwrites those buffers, which the
//! borrow on the reader makes explicit.

use std::{
    borrow::Cow,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use needletail::{errors::ParseErrorKind, parse_fastx_reader};

use crate::{io::open_path, Result};

/// A borrowed sequencing read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRef<'a> {
    pub header: &'a [u8],
    pub seq: &'a [u8],
    /// Quality string, present for FASTQ records
    pub qual: Option<&'a [u8]>,
}
impl ReadRef<'_> {
    pub fn to_owned_read(&self) -> OwnedRead {
        OwnedRead {
            header: self.header.to_vec(),
            seq: self.seq.to_vec(),
            qual: self.qual.map(<[u8]>::to_vec),
        }
    }
}

/// An owned sequencing read, used when reads cross thread boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedRead {
    pub header: Vec<u8>,
    pub seq: Vec<u8>,
    pub qual: Option<Vec<u8>>,
}
impl OwnedRead {
    pub fn as_read_ref(&self) -> ReadRef<'_> {
        ReadRef {
            header: &self.header,
            seq: &self.seq,
            qual: self.qual.as_deref(),
        }
    }
}

/// Pull-based source of reads.
pub trait ReadSource {
    /// Fetches the next read, or `None` at end of input.
    ///
    /// The returned read borrows the source and is invalidated by the next
    /// call.
    fn next_read(&mut self) -> Result<Option<ReadRef<'_>>>;
}

/// In-memory source over owned reads.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    reads: Vec<OwnedRead>,
    pos: usize,
}
impl MemorySource {
    pub fn new(reads: Vec<OwnedRead>) -> Self {
        Self { reads, pos: 0 }
    }
}
impl ReadSource for MemorySource {
    fn next_read(&mut self) -> Result<Option<ReadRef<'_>>> {
        let read = self.reads.get(self.pos).map(OwnedRead::as_read_ref);
        self.pos += read.is_some() as usize;
        Ok(read)
    }
}

/// FASTA/FASTQ reader backed by `needletail`.
///
/// Format is detected from the first byte of the (decompressed) input. An
/// empty input yields no reads; a malformed record is a hard error.
pub struct SeqReader {
    inner: Option<Box<dyn needletail::FastxReader>>,
    header: Vec<u8>,
    seq: Vec<u8>,
    qual: Vec<u8>,
    has_qual: bool,
    /// Number of reads handed out so far
    count: u64,
}
impl SeqReader {
    /// Opens a (possibly compressed) FASTA/FASTQ file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(open_path(path)?)
    }

    /// Wraps any reader producing FASTA/FASTQ bytes.
    pub fn new<R: Read + Send + 'static>(reader: R) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let inner = if reader.fill_buf()?.is_empty() {
            None
        } else {
            match parse_fastx_reader(reader) {
                Ok(inner) => Some(inner),
                Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => None,
                Err(e) => return Err(e.into()),
            }
        };
        Ok(Self {
            inner,
            header: Vec::new(),
            seq: Vec::new(),
            qual: Vec::new(),
            has_qual: false,
            count: 0,
        })
    }

    /// Number of reads returned so far.
    pub fn reads_seen(&self) -> u64 {
        self.count
    }
}
impl ReadSource for SeqReader {
    fn next_read(&mut self) -> Result<Option<ReadRef<'_>>> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(None);
        };
        let record = match inner.next() {
            None => return Ok(None),
            Some(record) => record?,
        };

        self.header.clear();
        self.header.extend_from_slice(record.id());
        self.seq.clear();
        match record.seq() {
            Cow::Borrowed(seq) => self.seq.extend_from_slice(seq),
            Cow::Owned(seq) => self.seq = seq,
        }
        self.qual.clear();
        self.has_qual = match record.qual() {
            Some(qual) => {
                self.qual.extend_from_slice(qual);
                true
            }
            None => false,
        };
        self.count += 1;

        Ok(Some(ReadRef {
            header: &self.header,
            seq: &self.seq,
            qual: self.has_qual.then_some(self.qual.as_slice()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(mut source: impl ReadSource) -> Vec<OwnedRead> {
        let mut out = Vec::new();
        while let Some(read) = source.next_read().unwrap() {
            out.push(read.to_owned_read());
        }
        out
    }

    #[test]
    fn test_fastq_records() {
        let input = b"@r1 desc\nACGT\n+\nIIII\n@r2\nGG\n+\n!!\n".to_vec();
        let mut reader = SeqReader::new(Cursor::new(input)).unwrap();

        let first = reader.next_read().unwrap().unwrap();
        assert_eq!(first.header, b"r1 desc");
        assert_eq!(first.seq, b"ACGT");
        assert_eq!(first.qual, Some(b"IIII".as_slice()));

        let second = reader.next_read().unwrap().unwrap().to_owned_read();
        assert_eq!(second.seq, b"GG");
        assert!(reader.next_read().unwrap().is_none());
        assert_eq!(reader.reads_seen(), 2);
    }

    #[test]
    fn test_fasta_multiline() {
        let input = b">r1\nACGT\nTTGA\n>r2\nC\n".to_vec();
        let reads = collect(SeqReader::new(Cursor::new(input)).unwrap());
        assert_eq!(reads.len(), 2);
        assert_eq!(reads[0].header, b"r1");
        assert_eq!(reads[0].seq, b"ACGTTTGA");
        assert_eq!(reads[0].qual, None);
        assert_eq!(reads[1].seq, b"C");
    }

    #[test]
    fn test_empty_input_has_no_reads() {
        let reader = SeqReader::new(Cursor::new(Vec::new())).unwrap();
        assert!(collect(reader).is_empty());
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        let input = b"@r1\nACGT\n+\nII\n".to_vec();
        let mut reader = SeqReader::new(Cursor::new(input)).unwrap();
        assert!(reader.next_read().is_err());

        assert!(SeqReader::new(Cursor::new(b"not a sequence file\n".to_vec())).is_err());
    }

    #[test]
    fn test_memory_source() {
        let reads = vec![
            OwnedRead {
                header: b"a".to_vec(),
                seq: b"AC".to_vec(),
                qual: None,
            },
            OwnedRead {
                header: b"b".to_vec(),
                seq: b"GT".to_vec(),
                qual: Some(b"II".to_vec()),
            },
        ];
        assert_eq!(collect(MemorySource::new(reads.clone())), reads);
    }

    #[test]
    fn test_owned_round_trip() {
        let read = OwnedRead {
            header: b"h".to_vec(),
            seq: b"ACGT".to_vec(),
            qual: None,
        };
        assert_eq!(read.as_read_ref().to_owned_read(), read);
    }
}
