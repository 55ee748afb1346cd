//! Record writer for filtered reads.
//!
//! Reads are written back out in the format they arrived in: FASTQ when the
//! record carries a quality string, FASTA otherwise.

use std::io::Write;

use crate::{io::ReadRef, Result};

const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Buffered FASTA/FASTQ record writer.
///
/// Records are serialized into an internal buffer which is handed to the
/// underlying sink once it fills up, or on [`finish`](Self::finish).
///
/// # Examples
///
/// ```rust
/// use bcdemux::io::{ReadRef, RecordWriter};
///
/// # fn main() -> bcdemux::Result<()> {
/// let mut writer = RecordWriter::new(Vec::new());
/// writer.write_read(ReadRef { header: b"r1", seq: b"ACGT", qual: Some(&b"IIII"[..]) })?;
/// writer.write_read(ReadRef { header: b"r2", seq: b"GG", qual: None })?;
/// writer.finish()?;
///
/// assert_eq!(writer.records_written(), 2);
/// assert_eq!(writer.into_inner(), b"@r1\nACGT\n+\nIIII\n>r2\nGG\n");
/// # Ok(())
/// # }
/// ```
pub struct RecordWriter<W: Write> {
    /// Inner writer providing the data sink
    inner: W,

    /// Serialized records not yet handed to `inner`
    buffer: Vec<u8>,

    /// Number of records written so far
    records_written: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::with_capacity(DEFAULT_BUFFER_SIZE),
            records_written: 0,
        }
    }

    /// Returns the number of records written so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    fn flush_buffer(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.inner.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        Ok(())
    }

    /// Writes one read, as FASTQ if it has qualities and FASTA otherwise.
    pub fn write_read(&mut self, read: ReadRef<'_>) -> Result<()> {
        match read.qual {
            Some(qual) => {
                self.buffer.push(b'@');
                self.buffer.extend_from_slice(read.header);
                self.buffer.push(b'\n');
                self.buffer.extend_from_slice(read.seq);
                self.buffer.extend_from_slice(b"\n+\n");
                self.buffer.extend_from_slice(qual);
                self.buffer.push(b'\n');
            }
            None => {
                self.buffer.push(b'>');
                self.buffer.extend_from_slice(read.header);
                self.buffer.push(b'\n');
                self.buffer.extend_from_slice(read.seq);
                self.buffer.push(b'\n');
            }
        }
        self.records_written += 1;

        if self.buffer.len() >= DEFAULT_BUFFER_SIZE {
            self.flush_buffer()?;
        }
        Ok(())
    }

    /// Flushes all buffered records and the underlying writer.
    ///
    /// Must be called before the writer is dropped, otherwise buffered
    /// records are lost.
    pub fn finish(&mut self) -> Result<()> {
        self.flush_buffer()?;
        self.inner.flush()?;
        Ok(())
    }

    /// Consumes the writer and returns the underlying sink.
    ///
    /// Call [`finish`](Self::finish) first.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
