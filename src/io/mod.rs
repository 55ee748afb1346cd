//! I/O boundary: opening inputs, reading sequence records and writing results.

mod reader;
mod report;
mod writer;

pub use reader::{MemorySource, OwnedRead, ReadRef, ReadSource, SeqReader};
pub use report::write_report;
pub use writer::RecordWriter;

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::{DemuxError, Result};

pub(crate) type BoxedReader = Box<dyn Read + Send>;
pub(crate) type BoxedWriter = Box<dyn Write + Send>;

/// Bytes niffler needs to identify a compression format.
#[cfg(feature = "niffler")]
const SNIFF_LEN: usize = 5;

/// Opens `path` for buffered reading.
///
/// Compressed files (gzip, bzip2, zstd, ...) are decompressed transparently
/// when the `niffler` feature is enabled. Files too short to carry a
/// compression header are read as-is.
pub fn open_path<P: AsRef<Path>>(path: P) -> Result<BoxedReader> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DemuxError::open(path, e))?;
    #[allow(unused_mut)]
    let mut rdr = BufReader::new(file);

    #[cfg(feature = "niffler")]
    {
        if rdr.fill_buf()?.len() < SNIFF_LEN {
            return Ok(Box::new(rdr));
        }
        let (pt, _format) = niffler::send::get_reader(Box::new(rdr))?;
        Ok(pt)
    }
    #[cfg(not(feature = "niffler"))]
    {
        Ok(Box::new(rdr))
    }
}

/// Opens the output sink: the file at `path`, or standard output.
pub fn open_output<P: AsRef<Path>>(path: Option<P>) -> Result<BoxedWriter> {
    match path {
        Some(path) => {
            let path = path.as_ref();
            let file = File::create(path).map_err(|e| DemuxError::open(path, e))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
    }
}
