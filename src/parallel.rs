//! Parallel read processing.
//!
//! Reads are independent once the matcher is built, so a run can be split
//! across threads. Each thread owns a clone of the processor (and therefore
//! its own private tallies); the shared matcher is only ever read. The
//! caller reduces the returned processors once the input is exhausted.

use std::thread;

use log::debug;

use crate::{
    io::{OwnedRead, ReadRef, ReadSource},
    DemuxError, Result,
};

/// Number of reads pulled from the source per dispatch round.
pub const BATCH_SIZE: usize = 16 * 1024;

/// Trait for types that can process reads in parallel.
///
/// Each worker thread receives its own clone of the processor.
pub trait ParallelProcessor: Send + Clone {
    /// Process a single read at 0-based input position `ordinal`
    fn process_read(&mut self, ordinal: u64, read: ReadRef<'_>) -> Result<()>;

    /// Called when a thread finishes processing its share of a batch
    /// Default implementation does nothing
    fn on_batch_complete(&mut self) -> Result<()> {
        Ok(())
    }

    /// Set the thread ID for this processor
    ///
    /// Each thread should call this method with its own unique ID.
    fn set_tid(&mut self, _tid: usize) {
        // Default implementation does nothing
    }

    /// Get the thread ID for this processor
    fn get_tid(&self) -> Option<usize> {
        None
    }
}

/// Resolves a requested thread count.
///
/// `0` means every available core; any other value is capped at the number
/// of cores.
pub fn resolve_threads(num_threads: usize) -> usize {
    let available = num_cpus::get();
    if num_threads == 0 {
        available
    } else {
        num_threads.min(available)
    }
}

/// Fills `batch` with up to [`BATCH_SIZE`] owned reads.
///
/// Returns `false` once the source is exhausted.
fn fill_batch<S: ReadSource + ?Sized>(source: &mut S, batch: &mut Vec<OwnedRead>) -> Result<bool> {
    batch.clear();
    while batch.len() < BATCH_SIZE {
        match source.next_read()? {
            Some(read) => batch.push(read.to_owned_read()),
            None => return Ok(false),
        }
    }
    Ok(true)
}

/// Processes every read of `source` on `num_threads` worker threads.
///
/// Reads are pulled in batches on the calling thread; each batch is split
/// into contiguous chunks, one per worker. Returns the worker processors,
/// indexed by thread id, for the caller to reduce.
pub fn process_parallel<S, P>(source: &mut S, processor: P, num_threads: usize) -> Result<Vec<P>>
where
    S: ReadSource + ?Sized,
    P: ParallelProcessor,
{
    let num_threads = resolve_threads(num_threads);
    if num_threads == 0 {
        return Err(DemuxError::InvalidThreads(num_threads));
    }
    debug!("Processing reads on {num_threads} threads");

    let mut workers: Vec<P> = (0..num_threads)
        .map(|tid| {
            let mut worker = processor.clone();
            worker.set_tid(tid);
            worker
        })
        .collect();

    let mut batch = Vec::with_capacity(BATCH_SIZE);
    let mut ordinal = 0u64;
    let mut more = true;
    while more {
        more = fill_batch(source, &mut batch)?;
        if batch.is_empty() {
            break;
        }

        let chunk_size = batch.len().div_ceil(num_threads);
        let batch_start = ordinal;
        thread::scope(|scope| -> Result<()> {
            let handles: Vec<_> = workers
                .iter_mut()
                .zip(batch.chunks(chunk_size))
                .enumerate()
                .map(|(i, (worker, chunk))| {
                    let chunk_start = batch_start + (i * chunk_size) as u64;
                    scope.spawn(move || -> Result<()> {
                        for (offset, read) in chunk.iter().enumerate() {
                            worker.process_read(chunk_start + offset as u64, read.as_read_ref())?;
                        }
                        worker.on_batch_complete()
                    })
                })
                .collect();

            for (tid, handle) in handles.into_iter().enumerate() {
                handle.join().map_err(|_| DemuxError::WorkerPanic { tid })??;
            }
            Ok(())
        })?;
        ordinal += batch.len() as u64;
    }

    debug!("Processed {ordinal} reads");
    Ok(workers)
}
