//! Parallel worker pool (component D): one thread per participating
//! entry, joined before the engine continues. Not a retained pool — a
//! fresh `std::thread::scope` is opened for every call, so no threads
//! outlive a single read/write call.
//!
//! Very wide stripes are processed in batches of at most `max_fanout`
//! threads live at once, rather than one scope spawning every thread
//! simultaneously.

use std::thread;

use crate::error::{Result, ScatgatError};
use crate::plan::entry::StripeEntry;

/// Runs `f` against every entry in `entries`, one thread per entry, never
/// more than `max_fanout` threads live simultaneously. Each worker touches
/// only the single entry it was handed; the engine touches no entry while
/// any worker in its batch is live.
pub fn run_fanout<F, T>(entries: &mut [StripeEntry], max_fanout: usize, f: F) -> Result<Vec<T>>
where
    F: Fn(&mut StripeEntry) -> T + Sync,
    T: Send,
{
    let batch_size = max_fanout.max(1);
    let mut results = Vec::with_capacity(entries.len());

    for batch in entries.chunks_mut(batch_size) {
        let batch_results = thread::scope(|scope| -> Result<Vec<T>> {
            let mut handles = Vec::with_capacity(batch.len());
            for entry in batch.iter_mut() {
                let handle = thread::Builder::new()
                    .spawn_scoped(scope, || f(entry))
                    .map_err(ScatgatError::Spawn)?;
                handles.push(handle);
            }
            let mut out = Vec::with_capacity(handles.len());
            for handle in handles {
                out.push(handle.join().expect("scatgat worker thread panicked"));
            }
            Ok(out)
        })?;
        results.extend(batch_results);
    }

    Ok(results)
}

/// Like [`run_fanout`], but `f` also receives each entry's index within
/// `entries` — used by the write engine to look up a per-cycle block
/// assignment keyed by entry index.
pub fn run_fanout_indexed<F, T>(entries: &mut [StripeEntry], max_fanout: usize, f: F) -> Result<Vec<T>>
where
    F: Fn(usize, &mut StripeEntry) -> T + Sync,
    T: Send,
{
    let batch_size = max_fanout.max(1);
    let mut results = Vec::with_capacity(entries.len());

    for (batch_start, batch) in entries.chunks_mut(batch_size).enumerate().map(|(i, b)| (i * batch_size, b)) {
        let batch_results = thread::scope(|scope| -> Result<Vec<T>> {
            let mut handles = Vec::with_capacity(batch.len());
            for (offset, entry) in batch.iter_mut().enumerate() {
                let idx = batch_start + offset;
                let handle = thread::Builder::new()
                    .spawn_scoped(scope, move || f(idx, entry))
                    .map_err(ScatgatError::Spawn)?;
                handles.push(handle);
            }
            let mut out = Vec::with_capacity(handles.len());
            for handle in handles {
                out.push(handle.join().expect("scatgat worker thread panicked"));
            }
            Ok(out)
        })?;
        results.extend(batch_results);
    }

    Ok(results)
}
