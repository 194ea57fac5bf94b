//! Bounded pull-based worker pool on OS threads.
//!
//! Workers pop the next sample from a shared queue as soon as they finish the
//! previous one, so at most `workers` samples are in flight and uneven test
//! durations never leave a worker idle while work remains. Each sample is
//! owned by exactly one worker from the moment it is popped until it is sent
//! back on the results channel.

use std::collections::VecDeque;
use std::io;
use std::sync::{Mutex, MutexGuard, mpsc};
use std::thread;

use tracing::{Span, warn};

use crate::error::{Error, Result};
use crate::model::WorkItem;

type Queue = Mutex<VecDeque<WorkItem>>;

fn lock(queue: &Queue) -> MutexGuard<'_, VecDeque<WorkItem>> {
    queue.lock().unwrap_or_else(|e| e.into_inner())
}

/// Empties the queue if its worker unwinds, so the others stop pulling.
struct AbortOnPanic<'a>(&'a Queue);

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            lock(self.0).clear();
        }
    }
}

/// Process every item on up to `workers` threads.
///
/// Items come back in completion order. `thread_limit` caps how many threads
/// may be started; reaching it fails the run like an OS refusal would.
pub(crate) fn run<F>(
    items: Vec<WorkItem>,
    workers: usize,
    thread_limit: Option<usize>,
    span: &Span,
    process: F,
) -> Result<Vec<WorkItem>>
where
    F: Fn(usize, WorkItem) -> WorkItem + Sync,
{
    let total = items.len();
    if total == 0 {
        return Ok(Vec::new());
    }
    let requested_workers = workers;
    let workers = workers.clamp(1, total);

    let queue: Queue = Mutex::new(VecDeque::from(items));
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);

        for worker in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            let process = &process;
            let span = span.clone();

            let spawned = if thread_limit.is_some_and(|limit| worker >= limit) {
                Err(io::Error::new(
                    io::ErrorKind::WouldBlock,
                    "worker thread limit reached",
                ))
            } else {
                thread::Builder::new()
                    .name(format!("assay-worker-{worker}"))
                    .spawn_scoped(scope, move || {
                        let _enter = span.enter();
                        let _abort = AbortOnPanic(queue);
                        loop {
                            // Bind first so the lock is released before the test runs.
                            let next = lock(queue).pop_front();
                            let Some(item) = next else { break };
                            if tx.send(process(worker, item)).is_err() {
                                break;
                            }
                        }
                    })
            };

            match spawned {
                Ok(handle) => handles.push((worker, handle)),
                Err(source) => {
                    warn!(worker, error = %source, "failed to start worker, aborting batch");
                    lock(queue).clear();
                    for (_, handle) in handles {
                        let _ = handle.join();
                    }
                    return Err(Error::ResourceExhausted {
                        requested_workers,
                        items: total,
                        source,
                    });
                }
            }
        }
        drop(tx);

        let mut panicked = None;
        for (worker, handle) in handles {
            if handle.join().is_err() {
                panicked.get_or_insert(worker);
            }
        }
        match panicked {
            Some(worker) => Err(Error::WorkerPanicked { worker }),
            None => Ok(()),
        }
    })?;

    let processed: Vec<WorkItem> = rx.try_iter().collect();
    if processed.len() != total {
        return Err(Error::Other(format!(
            "worker pool returned {} of {total} samples",
            processed.len()
        )));
    }
    Ok(processed)
}
