//! Bounded worker pool for per-item work.
//!
//! Workers pull the next index from a shared cursor and store each outcome
//! in that item's slot, so results come back in input order no matter which
//! thread finished first. With one job everything runs on the caller's
//! thread, strictly in order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

use tracing::trace;

use crate::core::cancel::Cancellation;

/// Run `work` over `items` with up to `jobs` threads.
///
/// Returns one slot per item: `None` if the item never started because
/// `cancel` fired first.
pub fn run<T, R, F>(items: &[T], jobs: usize, cancel: &Cancellation, work: F) -> Vec<Option<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let workers = jobs.clamp(1, items.len().max(1));

    if workers == 1 {
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            results.push((!cancel.is_cancelled()).then(|| work(item)));
        }
        return results;
    }

    trace!(workers, items = items.len(), "starting worker pool");

    let cursor = AtomicUsize::new(0);
    let slots: Mutex<Vec<Option<R>>> = Mutex::new(items.iter().map(|_| None).collect());

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                if cancel.is_cancelled() {
                    break;
                }
                let index = cursor.fetch_add(1, Ordering::SeqCst);
                let Some(item) = items.get(index) else {
                    break;
                };
                let result = work(item);
                slots.lock().unwrap_or_else(PoisonError::into_inner)[index] = Some(result);
            });
        }
    });

    slots.into_inner().unwrap_or_else(PoisonError::into_inner)
}
