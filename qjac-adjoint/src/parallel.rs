//! Structured parallel-for with deterministic error aggregation
//!
//! Fan-outs over observables collect one `Result` per task and surface the
//! first failure in task order, regardless of how the tasks were scheduled.
//! Sequential execution (used inside shard workers to avoid oversubscribing
//! devices) takes the same code paths minus the thread pool.

use qjac_core::Result;
use rayon::prelude::*;

/// Map a fallible operation over a slice, preserving order
///
/// With `parallel` set, tasks run on the rayon pool; results are collected
/// per task and sequenced afterwards, so the first error in index order wins
/// deterministically.
pub(crate) fn try_map<T, R, F>(items: &[T], parallel: bool, op: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R> + Send + Sync,
{
    if parallel {
        let collected: Vec<Result<R>> = items.par_iter().map(&op).collect();
        collected.into_iter().collect()
    } else {
        items.iter().map(op).collect()
    }
}

/// Run a fallible mutation over every slice element, first error wins
pub(crate) fn try_for_each_mut<T, F>(items: &mut [T], parallel: bool, op: F) -> Result<()>
where
    T: Send,
    F: Fn(usize, &mut T) -> Result<()> + Send + Sync,
{
    if parallel {
        let collected: Vec<Result<()>> = items
            .par_iter_mut()
            .enumerate()
            .map(|(idx, item)| op(idx, item))
            .collect();
        collected.into_iter().collect()
    } else {
        items
            .iter_mut()
            .enumerate()
            .try_for_each(|(idx, item)| op(idx, item))
    }
}
