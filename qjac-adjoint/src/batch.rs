//! Multi-device batching of the adjoint sweep
//!
//! The observable list is partitioned into one contiguous shard per pool
//! device. Each shard runs the full sweep on its own device with private
//! state copies and a private Jacobian block; the orchestrator joins every
//! worker, surfaces the first shard error in shard order, and otherwise
//! merges the blocks into the caller's buffer in shard order.

use crate::jacobian::AdjointJacobian;
use crate::observable::Observable;
use num_complex::Complex64;
use qjac_core::{AdjointError, OperationsTape, Result};
use qjac_state::{DevicePool, DeviceTag};
use std::ops::Range;
use std::sync::Arc;
use std::thread;

/// Partition [0, num_items) into contiguous, possibly-empty intervals
///
/// The boundaries are `i·num_items/num_chunks`, which never overlap and
/// always cover the full range, including when `num_items` is smaller than
/// `num_chunks` or not a multiple of it.
pub fn shard_bounds(num_items: usize, num_chunks: usize) -> Vec<Range<usize>> {
    (0..num_chunks)
        .map(|chunk| {
            let start = chunk * num_items / num_chunks;
            let end = (chunk + 1) * num_items / num_chunks;
            start..end
        })
        .collect()
}

/// Compute a Jacobian with one shard worker per pool device
///
/// Semantics match [`AdjointJacobian::adjoint_jacobian`] on the same
/// inputs; the result is numerically identical to the single-device path.
/// Each worker blocks on device acquisition, builds its own copy of the
/// reference state on that device, runs the sweep with the observable
/// fan-out disabled, and releases the device on every exit path.
///
/// # Errors
/// Precondition failures surface synchronously before any worker starts.
/// A zero-device pool fails with [`AdjointError::DevicePoolExhausted`].
/// Shard errors are reported after all workers have stopped, first shard
/// first; the buffer contents are then unspecified.
pub fn batch_adjoint_jacobian(
    pool: &DevicePool,
    ref_state: &[Complex64],
    jac: &mut [f64],
    observables: &[Arc<Observable>],
    tape: &OperationsTape,
    trainable_params: &[usize],
    apply_operations: bool,
) -> Result<()> {
    if trainable_params.is_empty() {
        return Err(AdjointError::NoTrainableParams);
    }
    tape.validate_adjoint()?;

    let tp_size = trainable_params.len();
    let expected = observables.len() * tp_size;
    if jac.len() != expected {
        return Err(AdjointError::BufferSizeMismatch {
            expected,
            actual: jac.len(),
        });
    }

    let num_chunks = pool.total_devices();
    if num_chunks == 0 {
        return Err(AdjointError::DevicePoolExhausted { total: 0 });
    }

    let bounds = shard_bounds(observables.len(), num_chunks);

    let results: Vec<Result<Vec<f64>>> = thread::scope(|scope| {
        let handles: Vec<_> = bounds
            .iter()
            .map(|range| {
                let range = range.clone();
                scope.spawn(move || -> Result<Vec<f64>> {
                    let guard = pool.acquire();
                    let tag = DeviceTag::new(guard.device_id(), 0);

                    let shard = &observables[range];
                    let mut block = vec![0.0; shard.len() * tp_size];
                    AdjointJacobian::new()
                        .with_observable_parallelism(false)
                        .adjoint_jacobian(
                            ref_state,
                            &mut block,
                            shard,
                            tape,
                            trainable_params,
                            apply_operations,
                            tag,
                        )?;
                    Ok(block)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    });

    // All workers have finished; report the first failure in shard order
    let mut blocks = Vec::with_capacity(results.len());
    for result in results {
        blocks.push(result?);
    }

    for (range, block) in bounds.iter().zip(blocks) {
        let offset = range.start * tp_size;
        jac[offset..offset + block.len()].copy_from_slice(&block);
    }
    Ok(())
}
