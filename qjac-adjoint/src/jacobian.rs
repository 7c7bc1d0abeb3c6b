//! The adjoint sweep engine
//!
//! Computes ∂⟨ψ|H_i|ψ⟩/∂θ_j for every observable H_i and trainable
//! parameter θ_j in a single backward pass over the tape (arXiv:2009.02823).
//! The ket λ is undone one operation at a time; a scratch bra μ holds the
//! state just after the current operation, so applying the operation's
//! generator to μ yields the derivative direction, and each Jacobian entry
//! is −2·c·Im⟨H_iλ|μ⟩.
//!
//! Cost is one state copy per observable plus two per sweep, independent of
//! the number of trainable parameters.

use crate::generator;
use crate::observable::Observable;
use crate::parallel;
use num_complex::Complex64;
use qjac_core::{AdjointError, OperationsTape, Result, TapeOp};
use qjac_state::{DeviceStateVector, DeviceTag};
use std::sync::Arc;

/// Adjoint-method Jacobian engine
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use qjac_adjoint::{AdjointJacobian, Observable};
/// use qjac_core::{OperationsTape, TapeOp};
/// use qjac_state::DeviceTag;
/// use std::sync::Arc;
///
/// let tape = OperationsTape::new(vec![
///     TapeOp::new("RX", &[0.4], &[0]),
///     TapeOp::new("CNOT", &[], &[0, 1]),
/// ]);
/// let obs = vec![Arc::new(Observable::named("PauliZ", &[1]))];
/// let state = vec![
///     Complex64::new(1.0, 0.0),
///     Complex64::new(0.0, 0.0),
///     Complex64::new(0.0, 0.0),
///     Complex64::new(0.0, 0.0),
/// ];
///
/// let mut jac = vec![0.0; 1];
/// AdjointJacobian::new()
///     .adjoint_jacobian(&state, &mut jac, &obs, &tape, &[0], true, DeviceTag::default())
///     .unwrap();
/// assert!((jac[0] - (-0.4f64.sin())).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct AdjointJacobian {
    parallel_observables: bool,
}

impl Default for AdjointJacobian {
    fn default() -> Self {
        Self::new()
    }
}

impl AdjointJacobian {
    /// Create an engine with parallel observable fan-out enabled
    pub fn new() -> Self {
        Self {
            parallel_observables: true,
        }
    }

    /// Enable or disable the per-observable fan-out
    ///
    /// Shard workers disable it so a multi-device batch does not
    /// oversubscribe the machine with one thread pool per device.
    pub fn with_observable_parallelism(mut self, parallel: bool) -> Self {
        self.parallel_observables = parallel;
        self
    }

    /// Fill `jac` with the Jacobian of every observable w.r.t. every
    /// trainable parameter
    ///
    /// `jac` is row-major with one row per observable and one column per
    /// trainable parameter; it is filled in place and never resized.
    /// `trainable_params` lists ascending positions among the parametric
    /// operations of the tape in forward order. With `apply_operations`
    /// set, the tape is first applied forward to `ref_state`; otherwise
    /// `ref_state` must already be the post-circuit state.
    ///
    /// # Errors
    /// [`AdjointError::NoTrainableParams`], [`AdjointError::BufferSizeMismatch`]
    /// and [`AdjointError::MultiParameterOperation`] surface before any
    /// state copy is made, leaving `jac` untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn adjoint_jacobian(
        &self,
        ref_state: &[Complex64],
        jac: &mut [f64],
        observables: &[Arc<Observable>],
        tape: &OperationsTape,
        trainable_params: &[usize],
        apply_operations: bool,
        tag: DeviceTag,
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
        if observables.is_empty() {
            return Ok(());
        }

        let parallel = self.parallel_observables;

        let mut lambda = DeviceStateVector::from_amplitudes(ref_state, tag)?;
        if apply_operations {
            apply_tape(&mut lambda, tape)?;
        }

        // One bra copy per observable: H_i|λ⟩
        let mut h_lambda: Vec<DeviceStateVector> =
            observables.iter().map(|_| lambda.clone()).collect();
        parallel::try_for_each_mut(&mut h_lambda, parallel, |idx, bra| {
            observables[idx].apply_in_place(bra)
        })?;

        let mut mu = lambda.clone();

        // Descending cursor into the trainable list and descending count of
        // parametric operations seen so far; after the decrement below,
        // `param_position` is the forward-order position of the current op
        // among all parametric operations.
        let mut cursor = tp_size;
        let mut param_position = tape.num_parametric_ops();

        for op_idx in (0..tape.len()).rev() {
            let op = tape.op(op_idx);
            if op.is_state_prep() {
                continue;
            }
            if cursor == 0 {
                break;
            }

            mu.update_from(&lambda)?;
            apply_adjoint_op(&mut lambda, op)?;

            if op.has_params() {
                param_position -= 1;
                if param_position == trainable_params[cursor - 1] {
                    let entry = generator::lookup(op.name())?;
                    (entry.apply)(&mut mu, op.wires(), !op.is_inverse())?;
                    let scale = if op.is_inverse() {
                        -entry.coefficient
                    } else {
                        entry.coefficient
                    };

                    let column = cursor - 1;
                    let updates = parallel::try_map(&h_lambda, parallel, |bra| {
                        Ok(-2.0 * scale * bra.inner_product(&mu)?.im)
                    })?;
                    for (row, value) in updates.into_iter().enumerate() {
                        jac[row * tp_size + column] = value;
                    }
                    cursor -= 1;
                }
            }

            parallel::try_for_each_mut(&mut h_lambda, parallel, |_, bra| {
                apply_adjoint_op(bra, op)
            })?;
        }

        Ok(())
    }
}

/// Apply the tape forward, skipping state-preparation records
fn apply_tape(sv: &mut DeviceStateVector, tape: &OperationsTape) -> Result<()> {
    for op in tape.ops() {
        if op.is_state_prep() {
            continue;
        }
        sv.apply_operation(op.name(), op.wires(), op.is_inverse(), op.params(), op.matrix())?;
    }
    Ok(())
}

/// Undo one recorded operation (apply it with the inverse flag toggled)
fn apply_adjoint_op(sv: &mut DeviceStateVector, op: &TapeOp) -> Result<()> {
    sv.apply_operation(
        op.name(),
        op.wires(),
        !op.is_inverse(),
        op.params(),
        op.matrix(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ground_state(num_qubits: usize) -> Vec<Complex64> {
        let mut v = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        v[0] = Complex64::new(1.0, 0.0);
        v
    }

    #[test]
    fn test_empty_trainable_list_fails_and_leaves_buffer() {
        let tape = OperationsTape::new(vec![TapeOp::new("RX", &[0.3], &[0])]);
        let obs = vec![Arc::new(Observable::named("PauliZ", &[0]))];
        let mut jac = vec![7.0; 1];

        let err = AdjointJacobian::new()
            .adjoint_jacobian(
                &ground_state(1),
                &mut jac,
                &obs,
                &tape,
                &[],
                true,
                DeviceTag::default(),
            )
            .unwrap_err();
        assert_eq!(err, AdjointError::NoTrainableParams);
        assert_eq!(jac, vec![7.0]);
    }

    #[test]
    fn test_multi_parameter_op_fails_before_device_work() {
        let tape = OperationsTape::new(vec![
            TapeOp::new("Rot", &[0.1, 0.2, 0.3], &[0]),
            TapeOp::new("RX", &[0.3], &[0]),
        ]);
        let obs = vec![Arc::new(Observable::named("PauliZ", &[0]))];
        let mut jac = vec![-1.0; 1];

        let err = AdjointJacobian::new()
            .adjoint_jacobian(
                &ground_state(1),
                &mut jac,
                &obs,
                &tape,
                &[0],
                true,
                DeviceTag::default(),
            )
            .unwrap_err();
        assert!(matches!(err, AdjointError::MultiParameterOperation { .. }));
        assert_eq!(jac, vec![-1.0]);
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let tape = OperationsTape::new(vec![TapeOp::new("RX", &[0.3], &[0])]);
        let obs = vec![Arc::new(Observable::named("PauliZ", &[0]))];
        let mut jac = vec![0.0; 3];

        let err = AdjointJacobian::new()
            .adjoint_jacobian(
                &ground_state(1),
                &mut jac,
                &obs,
                &tape,
                &[0],
                true,
                DeviceTag::default(),
            )
            .unwrap_err();
        assert_eq!(err, AdjointError::BufferSizeMismatch { expected: 1, actual: 3 });
    }

    #[test]
    fn test_rx_cnot_pauliz_scenario() {
        // d/dθ ⟨00| RX†CNOT† Z(1) CNOT RX |00⟩ = -sin(θ)
        let theta = 0.8234;
        let tape = OperationsTape::new(vec![
            TapeOp::new("RX", &[theta], &[0]),
            TapeOp::new("CNOT", &[], &[0, 1]),
        ]);
        let obs = vec![Arc::new(Observable::named("PauliZ", &[1]))];
        let mut jac = vec![0.0; 1];

        AdjointJacobian::new()
            .adjoint_jacobian(
                &ground_state(2),
                &mut jac,
                &obs,
                &tape,
                &[0],
                true,
                DeviceTag::default(),
            )
            .unwrap();
        assert_relative_eq!(jac[0], -theta.sin(), epsilon = 1e-10);
    }

    #[test]
    fn test_state_prep_record_is_skipped() {
        let theta = 0.41;
        let with_prep = OperationsTape::new(vec![
            TapeOp::new("BasisState", &[], &[0, 1]),
            TapeOp::new("RX", &[theta], &[0]),
            TapeOp::new("CNOT", &[], &[0, 1]),
        ]);
        let obs = vec![Arc::new(Observable::named("PauliZ", &[1]))];
        let mut jac = vec![0.0; 1];

        AdjointJacobian::new()
            .adjoint_jacobian(
                &ground_state(2),
                &mut jac,
                &obs,
                &with_prep,
                &[0],
                true,
                DeviceTag::default(),
            )
            .unwrap();
        assert_relative_eq!(jac[0], -theta.sin(), epsilon = 1e-10);
    }

    #[test]
    fn test_precomputed_state_without_forward_application() {
        // Hand the engine the post-circuit state and set apply_operations=false
        let theta = 1.1;
        let tape = OperationsTape::new(vec![TapeOp::new("RX", &[theta], &[0])]);
        let obs = vec![Arc::new(Observable::named("PauliZ", &[0]))];

        let mut prepared = DeviceStateVector::new(1, DeviceTag::default());
        prepared
            .apply_operation("RX", &[0], false, &[theta], None)
            .unwrap();

        let mut jac = vec![0.0; 1];
        AdjointJacobian::new()
            .adjoint_jacobian(
                prepared.amplitudes(),
                &mut jac,
                &obs,
                &tape,
                &[0],
                false,
                DeviceTag::default(),
            )
            .unwrap();
        assert_relative_eq!(jac[0], -theta.sin(), epsilon = 1e-10);
    }

    #[test]
    fn test_sequential_engine_matches_parallel() {
        let tape = OperationsTape::new(vec![
            TapeOp::new("RY", &[0.2], &[0]),
            TapeOp::new("CNOT", &[], &[0, 1]),
            TapeOp::new("RX", &[0.9], &[1]),
        ]);
        let obs = vec![
            Arc::new(Observable::named("PauliZ", &[0])),
            Arc::new(Observable::named("PauliZ", &[1])),
            Arc::new(Observable::named("PauliX", &[1])),
        ];
        let trainable = [0, 1];

        let mut jac_par = vec![0.0; obs.len() * trainable.len()];
        let mut jac_seq = vec![0.0; obs.len() * trainable.len()];
        AdjointJacobian::new()
            .adjoint_jacobian(
                &ground_state(2),
                &mut jac_par,
                &obs,
                &tape,
                &trainable,
                true,
                DeviceTag::default(),
            )
            .unwrap();
        AdjointJacobian::new()
            .with_observable_parallelism(false)
            .adjoint_jacobian(
                &ground_state(2),
                &mut jac_seq,
                &obs,
                &tape,
                &trainable,
                true,
                DeviceTag::default(),
            )
            .unwrap();
        assert_eq!(jac_par, jac_seq);
    }
}
