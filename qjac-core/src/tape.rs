//! Ordered, immutable records of gate operations forming a circuit
//!
//! A tape is supplied once per Jacobian computation and read by the adjoint
//! sweep in reverse. Each record carries at most one numeric parameter; the
//! adjoint method is undefined for multi-parameter gates, and
//! [`OperationsTape::validate_adjoint`] rejects such tapes before any device
//! work starts.

use crate::error::{AdjointError, Result};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Operation names that set the initial state rather than applying a gate.
///
/// These are skipped entirely by the adjoint sweep: never undone, never
/// differentiated.
const STATE_PREP_OPS: [&str; 2] = ["QubitStateVector", "BasisState"];

/// A single gate operation recorded on a tape
///
/// # Example
/// ```
/// use qjac_core::TapeOp;
///
/// let rx = TapeOp::new("RX", &[0.3], &[0]);
/// let cnot = TapeOp::new("CNOT", &[], &[0, 1]);
/// assert!(rx.has_params());
/// assert!(!cnot.has_params());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapeOp {
    name: String,
    params: SmallVec<[f64; 1]>,
    wires: SmallVec<[usize; 2]>, // Most gates are 1-2 wires
    inverse: bool,
    matrix: Option<Vec<Complex64>>,
}

impl TapeOp {
    /// Create a new operation record
    pub fn new(name: impl Into<String>, params: &[f64], wires: &[usize]) -> Self {
        Self {
            name: name.into(),
            params: SmallVec::from_slice(params),
            wires: SmallVec::from_slice(wires),
            inverse: false,
            matrix: None,
        }
    }

    /// Mark this operation as the inverse of its named gate
    pub fn inverted(mut self) -> Self {
        self.inverse = true;
        self
    }

    /// Attach an explicit row-major unitary for a custom gate
    pub fn with_matrix(mut self, matrix: Vec<Complex64>) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// The gate name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric parameters (0 or 1 for adjoint-differentiable tapes)
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// First numeric parameter, if any
    pub fn first_param(&self) -> Option<f64> {
        self.params.first().copied()
    }

    /// Wires the operation acts on
    pub fn wires(&self) -> &[usize] {
        &self.wires
    }

    /// Whether the recorded operation is the inverse of the named gate
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Explicit matrix for custom gates, if attached
    pub fn matrix(&self) -> Option<&[Complex64]> {
        self.matrix.as_deref()
    }

    /// Whether this operation carries at least one numeric parameter
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Whether this operation sets the initial state instead of applying a gate
    pub fn is_state_prep(&self) -> bool {
        STATE_PREP_OPS.contains(&self.name.as_str())
    }
}

/// An ordered, immutable sequence of operations
///
/// The number of parametric operations is precomputed at construction; the
/// adjoint sweep uses it to map tape positions onto trainable-parameter
/// indices (positions among parametric operations in forward order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationsTape {
    ops: Vec<TapeOp>,
    num_parametric_ops: usize,
}

impl OperationsTape {
    /// Build a tape from a sequence of operation records
    pub fn new(ops: Vec<TapeOp>) -> Self {
        let num_parametric_ops = ops.iter().filter(|op| op.has_params()).count();
        Self {
            ops,
            num_parametric_ops,
        }
    }

    /// Number of recorded operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the tape holds no operations
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// All operation records in forward order
    pub fn ops(&self) -> &[TapeOp] {
        &self.ops
    }

    /// The record at a given forward-order position
    pub fn op(&self, idx: usize) -> &TapeOp {
        &self.ops[idx]
    }

    /// Number of operations carrying a numeric parameter
    pub fn num_parametric_ops(&self) -> usize {
        self.num_parametric_ops
    }

    /// Reject tapes the adjoint method cannot differentiate
    ///
    /// Every operation must carry at most one numeric parameter. Runs over
    /// the whole tape so the failure surfaces before any state copies are
    /// made, with no partial output.
    pub fn validate_adjoint(&self) -> Result<()> {
        for op in &self.ops {
            if op.params.len() > 1 {
                return Err(AdjointError::MultiParameterOperation {
                    name: op.name.clone(),
                    num_params: op.params.len(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parametric_op_count() {
        let tape = OperationsTape::new(vec![
            TapeOp::new("Hadamard", &[], &[0]),
            TapeOp::new("RX", &[0.5], &[0]),
            TapeOp::new("CNOT", &[], &[0, 1]),
            TapeOp::new("RZ", &[1.2], &[1]),
        ]);
        assert_eq!(tape.len(), 4);
        assert_eq!(tape.num_parametric_ops(), 2);
    }

    #[test]
    fn test_state_prep_detection() {
        assert!(TapeOp::new("QubitStateVector", &[], &[0, 1]).is_state_prep());
        assert!(TapeOp::new("BasisState", &[], &[0]).is_state_prep());
        assert!(!TapeOp::new("RX", &[0.1], &[0]).is_state_prep());
    }

    #[test]
    fn test_validate_rejects_multi_parameter_ops() {
        let tape = OperationsTape::new(vec![
            TapeOp::new("RX", &[0.5], &[0]),
            TapeOp::new("Rot", &[0.1, 0.2, 0.3], &[0]),
        ]);
        let err = tape.validate_adjoint().unwrap_err();
        assert_eq!(
            err,
            AdjointError::MultiParameterOperation {
                name: "Rot".into(),
                num_params: 3,
            }
        );
    }

    #[test]
    fn test_validate_accepts_single_parameter_ops() {
        let tape = OperationsTape::new(vec![
            TapeOp::new("RY", &[0.5], &[0]),
            TapeOp::new("CNOT", &[], &[0, 1]).inverted(),
        ]);
        assert!(tape.validate_adjoint().is_ok());
    }

    #[test]
    fn test_inverted_builder() {
        let op = TapeOp::new("S", &[], &[2]).inverted();
        assert!(op.is_inverse());
        assert_eq!(op.wires(), &[2]);
    }

    #[test]
    fn test_tape_serialization() {
        let tape = OperationsTape::new(vec![
            TapeOp::new("RX", &[0.5], &[0]),
            TapeOp::new("CNOT", &[], &[0, 1]).inverted(),
        ]);
        let json = serde_json::to_string(&tape).unwrap();
        let deserialized: OperationsTape = serde_json::from_str(&json).unwrap();
        assert_eq!(tape, deserialized);
        assert_eq!(deserialized.num_parametric_ops(), 1);
    }
}
