//! Error types shared across the QJAC workspace

use thiserror::Error;

/// Errors raised by tape validation, observable construction, state-vector
/// operations and the adjoint sweep.
///
/// Configuration and argument errors are raised synchronously before any
/// device work starts; errors inside parallel fan-outs are collected per
/// task and the first one (in task order) is re-raised once all siblings
/// have stopped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdjointError {
    /// Two tensor-product factors act on the same wire
    #[error("tensor product factors must act on disjoint wires; wire {wire} is repeated")]
    OverlappingWires { wire: usize },

    /// Hamiltonian coefficient and term counts differ
    #[error("Hamiltonian has {coeffs} coefficients but {terms} terms")]
    CoefficientMismatch { coeffs: usize, terms: usize },

    /// The trainable-parameter list is empty
    #[error("no trainable parameters provided")]
    NoTrainableParams,

    /// Jacobian buffer size does not match observables × trainable parameters
    #[error("Jacobian buffer holds {actual} entries, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// An operation carries more than one numeric parameter
    #[error(
        "operation '{name}' has {num_params} parameters; \
         the adjoint method supports at most one"
    )]
    MultiParameterOperation { name: String, num_params: usize },

    /// A parametric operation was given without its parameter value
    #[error("operation '{name}' requires a parameter")]
    MissingParameter { name: String },

    /// No generator is registered for a parametric operation
    #[error("no generator registered for operation '{name}'")]
    UnknownGenerator { name: String },

    /// Operation name is not recognized and no explicit matrix was given
    #[error("unknown operation '{name}' and no explicit matrix provided")]
    UnknownOperation { name: String },

    /// Two state vectors participating in one operation live on different devices
    #[error("state vectors live on different devices: {left} vs {right}")]
    DeviceMismatch { left: usize, right: usize },

    /// Buffer length does not match the expected dimension
    #[error("dimension mismatch: expected {expected} amplitudes, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Wire index outside the register
    #[error("invalid wire {wire} for a {num_qubits}-qubit state")]
    InvalidWire { wire: usize, num_qubits: usize },

    /// Non-blocking device acquisition found no free device
    #[error("no free device in a pool of {total}")]
    DevicePoolExhausted { total: usize },
}

/// Result type used throughout the workspace
pub type Result<T> = std::result::Result<T, AdjointError>;
