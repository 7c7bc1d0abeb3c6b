//! Adjoint-method Jacobians of quantum-circuit expectation values
//!
//! This crate implements the adjoint differentiation method of
//! arXiv:2009.02823 against the device-resident state-vector backend from
//! `qjac-state`: one backward pass over the operations tape produces the
//! derivative of every observable's expectation value with respect to every
//! trainable parameter, at a cost roughly independent of the parameter
//! count.
//!
//! # Components
//!
//! - [`Observable`]: immutable measurement operators (named, dense
//!   Hermitian, tensor product, Hamiltonian).
//! - [`generator`]: the registry mapping parametric gate names to their
//!   Hermitian generator actions and scaling coefficients.
//! - [`AdjointJacobian`]: the single-device sweep engine.
//! - [`batch_adjoint_jacobian`]: the multi-device variant, sharding
//!   observables across a [`qjac_state::DevicePool`].
//!
//! # Example
//!
//! ```
//! use num_complex::Complex64;
//! use qjac_adjoint::{AdjointJacobian, Observable};
//! use qjac_core::{OperationsTape, TapeOp};
//! use qjac_state::DeviceTag;
//! use std::sync::Arc;
//!
//! let tape = OperationsTape::new(vec![
//!     TapeOp::new("RY", &[0.25], &[0]),
//! ]);
//! let observables = vec![Arc::new(Observable::named("PauliZ", &[0]))];
//! let state = vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
//!
//! let mut jacobian = vec![0.0; 1];
//! AdjointJacobian::new()
//!     .adjoint_jacobian(
//!         &state,
//!         &mut jacobian,
//!         &observables,
//!         &tape,
//!         &[0],
//!         true,
//!         DeviceTag::default(),
//!     )
//!     .unwrap();
//! // d/dθ ⟨0|RY†(θ) Z RY(θ)|0⟩ = -sin(θ)
//! assert!((jacobian[0] + 0.25f64.sin()).abs() < 1e-10);
//! ```

pub mod batch;
pub mod generator;
pub mod jacobian;
pub mod observable;
mod parallel;

pub use batch::{batch_adjoint_jacobian, shard_bounds};
pub use generator::{GeneratorEntry, GeneratorFn, GENERATORS};
pub use jacobian::AdjointJacobian;
pub use observable::Observable;
