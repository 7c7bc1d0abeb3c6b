//! Device-resident state vectors for adjoint Jacobian computation
//!
//! This crate provides the state-vector collaborator the adjoint engine
//! drives, together with the device machinery around it:
//!
//! - **DeviceStateVector**: a 2^n amplitude buffer bound to a device, with
//!   cache-resolved operation application, general matrix application,
//!   conjugate-linear inner products and scaled adds.
//! - **DevicePool / DeviceTag**: process-wide device availability tracking
//!   with RAII guards, and the per-state device identity that backs the
//!   device-consistency checks.
//! - **GateCache**: per-device matrices keyed by (name, parameter).
//! - **gates / kernels**: row-major gate and generator matrices, and the
//!   dense k-wire application loops.
//!
//! # Example
//!
//! ```
//! use qjac_state::{DeviceStateVector, DeviceTag};
//!
//! let mut sv = DeviceStateVector::new(2, DeviceTag::default());
//! sv.apply_operation("RX", &[0], false, &[0.3], None).unwrap();
//! let bra = sv.clone();
//! let overlap = bra.inner_product(&sv).unwrap();
//! assert!((overlap.re - 1.0).abs() < 1e-12);
//! ```

pub mod device;
pub mod gate_cache;
pub mod gates;
pub mod kernels;
pub mod state_vector;

pub use device::{DeviceGuard, DevicePool, DeviceTag};
pub use gate_cache::{GateCache, MatrixHandle};
pub use state_vector::DeviceStateVector;
