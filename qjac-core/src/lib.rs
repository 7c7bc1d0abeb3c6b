//! Core types for adjoint-method Jacobian computation
//!
//! This crate provides the pieces shared by the state backend and the
//! adjoint engine:
//!
//! - **Error taxonomy**: configuration, argument, unsupported-operation,
//!   device-consistency and resource-exhaustion failures as one enum.
//! - **Operations tape**: the ordered, immutable record of gate operations
//!   a Jacobian computation walks backward over.

pub mod error;
pub mod tape;

pub use error::{AdjointError, Result};
pub use tape::{OperationsTape, TapeOp};
