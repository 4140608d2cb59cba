//! Continuous-time linear time-invariant systems.
//!
//! Single-input single-output only: a transfer function is converted to a
//! controllable-canonical state-space model and simulated exactly between
//! samples with a first-order-hold input.

pub mod lsim;
pub mod matrix;
pub mod state_space;
pub mod transfer_function;

pub use lsim::lsim;
pub use matrix::Matrix;
pub use state_space::StateSpace;
pub use transfer_function::TransferFunction;
