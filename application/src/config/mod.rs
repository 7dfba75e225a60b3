//! Application-level configuration.
//!
//! - [`ExecutionParams`] — generation overrides applied to every tool call

pub mod execution_params;

pub use execution_params::ExecutionParams;
