//! Core domain concepts shared across all subdomains.
//!
//! - [`tier::ModelTier`] — ordered cost/capability bands (S < M < L < F)
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod tier;
