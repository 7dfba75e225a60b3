//! Orchestration domain
//!
//! The request pipeline is a fixed sequence of [`ProcessStage`]s. Any
//! failing check short-circuits straight to [`ProcessStage::Returned`].

pub mod stage;

pub use stage::ProcessStage;
