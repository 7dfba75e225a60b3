//! Pipeline stages of a single tool request

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStage {
    Received,
    EntitlementChecked,
    SchemaValidated,
    BlockedFieldChecked,
    TierResolved,
    Dispatched,
    ResponseValidated,
    Returned,
}

impl ProcessStage {
    /// All stages in pipeline order
    pub const ALL: [ProcessStage; 8] = [
        ProcessStage::Received,
        ProcessStage::EntitlementChecked,
        ProcessStage::SchemaValidated,
        ProcessStage::BlockedFieldChecked,
        ProcessStage::TierResolved,
        ProcessStage::Dispatched,
        ProcessStage::ResponseValidated,
        ProcessStage::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStage::Received => "received",
            ProcessStage::EntitlementChecked => "entitlement-checked",
            ProcessStage::SchemaValidated => "schema-validated",
            ProcessStage::BlockedFieldChecked => "blocked-field-checked",
            ProcessStage::TierResolved => "tier-resolved",
            ProcessStage::Dispatched => "dispatched",
            ProcessStage::ResponseValidated => "response-validated",
            ProcessStage::Returned => "returned",
        }
    }

    /// Index in pipeline order, starting at 1
    pub fn ordinal(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .map_or(Self::ALL.len(), |i| i + 1)
    }
}

impl fmt::Display for ProcessStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
