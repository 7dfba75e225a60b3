//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid model tier: {0}")]
    InvalidTier(String),

    #[error("Invalid tool registry: {0}")]
    InvalidRegistry(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl DomainError {
    /// Check if this error represents a failed tool lookup
    pub fn is_unknown_tool(&self) -> bool {
        matches!(self, DomainError::UnknownTool(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_display() {
        let error = DomainError::UnknownTool("nope.v1".to_string());
        assert_eq!(error.to_string(), "Unknown tool: nope.v1");
    }

    #[test]
    fn test_is_unknown_tool_check() {
        assert!(DomainError::UnknownTool("x".to_string()).is_unknown_tool());
        assert!(!DomainError::InvalidTier("Z".to_string()).is_unknown_tool());
        assert!(!DomainError::InvalidRequest("bad".to_string()).is_unknown_tool());
    }
}
