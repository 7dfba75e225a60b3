//! Generation overrides from TOML (`[execution]` section)

use super::ConfigValidationError;
use ellen_application::ExecutionParams;
use serde::{Deserialize, Serialize};

/// Overrides applied on top of every tool's own generation parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl FileExecutionConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_tokens == Some(0) {
            return Err(ConfigValidationError::InvalidMaxTokens);
        }
        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigValidationError::InvalidTemperature(t));
        }
        Ok(())
    }

    pub fn to_params(&self) -> ExecutionParams {
        ExecutionParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_params() {
        let config = FileExecutionConfig {
            max_tokens: Some(256),
            temperature: None,
        };
        assert_eq!(config.to_params(), ExecutionParams::default().with_max_tokens(256));
    }

    #[test]
    fn test_temperature_range() {
        let config = FileExecutionConfig {
            temperature: Some(2.5),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTemperature(2.5))
        );
    }
}
