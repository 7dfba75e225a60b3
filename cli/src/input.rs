//! JSON arguments given inline, as `@file`, or as `-` for stdin

use anyhow::{Context, Result, bail};
use ellen_domain::UserEntitlements;
use ellen_presentation::PayloadArgs;
use serde_json::Value;
use std::io::Read;

const STDIN: &str = "-";

/// Parsed payload and optional inline entitlements of one command
pub struct PayloadInput {
    pub payload: Value,
    pub entitlements: Option<UserEntitlements>,
}

impl PayloadInput {
    pub fn read(args: &PayloadArgs) -> Result<Self> {
        if args.payload == STDIN && args.entitlements.as_deref() == Some(STDIN) {
            bail!("Only one of the payload and --entitlements can be read from stdin");
        }

        let payload = read_json_arg(&args.payload).context("Could not read payload")?;
        let entitlements = args
            .entitlements
            .as_deref()
            .map(|arg| {
                let value = read_json_arg(arg)?;
                serde_json::from_value::<UserEntitlements>(value)
                    .context("Entitlements do not match the expected shape")
            })
            .transpose()
            .context("Could not read --entitlements")?;

        Ok(Self {
            payload,
            entitlements,
        })
    }
}

pub fn read_json_arg(arg: &str) -> Result<Value> {
    let (text, source) = if arg == STDIN {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Could not read stdin")?;
        (text, "stdin".to_string())
    } else if let Some(path) = arg.strip_prefix('@') {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("Could not read {}", path))?;
        (text, path.to_string())
    } else {
        (arg.to_string(), "inline argument".to_string())
    };

    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", source))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(payload: &str, entitlements: Option<&str>) -> PayloadArgs {
        PayloadArgs {
            tool: "formative_check.v1.0".to_string(),
            payload: payload.to_string(),
            entitlements: entitlements.map(str::to_string),
        }
    }

    #[test]
    fn test_inline_payload() {
        let value = read_json_arg(r#"{"user_response": "F=ma"}"#).unwrap();
        assert_eq!(value["user_response"], "F=ma");
    }

    #[test]
    fn test_file_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        std::fs::write(&path, r#"{"topic": "waves"}"#).unwrap();

        let value = read_json_arg(&format!("@{}", path.display())).unwrap();
        assert_eq!(value["topic"], "waves");
    }

    #[test]
    fn test_invalid_json_names_the_source() {
        let err = read_json_arg("{nope").unwrap_err();
        assert!(err.to_string().contains("inline argument"));
    }

    #[test]
    fn test_entitlements_are_typed() {
        let input = PayloadInput::read(&args(
            "{}",
            Some(r#"{"available_tiers": ["S"], "usage": {"requests_today": 3}}"#),
        ))
        .unwrap();
        let ents = input.entitlements.unwrap();
        assert_eq!(ents.usage.requests_today, 3);
        assert_eq!(ents.available_tiers.len(), 1);
    }

    #[test]
    fn test_stdin_only_once() {
        assert!(PayloadInput::read(&args("-", Some("-"))).is_err());
    }
}
