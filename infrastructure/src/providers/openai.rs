//! OpenAI-compatible chat completions gateway
//!
//! One `POST {base_url}/chat/completions` per call with a system and a user
//! message. Request building and response parsing are plain functions so
//! they can be tested without a server.

use crate::config::FileOpenAiConfig;
use async_trait::async_trait;
use ellen_application::{Completion, CompletionRequest, GatewayError, LlmGateway};
use ellen_domain::util::preview;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

const ERROR_BODY_PREVIEW: usize = 200;

pub struct OpenAiCompatibleGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ellen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    pub fn from_config(config: &FileOpenAiConfig) -> Result<Self, GatewayError> {
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            warn!(
                env = %config.api_key_env,
                "No API key configured; requests are sent unauthenticated"
            );
        }
        Self::new(
            config.base_url.as_str(),
            api_key,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Chat completions request body
pub fn build_request_body(request: &CompletionRequest) -> Value {
    json!({
        "model": request.model_id,
        "messages": [
            { "role": "system", "content": request.system_prompt },
            { "role": "user", "content": request.user_prompt },
        ],
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
    })
}

/// First choice's message content plus `usage.total_tokens`
pub fn parse_response(body: &Value) -> Result<Completion, GatewayError> {
    let text = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            GatewayError::UnexpectedContent(format!(
                "no choices[0].message.content in {}",
                preview(&body.to_string(), ERROR_BODY_PREVIEW)
            ))
        })?;

    let completion = Completion::new(text);
    Ok(
        match body
            .pointer("/usage/total_tokens")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
        {
            Some(tokens) => completion.with_tokens_used(tokens),
            None => completion,
        },
    )
}

fn map_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

fn map_status(status: StatusCode, model_id: &str, body: &str) -> GatewayError {
    match status {
        StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(model_id.to_string()),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(format!(
            "HTTP {}: {}",
            status,
            preview(body, ERROR_BODY_PREVIEW)
        )),
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatibleGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, GatewayError> {
        let body = build_request_body(&request);
        debug!(
            model = %request.model_id,
            endpoint = %self.endpoint(),
            "Sending completion request"
        );

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await.map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status(status, &request.model_id, &text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::UnexpectedContent(e.to_string()))?;
        parse_response(&body)
    }
}
