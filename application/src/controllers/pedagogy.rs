//! Generic controller driving any [`Pedagogy`] through the model gateway

use super::ToolController;
use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway};
use async_trait::async_trait;
use ellen_domain::util::preview;
use ellen_domain::{ErrorKind, ModelTier, Pedagogy, ResponseMeta, TierModelMap, ToolResponse};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Controller for one pedagogical tool.
///
/// Flow: decode typed request → semantic checks → prompts → model call at
/// the resolved tier → parse → envelope. Parse fallbacks become warnings.
pub struct PedagogyController<P: Pedagogy> {
    pedagogy: P,
    gateway: Arc<dyn LlmGateway>,
    models: Arc<TierModelMap>,
    params: ExecutionParams,
}

impl<P: Pedagogy> PedagogyController<P> {
    pub fn new(
        pedagogy: P,
        gateway: Arc<dyn LlmGateway>,
        models: Arc<TierModelMap>,
        params: ExecutionParams,
    ) -> Self {
        Self {
            pedagogy,
            gateway,
            models,
            params,
        }
    }

    fn invalid_request(&self, detail: impl std::fmt::Display) -> ToolResponse {
        ToolResponse::failure(
            self.pedagogy.tool_name(),
            ErrorKind::SchemaInvalid,
            format!("Invalid request shape: {}", detail),
        )
    }
}

#[async_trait]
impl<P: Pedagogy> ToolController for PedagogyController<P> {
    fn tool_name(&self) -> &str {
        self.pedagogy.tool_name()
    }

    async fn handle(&self, payload: &Value, tier: ModelTier) -> ToolResponse {
        let tool_name = self.pedagogy.tool_name();

        let request: P::Request = match serde_json::from_value(payload.clone()) {
            Ok(request) => request,
            Err(e) => return self.invalid_request(e),
        };
        if let Err(e) = self.pedagogy.prepare(&request) {
            return self.invalid_request(e);
        }

        let generation = self.params.resolve(self.pedagogy.generation());
        let model_id = self.models.model_for(tier).to_string();
        let completion_request = CompletionRequest {
            model_id: model_id.clone(),
            system_prompt: self.pedagogy.system_prompt(&request),
            user_prompt: self.pedagogy.user_prompt(&request),
            max_tokens: generation.max_tokens,
            temperature: generation.temperature,
        };

        debug!(tool = tool_name, tier = %tier, model = %model_id, "Invoking model");
        let started = Instant::now();
        let result = self.gateway.complete(completion_request).await;
        let latency_ms = started.elapsed().as_millis() as u64;
        let meta = ResponseMeta::new(tier, latency_ms).with_model_id(model_id.as_str());

        let completion = match result {
            Ok(completion) => completion,
            Err(e) => {
                warn!(tool = tool_name, model = %model_id, "Model call failed: {}", e);
                return ToolResponse::failure(
                    tool_name,
                    ErrorKind::ModelInvocationFailed,
                    format!("Model invocation failed: {}", e),
                )
                .with_meta(meta);
            }
        };

        let meta = meta.with_tokens_used(completion.tokens_used);
        if completion.text.trim().is_empty() {
            warn!(tool = tool_name, model = %model_id, "Model returned an empty completion");
            return ToolResponse::failure(
                tool_name,
                ErrorKind::ModelInvocationFailed,
                "Model invocation failed: empty completion",
            )
            .with_meta(meta);
        }
        debug!(tool = tool_name, "Completion: {}", preview(&completion.text, 160));

        let parsed = self.pedagogy.parse(&completion.text, &request);
        for fallback in &parsed.fallbacks {
            debug!(tool = tool_name, "{}", fallback);
        }

        match serde_json::to_value(&parsed.value) {
            Ok(value) => ToolResponse::success(tool_name, value)
                .with_warnings(parsed.fallbacks)
                .with_meta(meta),
            Err(e) => ToolResponse::failure(
                tool_name,
                ErrorKind::ModelInvocationFailed,
                format!("Model invocation failed: unserializable response: {}", e),
            )
            .with_meta(meta),
        }
    }
}
