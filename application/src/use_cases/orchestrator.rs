//! Tool orchestrator use case
//!
//! Runs one inbound [`ToolRequest`] through the pipeline:
//!
//! ```text
//! received → entitlement-checked → schema-validated → blocked-field-checked
//!          → tier-resolved → dispatched → response-validated → returned
//! ```
//!
//! The tool lookup happens first, so an unknown tool is reported as such.
//! Any failing check short-circuits to `returned` with `success: false`.
//! A response that fails its schema is still returned, with a warning.

use crate::controllers::ControllerSet;
use crate::ports::entitlements::EntitlementsProvider;
use crate::ports::progress::{NoProgress, OrchestratorProgress};
use crate::ports::schema_validator::SchemaValidator;
use crate::ports::tool_audit::{AuditEvent, NoAuditLogger, ToolAuditLogger};
use ellen_domain::{
    ErrorKind, ProcessStage, RoutingLoop, ToolRegistry, ToolRequest, ToolResponse,
    UserEntitlements, check_entitlements, select_tier,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct Orchestrator {
    registry: Arc<ToolRegistry>,
    validator: Arc<dyn SchemaValidator>,
    controllers: ControllerSet,
    entitlements: Option<Arc<dyn EntitlementsProvider>>,
    audit: Arc<dyn ToolAuditLogger>,
    routing: RoutingLoop,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<ToolRegistry>,
        validator: Arc<dyn SchemaValidator>,
        controllers: ControllerSet,
    ) -> Self {
        for name in controllers.names() {
            if !registry.contains(name) {
                warn!(
                    tool = name,
                    "Controller registered for a tool missing from the registry"
                );
            }
        }
        let routing = RoutingLoop::new(registry.routing.default_loop.clone());
        Self {
            registry,
            validator,
            controllers,
            entitlements: None,
            audit: Arc::new(NoAuditLogger),
            routing,
        }
    }

    /// Look up entitlements for requests that arrive without them
    pub fn with_entitlements_provider(mut self, provider: Arc<dyn EntitlementsProvider>) -> Self {
        self.entitlements = Some(provider);
        self
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn ToolAuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn controllers(&self) -> &ControllerSet {
        &self.controllers
    }

    /// Process a request with default (no-op) progress
    pub async fn process_request(&self, request: ToolRequest) -> ToolResponse {
        self.process_request_with_progress(request, &NoProgress).await
    }

    /// Process a request with progress callbacks
    pub async fn process_request_with_progress(
        &self,
        request: ToolRequest,
        progress: &dyn OrchestratorProgress,
    ) -> ToolResponse {
        let started = Instant::now();
        info!(tool = %request.tool_name, "Processing tool request");

        let response = self.run_pipeline(&request, progress).await;

        progress.on_stage(&request.tool_name, ProcessStage::Returned);
        progress.on_finished(&response);
        self.record(&request, &response, started);
        response
    }

    async fn run_pipeline(
        &self,
        request: &ToolRequest,
        progress: &dyn OrchestratorProgress,
    ) -> ToolResponse {
        let name = request.tool_name.as_str();
        progress.on_stage(name, ProcessStage::Received);

        let tool = match self.registry.get_tool(name) {
            Ok(tool) => tool,
            Err(e) => {
                warn!(tool = name, "{}", e);
                return ToolResponse::failure(name, ErrorKind::UnknownTool, e.to_string());
            }
        };

        let entitlements = match self.resolve_entitlements(request).await {
            Ok(entitlements) => entitlements,
            Err(reason) => return denied(name, reason),
        };
        if let Some(entitlements) = &entitlements
            && let Err(denial) = check_entitlements(entitlements, name)
        {
            return denied(name, denial.to_string());
        }
        progress.on_stage(name, ProcessStage::EntitlementChecked);

        let outcome = self.validator.validate_request(name, &request.payload);
        if !outcome.valid {
            info!(tool = name, "Request failed schema validation: {}", outcome.summary());
            return ToolResponse::failure(
                name,
                ErrorKind::SchemaInvalid,
                format!("Invalid request shape: {}", outcome.summary()),
            );
        }
        progress.on_stage(name, ProcessStage::SchemaValidated);

        if let Some(response) = self.blocked_field_failure(name, &request.payload, "request") {
            return response;
        }
        progress.on_stage(name, ProcessStage::BlockedFieldChecked);

        let decision = select_tier(tool, &request.payload, entitlements.as_ref());
        debug!(
            tool = name,
            tier = %decision.tier,
            reason = decision.reason.as_str(),
            "Tier resolved"
        );
        progress.on_stage(name, ProcessStage::TierResolved);

        let Some(controller) = self.controllers.get(name) else {
            warn!(tool = name, "No controller registered");
            return ToolResponse::failure(
                name,
                ErrorKind::NoController,
                format!("No controller registered for tool {}", name),
            );
        };
        progress.on_stage(name, ProcessStage::Dispatched);

        let mut response = controller.handle(&request.payload, decision.tier).await;
        if let Some(meta) = response.meta.as_mut() {
            meta.escalated = decision.escalated();
        }
        if !response.success {
            return response;
        }

        if let Some(body) = &response.response {
            if let Some(blocked) = self.blocked_field_failure(name, body, "response") {
                return blocked.with_warnings(std::mem::take(&mut response.warnings));
            }
            let outcome = self.validator.validate_response(name, body);
            if !outcome.valid {
                warn!(tool = name, "Response failed schema validation: {}", outcome.summary());
                response
                    .warnings
                    .push(format!("response schema: {}", outcome.summary()));
            }
        }
        progress.on_stage(name, ProcessStage::ResponseValidated);

        response
    }

    /// Entitlements carried by the request, else fetched for its user.
    ///
    /// `Ok(None)` means no gating applies. A failed lookup denies the call.
    async fn resolve_entitlements(
        &self,
        request: &ToolRequest,
    ) -> Result<Option<UserEntitlements>, String> {
        if let Some(entitlements) = &request.entitlements {
            return Ok(Some(entitlements.clone()));
        }
        let (Some(provider), Some(user_id)) = (&self.entitlements, &request.user_id) else {
            return Ok(None);
        };
        match provider.get_user_entitlements(user_id).await {
            Ok(entitlements) => Ok(Some(entitlements)),
            Err(e) => {
                warn!(user = %user_id, "Entitlements lookup failed: {}", e);
                Err(e.to_string())
            }
        }
    }

    fn blocked_field_failure(
        &self,
        name: &str,
        payload: &serde_json::Value,
        direction: &str,
    ) -> Option<ToolResponse> {
        if !self.registry.formative_only {
            return None;
        }
        let blocked = self.registry.check_for_blocked_fields(payload);
        if blocked.is_empty() {
            return None;
        }
        warn!(tool = name, fields = ?blocked, "Blocked fields in {}", direction);
        let message = match direction {
            "request" => format!("Blocked fields detected: {}", blocked.join(", ")),
            _ => format!("Blocked fields detected in {}: {}", direction, blocked.join(", ")),
        };
        Some(ToolResponse::failure(name, ErrorKind::BlockedFieldDetected, message))
    }

    fn record(&self, request: &ToolRequest, response: &ToolResponse, started: Instant) {
        let meta = response.meta.as_ref();
        self.audit.log(AuditEvent::new(
            "tool_call",
            json!({
                "tool": request.tool_name,
                "user_id": request.user_id,
                "session_id": request.session_id,
                "success": response.success,
                "error_kind": response.error_kind,
                "warnings": response.warnings.len(),
                "model_tier": meta.map(|m| m.model_tier),
                "model_id": meta.and_then(|m| m.model_id.clone()),
                "escalated": meta.is_some_and(|m| m.escalated),
                "tokens_used": meta.and_then(|m| m.tokens_used),
                "duration_ms": started.elapsed().as_millis() as u64,
            }),
        ));
    }

    // ==================== Default Loop ====================

    /// Next tool in the default flow; `None` once the loop is exhausted.
    pub fn next_step(&mut self) -> Option<String> {
        self.routing.next_step()
    }

    pub fn reset_loop(&mut self) {
        self.routing.reset();
    }
}

fn denied(name: &str, reason: impl std::fmt::Display) -> ToolResponse {
    info!(tool = name, "Entitlements denied: {}", reason);
    ToolResponse::failure(
        name,
        ErrorKind::InsufficientEntitlements,
        format!("Insufficient entitlements: {}", reason),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::{ControllerFactory, ToolController};
    use crate::ports::entitlements::EntitlementsError;
    use crate::testing::ScriptedGateway;
    use async_trait::async_trait;
    use ellen_domain::pedagogy::{FORMATIVE_CHECK, SOCRATIC_ELENCHUS};
    use ellen_domain::{
        ModelTier, TierModelMap, ToolDefinition, ValidationOutcome, tool::RoutingConfig,
    };
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Validator that accepts everything except payloads carrying `"invalid": true`
    struct FlagValidator {
        reject_responses: bool,
    }

    impl SchemaValidator for FlagValidator {
        fn validate_request(&self, _tool: &str, payload: &Value) -> ValidationOutcome {
            if payload.get("invalid") == Some(&Value::Bool(true)) {
                ValidationOutcome::invalid(vec!["invalid flag set".into()])
            } else {
                ValidationOutcome::valid()
            }
        }

        fn validate_response(&self, _tool: &str, _payload: &Value) -> ValidationOutcome {
            if self.reject_responses {
                ValidationOutcome::invalid(vec!["missing field".into()])
            } else {
                ValidationOutcome::valid()
            }
        }
    }

    struct StaticEntitlements(Option<UserEntitlements>);

    #[async_trait]
    impl EntitlementsProvider for StaticEntitlements {
        async fn get_user_entitlements(
            &self,
            user_id: &str,
        ) -> Result<UserEntitlements, EntitlementsError> {
            self.0
                .clone()
                .ok_or_else(|| EntitlementsError::NotFound(user_id.to_string()))
        }
    }

    /// Controller that echoes a fixed body, for response-side checks
    struct EchoController {
        name: String,
        body: Value,
    }

    #[async_trait]
    impl ToolController for EchoController {
        fn tool_name(&self) -> &str {
            &self.name
        }

        async fn handle(&self, _payload: &Value, tier: ModelTier) -> ToolResponse {
            ToolResponse::success(&self.name, self.body.clone())
                .with_meta(ellen_domain::ResponseMeta::new(tier, 1))
        }
    }

    #[derive(Default)]
    struct RecordingAudit {
        events: Mutex<Vec<Value>>,
    }

    impl ToolAuditLogger for RecordingAudit {
        fn log(&self, event: AuditEvent) {
            self.events.lock().unwrap().push(event.payload);
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        stages: Mutex<Vec<ProcessStage>>,
    }

    impl OrchestratorProgress for RecordingProgress {
        fn on_stage(&self, _tool: &str, stage: ProcessStage) {
            self.stages.lock().unwrap().push(stage);
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry {
            version: Some("test".into()),
            formative_only: true,
            blocked_fields: vec!["grade".into(), "score".into()],
            tools: vec![
                ToolDefinition::new(SOCRATIC_ELENCHUS, "s.request.json", "s.response.json")
                    .with_default_tier(ModelTier::M)
                    .with_escalation("complex_math", ModelTier::F),
                ToolDefinition::new(FORMATIVE_CHECK, "f.request.json", "f.response.json")
                    .with_default_tier(ModelTier::S),
                ToolDefinition::new("advanced_essay_review.v1.0", "a.json", "a.json"),
                ToolDefinition::new("orphan.v1.0", "o.json", "o.json"),
            ],
            routing: RoutingConfig {
                default_loop: vec![
                    SOCRATIC_ELENCHUS.to_string(),
                    format!("{}|orphan.v1.0", FORMATIVE_CHECK),
                ],
            },
        }
    }

    fn orchestrator(gateway: Arc<ScriptedGateway>) -> Orchestrator {
        let factory = ControllerFactory::new(gateway, Arc::new(TierModelMap::default()));
        Orchestrator::new(
            Arc::new(registry()),
            Arc::new(FlagValidator { reject_responses: false }),
            factory.default_set(),
        )
    }

    const FORMATIVE_REPLY: &str = "FEED UP: goal\nFEED BACK: progress\nFEED FORWARD: next";

    #[tokio::test]
    async fn test_happy_path() {
        let gateway = Arc::new(ScriptedGateway::text(FORMATIVE_REPLY));
        let orch = orchestrator(gateway.clone());

        let response = orch
            .process_request(ToolRequest::new(FORMATIVE_CHECK, json!({"user_response": "F=ma"})))
            .await;

        assert!(response.success, "{:?}", response.error);
        assert_eq!(response.meta.unwrap().model_tier, ModelTier::S);
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let gateway = Arc::new(ScriptedGateway::text("unused"));
        let orch = orchestrator(gateway.clone());

        let response = orch
            .process_request(ToolRequest::new("nope.v9", json!({})))
            .await;

        assert!(response.is_failure_of(ErrorKind::UnknownTool));
        assert_eq!(response.error.as_deref(), Some("Unknown tool: nope.v9"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_rate_limit_short_circuits_before_model_call() {
        let gateway = Arc::new(ScriptedGateway::text(FORMATIVE_REPLY));
        let orch = orchestrator(gateway.clone());
        let entitlements = UserEntitlements::default().with_usage(100);

        let response = orch
            .process_request(
                ToolRequest::new(FORMATIVE_CHECK, json!({"user_response": "x"}))
                    .with_entitlements(entitlements),
            )
            .await;

        assert!(response.is_failure_of(ErrorKind::InsufficientEntitlements));
        assert!(response.error.unwrap().starts_with("Insufficient entitlements"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_advanced_tool_requires_plan() {
        let orch = orchestrator(Arc::new(ScriptedGateway::text("unused")));
        let response = orch
            .process_request(
                ToolRequest::new("advanced_essay_review.v1.0", json!({}))
                    .with_entitlements(UserEntitlements::default()),
            )
            .await;
        assert!(response.is_failure_of(ErrorKind::InsufficientEntitlements));
    }

    #[tokio::test]
    async fn test_schema_failure() {
        let gateway = Arc::new(ScriptedGateway::text("unused"));
        let orch = orchestrator(gateway.clone());

        let response = orch
            .process_request(ToolRequest::new(FORMATIVE_CHECK, json!({"invalid": true})))
            .await;

        assert!(response.is_failure_of(ErrorKind::SchemaInvalid));
        assert_eq!(
            response.error.as_deref(),
            Some("Invalid request shape: invalid flag set")
        );
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blocked_field_at_depth() {
        let gateway = Arc::new(ScriptedGateway::text("unused"));
        let orch = orchestrator(gateway.clone());
        let payload = json!({"user_response": "x", "meta": {"history": {"Score": null}}});

        let response = orch.process_request(ToolRequest::new(FORMATIVE_CHECK, payload)).await;

        assert!(response.is_failure_of(ErrorKind::BlockedFieldDetected));
        assert!(response.error.unwrap().contains("meta.history.Score"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blocked_fields_ignored_when_not_formative_only() {
        let mut registry = registry();
        registry.formative_only = false;
        let gateway = Arc::new(ScriptedGateway::text(FORMATIVE_REPLY));
        let orch = Orchestrator::new(
            Arc::new(registry),
            Arc::new(FlagValidator { reject_responses: false }),
            ControllerFactory::new(gateway, Arc::new(TierModelMap::default())).default_set(),
        );

        let response = orch
            .process_request(ToolRequest::new(
                FORMATIVE_CHECK,
                json!({"user_response": "x", "grade": 3}),
            ))
            .await;
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_no_controller() {
        let orch = orchestrator(Arc::new(ScriptedGateway::text("unused")));
        let response = orch
            .process_request(ToolRequest::new("orphan.v1.0", json!({})))
            .await;

        assert!(response.is_failure_of(ErrorKind::NoController));
        assert_eq!(
            response.error.as_deref(),
            Some("No controller registered for tool orphan.v1.0")
        );
    }

    #[tokio::test]
    async fn test_response_schema_failure_is_warning() {
        let gateway = Arc::new(ScriptedGateway::text(FORMATIVE_REPLY));
        let factory = ControllerFactory::new(gateway, Arc::new(TierModelMap::default()));
        let orch = Orchestrator::new(
            Arc::new(registry()),
            Arc::new(FlagValidator { reject_responses: true }),
            factory.default_set(),
        );

        let response = orch
            .process_request(ToolRequest::new(FORMATIVE_CHECK, json!({"user_response": "x"})))
            .await;

        assert!(response.success);
        assert_eq!(response.warnings, vec!["response schema: missing field"]);
    }

    #[tokio::test]
    async fn test_blocked_field_in_response_fails() {
        let controllers = ControllerSet::new().register(Arc::new(EchoController {
            name: FORMATIVE_CHECK.into(),
            body: json!({"feedback": {"grade": "A"}}),
        }));
        let orch = Orchestrator::new(
            Arc::new(registry()),
            Arc::new(FlagValidator { reject_responses: false }),
            controllers,
        );

        let response = orch
            .process_request(ToolRequest::new(FORMATIVE_CHECK, json!({"user_response": "x"})))
            .await;

        assert!(response.is_failure_of(ErrorKind::BlockedFieldDetected));
        assert!(response.response.is_none());
    }

    #[tokio::test]
    async fn test_escalation_marked_in_meta() {
        let gateway = Arc::new(ScriptedGateway::text("FOCUS QUESTION: why?"));
        let orch = orchestrator(gateway.clone());
        let payload = json!({"topic": "limits", "domain": "mathematics"});

        let response = orch
            .process_request(
                ToolRequest::new(SOCRATIC_ELENCHUS, payload)
                    .with_entitlements(UserEntitlements::default().with_frontier()),
            )
            .await;

        let meta = response.meta.unwrap();
        assert_eq!(meta.model_tier, ModelTier::F);
        assert!(meta.escalated);
        assert_eq!(gateway.last_request().unwrap().model_id, "o3");
    }

    #[tokio::test]
    async fn test_no_frontier_without_entitlement() {
        let gateway = Arc::new(ScriptedGateway::text("FOCUS QUESTION: why?"));
        let orch = orchestrator(gateway);
        let payload = json!({"topic": "limits", "domain": "mathematics"});

        let response = orch
            .process_request(
                ToolRequest::new(SOCRATIC_ELENCHUS, payload)
                    .with_entitlements(UserEntitlements::default()),
            )
            .await;

        let meta = response.meta.unwrap();
        assert_ne!(meta.model_tier, ModelTier::F);
        assert!(!meta.escalated);
    }

    #[tokio::test]
    async fn test_entitlements_fetched_for_user() {
        let gateway = Arc::new(ScriptedGateway::text(FORMATIVE_REPLY));
        let orch = orchestrator(gateway.clone()).with_entitlements_provider(Arc::new(
            StaticEntitlements(Some(UserEntitlements::default().with_usage(500))),
        ));

        let response = orch
            .process_request(
                ToolRequest::new(FORMATIVE_CHECK, json!({"user_response": "x"})).with_user("u-1"),
            )
            .await;

        assert!(response.is_failure_of(ErrorKind::InsufficientEntitlements));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_entitlement_lookup_denies() {
        let orch = orchestrator(Arc::new(ScriptedGateway::text(FORMATIVE_REPLY)))
            .with_entitlements_provider(Arc::new(StaticEntitlements(None)));

        let response = orch
            .process_request(
                ToolRequest::new(FORMATIVE_CHECK, json!({"user_response": "x"})).with_user("ghost"),
            )
            .await;

        assert!(response.is_failure_of(ErrorKind::InsufficientEntitlements));
        assert!(response.error.unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn test_anonymous_request_skips_provider() {
        let orch = orchestrator(Arc::new(ScriptedGateway::text(FORMATIVE_REPLY)))
            .with_entitlements_provider(Arc::new(StaticEntitlements(None)));

        let response = orch
            .process_request(ToolRequest::new(FORMATIVE_CHECK, json!({"user_response": "x"})))
            .await;
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_stages_reported_in_order() {
        let orch = orchestrator(Arc::new(ScriptedGateway::text(FORMATIVE_REPLY)));
        let progress = RecordingProgress::default();

        orch.process_request_with_progress(
            ToolRequest::new(FORMATIVE_CHECK, json!({"user_response": "x"})),
            &progress,
        )
        .await;

        assert_eq!(*progress.stages.lock().unwrap(), ProcessStage::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_short_circuit_jumps_to_returned() {
        let orch = orchestrator(Arc::new(ScriptedGateway::text("unused")));
        let progress = RecordingProgress::default();

        orch.process_request_with_progress(ToolRequest::new("nope", json!({})), &progress)
            .await;

        assert_eq!(
            *progress.stages.lock().unwrap(),
            vec![ProcessStage::Received, ProcessStage::Returned]
        );
    }

    #[tokio::test]
    async fn test_audit_records_outcome_without_payload() {
        let audit = Arc::new(RecordingAudit::default());
        let orch = orchestrator(Arc::new(ScriptedGateway::text(FORMATIVE_REPLY)))
            .with_audit_logger(audit.clone());

        orch.process_request(
            ToolRequest::new(FORMATIVE_CHECK, json!({"user_response": "secret"}))
                .with_session("s-1"),
        )
        .await;

        let events = audit.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["tool"], FORMATIVE_CHECK);
        assert_eq!(events[0]["success"], true);
        assert_eq!(events[0]["session_id"], "s-1");
        assert!(!events[0].to_string().contains("secret"));
    }

    #[test]
    fn test_default_loop() {
        let mut orch = orchestrator(Arc::new(ScriptedGateway::text("unused")));

        assert_eq!(orch.next_step().as_deref(), Some(SOCRATIC_ELENCHUS));
        assert_eq!(orch.next_step().as_deref(), Some(FORMATIVE_CHECK));
        assert_eq!(orch.next_step(), None);
        assert_eq!(orch.next_step(), None);

        orch.reset_loop();
        assert_eq!(orch.next_step().as_deref(), Some(SOCRATIC_ELENCHUS));
    }
}
