//! End-to-end orchestration against the bundled registry and real schemas,
//! with a scripted model gateway standing in for the provider.

use async_trait::async_trait;
use chrono::{Duration, Local};
use ellen_application::{
    Completion, CompletionRequest, ControllerFactory, GatewayError, LlmGateway, Orchestrator,
};
use ellen_domain::{
    ErrorKind, ModelTier, TierModelMap, ToolRequest, UserEntitlements, select_tier,
};
use ellen_infrastructure::RegistryLoader;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct ScriptedGateway {
    replies: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
    models: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            calls: AtomicUsize::new(0),
            models: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn models(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.models.lock().unwrap().push(request.model_id);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "(no more responses)".to_string());
        Ok(Completion::new(reply).with_tokens_used(64))
    }
}

fn orchestrator(gateway: Arc<ScriptedGateway>) -> Orchestrator {
    let loaded = RegistryLoader::load_bundled().unwrap();
    let models = Arc::new(
        TierModelMap::default()
            .with_model(ModelTier::S, "small-model")
            .with_model(ModelTier::M, "medium-model")
            .with_model(ModelTier::L, "large-model")
            .with_model(ModelTier::F, "frontier-model"),
    );
    let controllers = ControllerFactory::new(gateway, models).default_set();
    Orchestrator::new(loaded.registry, loaded.validator, controllers)
}

fn keys_and_numbers(value: &Value, keys: &mut Vec<String>, numbers: &mut usize) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                keys.push(k.to_ascii_lowercase());
                keys_and_numbers(v, keys, numbers);
            }
        }
        Value::Array(items) => items
            .iter()
            .for_each(|v| keys_and_numbers(v, keys, numbers)),
        Value::Number(_) => *numbers += 1,
        _ => {}
    }
}

#[tokio::test]
async fn scenario_formative_check_returns_feedback_triple_without_grades() {
    let gateway = ScriptedGateway::new(&[
        "FEED UP: Explain how force relates to motion.\n\
FEED BACK: You named the relationship correctly in words.\n\
FEED FORWARD: Try writing it as an equation and naming the units.\n\
MISCONCEPTIONS:\n- none\n\
NEXT STEPS:\n- Apply F=ma to a falling ball",
    ]);
    let orch = orchestrator(Arc::clone(&gateway));

    let response = orch
        .process_request(ToolRequest::new(
            "formative_check.v1.0",
            json!({
                "user_response": "Force equals mass times acceleration",
                "expected": "F=ma",
                "check_type": "conceptual"
            }),
        ))
        .await;

    assert!(response.success, "{:?}", response.error);
    let body = response.response.as_ref().unwrap();
    for part in ["feed_up", "feed_back", "feed_forward"] {
        assert!(!body["feedback"][part].as_str().unwrap().is_empty(), "{part}");
    }

    let mut keys = Vec::new();
    let mut numbers = 0;
    keys_and_numbers(body, &mut keys, &mut numbers);
    assert_eq!(numbers, 0);
    for blocked in ["grade", "score", "marks", "percentage"] {
        assert!(!keys.iter().any(|k| k == blocked), "{blocked}");
    }

    let meta = response.meta.unwrap();
    assert_eq!(meta.model_tier, ModelTier::S);
    assert_eq!(meta.model_id.as_deref(), Some("small-model"));
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn scenario_revision_schedule_ten_days_out() {
    let gateway = ScriptedGateway::new(&["TIPS:\n- Test yourself daily\n- Mix the topics"]);
    let orch = orchestrator(gateway);
    let exam = Local::now().date_naive() + Duration::days(10);

    let response = orch
        .process_request(ToolRequest::new(
            "revision_scheduler.v1.0",
            json!({
                "topics": ["algebra", "geometry"],
                "exam_date": exam.to_string(),
                "study_hours_per_day": 2
            }),
        ))
        .await;

    assert!(response.success, "{:?}", response.error);
    assert!(response.warnings.is_empty(), "{:?}", response.warnings);
    let body = response.response.unwrap();

    let schedule = body["schedule"].as_array().unwrap();
    assert!(!schedule.is_empty() && schedule.len() <= 10);
    for entry in schedule {
        let kind = entry["type"].as_str().unwrap();
        assert!(["new", "review", "practice"].contains(&kind), "{kind}");
    }
    for topic in ["algebra", "geometry"] {
        assert_eq!(body["spaced_intervals"][topic], json!([1, 3, 7, 14, 30]));
    }
    assert_eq!(body["interleaved_practice"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn scenario_frontier_never_selected_without_f_tier() {
    let loaded = RegistryLoader::load_bundled().unwrap();
    let tool = loaded.registry.get_tool("socratic_elenchus.v3.1").unwrap();
    let payload = json!({"topic": "integrals", "domain": "mathematics"});

    let mut entitlements = UserEntitlements::default().with_frontier();
    entitlements.available_tiers.retain(|t| *t != ModelTier::F);
    assert_ne!(select_tier(tool, &payload, Some(&entitlements)).tier, ModelTier::F);
    assert_ne!(
        select_tier(tool, &payload, Some(&UserEntitlements::default())).tier,
        ModelTier::F
    );

    let gateway = ScriptedGateway::new(&["FOCUS QUESTION: What does the area under a curve mean?"]);
    let orch = orchestrator(Arc::clone(&gateway));
    let response = orch
        .process_request(
            ToolRequest::new(tool.name.clone(), payload).with_entitlements(entitlements),
        )
        .await;

    assert!(response.success, "{:?}", response.error);
    let meta = response.meta.unwrap();
    assert_ne!(meta.model_tier, ModelTier::F);
    assert!(!meta.escalated);
    assert_eq!(gateway.models(), vec!["medium-model"]);
}

#[tokio::test]
async fn scenario_frontier_escalation_with_full_entitlements() {
    let gateway = ScriptedGateway::new(&["FOCUS QUESTION: What does the area under a curve mean?"]);
    let orch = orchestrator(Arc::clone(&gateway));

    let response = orch
        .process_request(
            ToolRequest::new(
                "socratic_elenchus.v3.1",
                json!({"topic": "integrals", "domain": "mathematics"}),
            )
            .with_entitlements(UserEntitlements::default().with_frontier()),
        )
        .await;

    let meta = response.meta.unwrap();
    assert_eq!(meta.model_tier, ModelTier::F);
    assert!(meta.escalated);
    assert_eq!(gateway.models(), vec!["frontier-model"]);
}

#[tokio::test]
async fn scenario_rate_limited_user_never_reaches_the_model() {
    let gateway = ScriptedGateway::new(&["FEED UP: x\nFEED BACK: y\nFEED FORWARD: z"]);
    let orch = orchestrator(Arc::clone(&gateway));
    let entitlements = UserEntitlements::default();
    let limit = entitlements.plan.rate_limits.tokens_per_day;

    let response = orch
        .process_request(
            ToolRequest::new("formative_check.v1.0", json!({"user_response": "F=ma"}))
                .with_entitlements(entitlements.with_usage(limit)),
        )
        .await;

    assert!(response.is_failure_of(ErrorKind::InsufficientEntitlements));
    assert!(response.error.unwrap().starts_with("Insufficient entitlements"));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn blocked_request_field_never_reaches_the_model() {
    let gateway = ScriptedGateway::new(&[]);
    let orch = orchestrator(Arc::clone(&gateway));

    let response = orch
        .process_request(ToolRequest::new(
            "formative_check.v1.0",
            json!({
                "user_response": "F=ma",
                "meta": {"history": {"Score": 7}}
            }),
        ))
        .await;

    assert!(response.is_failure_of(ErrorKind::BlockedFieldDetected));
    assert!(response.error.unwrap().contains("meta.history.Score"));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn blocked_key_inside_array_is_outside_the_scan() {
    let gateway = ScriptedGateway::new(&[
        "FEED UP: State Newton's second law.\n\
FEED BACK: The relationship is right.\n\
FEED FORWARD: Add the units for each quantity.",
    ]);
    let orch = orchestrator(Arc::clone(&gateway));

    let response = orch
        .process_request(ToolRequest::new(
            "formative_check.v1.0",
            json!({
                "user_response": "F=ma",
                "meta": {"history": [{"Score": 7}]}
            }),
        ))
        .await;

    assert!(response.success, "{:?}", response.error);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn schema_violation_is_rejected_before_the_model() {
    let gateway = ScriptedGateway::new(&[]);
    let orch = orchestrator(Arc::clone(&gateway));

    let response = orch
        .process_request(ToolRequest::new(
            "revision_scheduler.v1.0",
            json!({"topics": [], "exam_date": "2030-01-01", "study_hours_per_day": 2}),
        ))
        .await;

    assert!(response.is_failure_of(ErrorKind::SchemaInvalid));
    assert!(response.error.unwrap().starts_with("Invalid request shape"));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn zero_question_budget_is_rejected_before_the_model() {
    let gateway = ScriptedGateway::new(&[]);
    let orch = orchestrator(Arc::clone(&gateway));

    let response = orch
        .process_request(ToolRequest::new(
            "socratic_elenchus.v3.1",
            json!({"topic": "gravity", "policy": {"max_questions": 0}}),
        ))
        .await;

    assert!(response.is_failure_of(ErrorKind::SchemaInvalid));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn unknown_tool_is_reported_by_name() {
    let gateway = ScriptedGateway::new(&[]);
    let orch = orchestrator(Arc::clone(&gateway));

    let response = orch
        .process_request(ToolRequest::new("grade_essay.v1", json!({})))
        .await;

    assert!(response.is_failure_of(ErrorKind::UnknownTool));
    assert_eq!(response.error.as_deref(), Some("Unknown tool: grade_essay.v1"));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn every_bundled_tool_answers_with_fallbacks_on_unstructured_output() {
    let today = Local::now().date_naive();
    let payloads = [
        ("socratic_elenchus.v3.1", json!({"topic": "photosynthesis"})),
        ("formative_check.v1.0", json!({"user_response": "plants eat light"})),
        (
            "diagnostic_probe.v1.0",
            json!({
                "topic": "fractions",
                "suspected_misconceptions": ["bigger denominator means bigger number"]
            }),
        ),
        (
            "revision_scheduler.v1.0",
            json!({
                "topics": ["cells"],
                "exam_date": (today + Duration::days(3)).to_string(),
                "study_hours_per_day": 1.5
            }),
        ),
        (
            "worked_example.v1.0",
            json!({"problem": "Solve 2x + 3 = 11", "fading": "partial"}),
        ),
        (
            "concept_mapper.v1.0",
            json!({"topic": "ecosystems", "concepts": ["producer", "consumer"]}),
        ),
    ];
    let replies: Vec<&str> = payloads.iter().map(|_| "Let me think about that.").collect();
    let gateway = ScriptedGateway::new(&replies);
    let orch = orchestrator(Arc::clone(&gateway));

    for (tool, payload) in payloads {
        let response = orch.process_request(ToolRequest::new(tool, payload)).await;
        assert!(response.success, "{tool}: {:?}", response.error);
        assert!(
            !response.warnings.iter().any(|w| w.starts_with("response schema")),
            "{tool}: {:?}",
            response.warnings
        );
    }
    assert_eq!(gateway.calls(), 6);
}

#[tokio::test]
async fn identical_requests_route_identically() {
    let gateway = ScriptedGateway::new(&["FOCUS QUESTION: a?", "FOCUS QUESTION: a?"]);
    let orch = orchestrator(Arc::clone(&gateway));
    let request = ToolRequest::new(
        "socratic_elenchus.v3.1",
        json!({"topic": "waves", "prior_turns": []}),
    );

    let first = orch.process_request(request.clone()).await;
    let second = orch.process_request(request).await;

    assert_eq!(first.response, second.response);
    assert_eq!(
        first.meta.map(|m| m.model_tier),
        second.meta.map(|m| m.model_tier)
    );
    assert_eq!(gateway.models(), vec!["medium-model", "medium-model"]);
}
