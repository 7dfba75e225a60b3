//! Tool controllers
//!
//! A controller turns a validated payload and a resolved tier into a
//! [`ToolResponse`]. Controllers are registered by tool name in a
//! [`ControllerSet`] at startup; the orchestrator only ever looks them up,
//! so adding a tool never changes its control flow.

pub mod pedagogy;

pub use pedagogy::PedagogyController;

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::LlmGateway;
use async_trait::async_trait;
use ellen_domain::{
    ConceptMapper, DiagnosticProbe, FormativeCheck, ModelTier, Pedagogy, RevisionScheduler,
    SocraticQuestioning, TierModelMap, ToolResponse, WorkedExample,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A handler for one registered tool.
///
/// `handle` never fails: every error becomes a `success: false` envelope.
#[async_trait]
pub trait ToolController: Send + Sync {
    fn tool_name(&self) -> &str;

    async fn handle(&self, payload: &Value, tier: ModelTier) -> ToolResponse;
}

/// Tool name → controller dispatch table
#[derive(Clone, Default)]
pub struct ControllerSet {
    controllers: HashMap<String, Arc<dyn ToolController>>,
}

impl ControllerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller, replacing any previous one for the same tool
    pub fn register(mut self, controller: Arc<dyn ToolController>) -> Self {
        self.controllers
            .insert(controller.tool_name().to_string(), controller);
        self
    }

    pub fn get(&self, tool_name: &str) -> Option<&Arc<dyn ToolController>> {
        self.controllers.get(tool_name)
    }

    pub fn contains(&self, tool_name: &str) -> bool {
        self.controllers.contains_key(tool_name)
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.controllers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl std::fmt::Debug for ControllerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerSet")
            .field("tools", &self.names())
            .finish()
    }
}

/// Shared wiring for building pedagogy controllers
#[derive(Clone)]
pub struct ControllerFactory {
    gateway: Arc<dyn LlmGateway>,
    models: Arc<TierModelMap>,
    params: ExecutionParams,
}

impl ControllerFactory {
    pub fn new(gateway: Arc<dyn LlmGateway>, models: Arc<TierModelMap>) -> Self {
        Self {
            gateway,
            models,
            params: ExecutionParams::default(),
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn controller<P: Pedagogy>(&self, pedagogy: P) -> Arc<dyn ToolController> {
        Arc::new(PedagogyController::new(
            pedagogy,
            Arc::clone(&self.gateway),
            Arc::clone(&self.models),
            self.params.clone(),
        ))
    }

    /// All six built-in tools
    pub fn default_set(&self) -> ControllerSet {
        ControllerSet::new()
            .register(self.controller(SocraticQuestioning))
            .register(self.controller(FormativeCheck))
            .register(self.controller(DiagnosticProbe))
            .register(self.controller(RevisionScheduler::new()))
            .register(self.controller(WorkedExample))
            .register(self.controller(ConceptMapper))
    }
}
