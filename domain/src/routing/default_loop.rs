//! Default pedagogical loop cursor.

/// Steps through the registry's `routing.default_loop`
///
/// Alternatives written as `a|b` resolve to their first option. The cursor
/// is plain mutable state owned by one orchestrator; stepping requires
/// `&mut self`, so one loop serves one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingLoop {
    steps: Vec<String>,
    cursor: usize,
}

impl RoutingLoop {
    pub fn new(steps: Vec<String>) -> Self {
        Self { steps, cursor: 0 }
    }

    /// Advance one step; `None` once the path is exhausted
    pub fn next_step(&mut self) -> Option<String> {
        let step = self.steps.get(self.cursor)?;
        self.cursor += 1;
        step.split('|').next().map(|s| s.trim().to_string())
    }

    /// Rewind to the first step
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
