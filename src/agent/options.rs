use std::num::NonZeroUsize;

/// Tuning knobs for a [`ReactAgent`](crate::agent::ReactAgent).
#[derive(Debug, Clone)]
pub struct AgentOptions {
    /// Hard bound on ledger length, the only guard against runaway loops.
    pub max_steps: usize,
    /// Whether terminal steps are submitted to the reviewer before the agent
    /// accepts them.
    pub check_last_step: bool,
    /// How many times the reviewer re-sends the same critique prompt; only
    /// the last reply is used.
    pub review_passes: NonZeroUsize,
    pub temperature: f32,
    /// Bound on each chat module's conversation length. `None` is unbounded.
    pub max_history: Option<usize>,
}

impl AgentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_check_last_step(mut self, check_last_step: bool) -> Self {
        self.check_last_step = check_last_step;
        self
    }

    pub fn with_review_passes(mut self, review_passes: NonZeroUsize) -> Self {
        self.review_passes = review_passes;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_history(mut self, max_history: Option<usize>) -> Self {
        self.max_history = max_history;
        self
    }
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            max_steps: 40,
            check_last_step: true,
            review_passes: NonZeroUsize::new(2).unwrap_or(NonZeroUsize::MIN),
            temperature: 0.0,
            max_history: None,
        }
    }
}
