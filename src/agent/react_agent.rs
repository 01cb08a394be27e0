use std::sync::Arc;

use crate::{
    agent::{AgentOptions, ChatModule, ExecutionProfile, Executor, ExecutorState, Reviewer},
    llm::ModelGateway,
    schemas::{Ledger, Status, Step},
    tools::{LifecycleError, ToolRegistry},
};

/// The orchestrating agent: owns one executor, one reviewer, one tool
/// registry and one ledger, all fixed at construction time.
///
/// One `execute` call drives the whole loop to a halt state before
/// returning; `&mut self` rules out interleaved runs on the same instance.
pub struct ReactAgent {
    id: String,
    description: String,
    context: String,
    examples: String,
    registry: ToolRegistry,
    executor: Executor,
    reviewer: Reviewer,
    ledger: Ledger,
    state: ExecutorState,
    closed: bool,
}

impl ReactAgent {
    /// Builds the agent and initializes its tools. The registry must not
    /// have been initialized by anyone else.
    pub async fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        gateway: Arc<dyn ModelGateway>,
        mut registry: ToolRegistry,
        options: AgentOptions,
    ) -> Result<Self, LifecycleError> {
        let id = id.into();
        registry.init_all(&id).await?;

        let executor_module = ChatModule::new(format!("{id}-executor"), Arc::clone(&gateway))
            .with_temperature(options.temperature)
            .with_max_history(options.max_history);
        let reviewer_module = ChatModule::new(format!("{id}-reviewer"), gateway)
            .with_temperature(options.temperature)
            .with_max_history(options.max_history);

        Ok(Self {
            id,
            description: description.into(),
            context: String::new(),
            examples: String::new(),
            registry,
            executor: Executor::new(executor_module, options.max_steps, options.check_last_step),
            reviewer: Reviewer::new(reviewer_module, options.review_passes),
            ledger: Ledger::new(),
            state: ExecutorState::Running,
            closed: false,
        })
    }

    /// Free-form background injected into executor and reviewer prompts.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Worked examples injected into executor and reviewer prompts.
    pub fn with_examples(mut self, examples: impl Into<String>) -> Self {
        self.examples = examples.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    pub fn last_step(&self) -> Option<&Step> {
        self.ledger.last()
    }

    /// Executes one command to completion and returns the final step.
    /// Failures are reported through the step's status, never as an error.
    pub async fn execute(&mut self, command: &str) -> Step {
        if self.closed {
            return Step::new(&self.id, "I cannot run anymore.", LifecycleError::Closed.to_string())
                .with_status(Status::Error);
        }

        log::info!("[{}] executing command: {command}", self.id);
        let profile = ExecutionProfile {
            context: &self.context,
            examples: &self.examples,
        };
        let (step, state) = self
            .executor
            .execute(
                command,
                &profile,
                &self.registry,
                &mut self.reviewer,
                &mut self.ledger,
            )
            .await;
        self.state = state;
        log::info!("[{}] halted: {state:?}", self.id);
        step
    }

    /// Closes every registered tool. Must be called exactly once, after the
    /// last `execute`.
    pub async fn close(&mut self) -> Result<(), LifecycleError> {
        self.registry.close_all().await?;
        self.closed = true;
        Ok(())
    }
}
