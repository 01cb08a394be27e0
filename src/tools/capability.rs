use std::error::Error;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{
    schemas::{Step, ToolCall, ToolCallResult},
    tools::ToolFunction,
};

/// Outcome of dispatching one tool call: the result handed back to the model
/// plus, for agent-backed capabilities, the steps the inner agent performed.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub result: ToolCallResult,
    pub nested_steps: Vec<Step>,
}

impl ToolInvocation {
    pub fn new(result: ToolCallResult) -> Self {
        Self {
            result,
            nested_steps: Vec::new(),
        }
    }

    pub fn with_nested_steps(mut self, nested_steps: Vec<Step>) -> Self {
        self.nested_steps = nested_steps;
        self
    }
}

/// A capability backed by a whole agent rather than a plain function. Its
/// invocation yields a result string and the inner agent's own step trace.
#[async_trait]
pub trait AgentCapability: Send + Sync {
    fn name(&self) -> String;

    fn description(&self) -> String;

    fn parameters(&self) -> Value;

    async fn execute(
        &self,
        arguments: Map<String, Value>,
    ) -> Result<(String, Vec<Step>), Box<dyn Error + Send + Sync>>;

    async fn close(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// Anything the registry can dispatch to. Simple tools and agent-backed
/// tools share one registration surface; the variant only matters at
/// invocation time, where agent capabilities additionally surface their
/// nested steps.
pub enum Capability {
    Simple(Box<dyn ToolFunction>),
    Agent(Box<dyn AgentCapability>),
}

impl Capability {
    pub fn name(&self) -> String {
        match self {
            Capability::Simple(tool) => tool.name(),
            Capability::Agent(agent) => agent.name(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Capability::Simple(tool) => tool.description(),
            Capability::Agent(agent) => agent.description(),
        }
    }

    pub fn parameters(&self) -> Value {
        match self {
            Capability::Simple(tool) => tool.parameters(),
            Capability::Agent(agent) => agent.parameters(),
        }
    }

    pub(crate) async fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        match self {
            Capability::Simple(tool) => tool.init().await,
            Capability::Agent(_) => Ok(()),
        }
    }

    pub(crate) async fn close(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        match self {
            Capability::Simple(tool) => tool.close().await,
            Capability::Agent(agent) => agent.close().await,
        }
    }

    /// Runs the capability with the call's stripped arguments. Capability
    /// failures are captured as error results, never propagated.
    pub(crate) async fn invoke(&self, call: &ToolCall) -> ToolInvocation {
        let arguments = call.stripped_arguments();
        match self {
            Capability::Simple(tool) => match tool.call(arguments).await {
                Ok(result) => ToolInvocation::new(ToolCallResult::from_call(call, result)),
                Err(e) => ToolInvocation::new(ToolCallResult::from_failure(call, e)),
            },
            Capability::Agent(agent) => match agent.execute(arguments).await {
                Ok((result, nested_steps)) => {
                    ToolInvocation::new(ToolCallResult::from_call(call, result))
                        .with_nested_steps(nested_steps)
                }
                Err(e) => ToolInvocation::new(ToolCallResult::from_failure(call, e)),
            },
        }
    }
}

impl From<Box<dyn ToolFunction>> for Capability {
    fn from(tool: Box<dyn ToolFunction>) -> Self {
        Capability::Simple(tool)
    }
}

impl From<Box<dyn AgentCapability>> for Capability {
    fn from(agent: Box<dyn AgentCapability>) -> Self {
        Capability::Agent(agent)
    }
}
