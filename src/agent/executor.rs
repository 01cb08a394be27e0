use serde_json::Value;

use crate::{
    agent::{
        prompt::{
            CONTINUE, DEFAULT_THOUGHT, EXECUTOR_PROMPT, EXECUTOR_TURN, INITIAL_SUGGESTION,
            KEEP_ACTING, SEED_OBSERVATION, SEED_THOUGHT,
        },
        ChatModule, ReviewScope, Reviewer,
    },
    schemas::{ActionRecord, CompletionContent, FinishReason, Ledger, Status, Step, ToolCallResult},
    tools::{ToolInvocation, ToolRegistry},
    utils::helper::fill_slots,
};

/// Where one run of the loop ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    Running,
    HaltedCompleted,
    HaltedError,
    HaltedOverflow,
}

/// Strings the orchestrating agent injects into every prompt of a run.
pub struct ExecutionProfile<'a> {
    pub context: &'a str,
    pub examples: &'a str,
}

/// The ReAct state machine: render the ledger into a prompt, query the
/// model, dispatch requested tool calls or record the replied step, consult
/// the reviewer, repeat until a terminal status or the step budget.
pub struct Executor {
    module: ChatModule,
    max_steps: usize,
    check_last_step: bool,
}

impl Executor {
    pub fn new(module: ChatModule, max_steps: usize, check_last_step: bool) -> Self {
        Self {
            module,
            max_steps,
            check_last_step,
        }
    }

    pub fn id(&self) -> &str {
        self.module.id()
    }

    /// Runs the loop to a halt state. Failures surface as the returned
    /// step's status and observation, never as an error.
    pub async fn execute(
        &mut self,
        command: &str,
        profile: &ExecutionProfile<'_>,
        registry: &ToolRegistry,
        reviewer: &mut Reviewer,
        ledger: &mut Ledger,
    ) -> (Step, ExecutorState) {
        ledger.clear();

        let step_schema = Step::record_schema();
        let schema_text = step_schema.to_string();
        let id = self.module.id().to_string();

        self.module.set_personality(fill_slots(
            EXECUTOR_PROMPT,
            &[
                ("command", command),
                ("id", &id),
                ("context", profile.context),
                ("step_schema", &schema_text),
                ("output_schema", &schema_text),
                ("examples", profile.examples),
            ],
        ));

        let seed_thought = fill_slots(SEED_THOUGHT, &[("command", command)]);
        ledger.push(
            Step::new(&id, seed_thought, SEED_OBSERVATION).with_status(Status::InProgress),
        );

        let tool_descriptions = registry.describe();
        let scope = ReviewScope {
            command,
            executor_id: &id,
            context: profile.context,
            examples: profile.examples,
            tools: &tool_descriptions,
        };
        let tools = registry.tool_specs();
        let mut suggestion = INITIAL_SUGGESTION.to_string();

        while ledger.len() < self.max_steps && !last_is_terminal(ledger) {
            self.module.clear_conversation();

            let steps_json = ledger.to_prompt_json();
            let prompt = fill_slots(
                EXECUTOR_TURN,
                &[("steps", &steps_json), ("suggestion", &suggestion)],
            );

            let reply = match self
                .module
                .chat(&prompt, Some(step_schema.clone()), tools.clone())
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    ledger.push(model_failure_step(
                        &id,
                        "LLM was called but this resulted in an error.",
                        &prompt,
                        e.to_string(),
                    ));
                    break;
                }
            };

            if reply.finish_reason != FinishReason::Completed {
                ledger.push(model_failure_step(
                    &id,
                    "LLM was called but this resulted in a truncated message.",
                    &prompt,
                    format!("Response finish reason: {}", reply.finish_reason),
                ));
                break;
            }

            match reply.content {
                CompletionContent::ToolCalls(calls) => {
                    let mut with_error = false;
                    let mut truncated_batch = false;

                    for call in &calls {
                        let invocation = match registry.dispatch(call).await {
                            Ok(invocation) => invocation,
                            Err(e) => {
                                ToolInvocation::new(ToolCallResult::from_failure(call, e))
                            }
                        };
                        with_error |= invocation.result.indicates_error();

                        let thought = call
                            .thought()
                            .unwrap_or_else(|| DEFAULT_THOUGHT.to_string());
                        let action_input =
                            Value::Object(call.stripped_arguments()).to_string();
                        ledger.push(
                            Step::new(&id, thought, invocation.result.text())
                                .with_status(Status::InProgress)
                                .with_action(ActionRecord {
                                    action: format!(
                                        "The tool \"{}\" has been called",
                                        call.tool_id
                                    ),
                                    action_input,
                                    action_steps: invocation.nested_steps,
                                }),
                        );

                        if ledger.len() >= self.max_steps {
                            truncated_batch = true;
                            break;
                        }
                    }

                    // A truncated batch goes straight to the overflow check,
                    // no critique.
                    if truncated_batch {
                        continue;
                    }

                    suggestion = if with_error {
                        match reviewer.review_tool_call(&scope, ledger).await {
                            Ok(critique) => critique,
                            Err(e) => {
                                ledger.push(reviewer_failure_step(&id, e.to_string()));
                                break;
                            }
                        }
                    } else {
                        CONTINUE.to_string()
                    };
                }
                CompletionContent::Text(text) => {
                    match Step::parse(&text) {
                        Ok(mut step) => {
                            // The model is not trusted to self-identify.
                            step.actor = id.clone();
                            ledger.push(step);
                        }
                        Err(e) => {
                            ledger.push(
                                Step::new(
                                    &id,
                                    format!("I stopped because I encountered this error: {e}"),
                                    text,
                                )
                                .with_status(Status::Error),
                            );
                        }
                    }

                    if !last_is_terminal(ledger) {
                        suggestion = KEEP_ACTING.to_string();
                    } else if self.check_last_step {
                        let critique = match reviewer.review_conclusions(&scope, ledger).await
                        {
                            Ok(critique) => critique,
                            Err(e) => {
                                ledger.push(reviewer_failure_step(&id, e.to_string()));
                                break;
                            }
                        };
                        if !critique.to_lowercase().contains("continue") {
                            if let Some(last) = ledger.last_mut() {
                                last.status = Some(Status::InProgress);
                            }
                            suggestion = critique;
                        }
                    }
                }
            }
        }

        let state = if ledger.len() >= self.max_steps {
            log::error!("[{id}] maximum steps exceeded, aborting execution");
            ledger.push(
                Step::new(
                    &id,
                    format!(
                        "Execution was stopped because it exceeded maximum number of steps ({}).",
                        self.max_steps
                    ),
                    "I probably entered some kind of loop.",
                )
                .with_status(Status::Error),
            );
            ExecutorState::HaltedOverflow
        } else if matches!(ledger.last().and_then(|s| s.status), Some(Status::Completed)) {
            ExecutorState::HaltedCompleted
        } else {
            ExecutorState::HaltedError
        };

        let step = ledger
            .last()
            .cloned()
            .unwrap_or_else(|| Step::new(&id, "", "Ledger is empty.").with_status(Status::Error));
        (step, state)
    }
}

fn last_is_terminal(ledger: &Ledger) -> bool {
    ledger.last().is_some_and(Step::is_terminal)
}

/// Terminal step recording a failed model call; the prompt that triggered it
/// is preserved as the action input.
fn model_failure_step(id: &str, action: &str, prompt: &str, observation: String) -> Step {
    Step::new(id, "I had something in mind...", observation)
        .with_status(Status::Error)
        .with_action(ActionRecord {
            action: action.to_string(),
            action_input: prompt.to_string(),
            action_steps: Vec::new(),
        })
}

fn reviewer_failure_step(id: &str, observation: String) -> Step {
    Step::new(id, "I asked for a review of my work...", observation)
        .with_status(Status::Error)
        .with_action(ActionRecord {
            action: "The reviewer was consulted but this resulted in an error.".to_string(),
            action_input: String::new(),
            action_steps: Vec::new(),
        })
}
