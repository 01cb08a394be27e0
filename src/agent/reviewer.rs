use std::num::NonZeroUsize;

use crate::{
    agent::{
        prompt::{
            REVIEWER_PREAMBLE, REVIEWER_TURN, REVIEW_CONCLUSIONS_INSTRUCTIONS,
            REVIEW_TOOL_CALL_INSTRUCTIONS,
        },
        ChatModule,
    },
    llm::GatewayError,
    schemas::{Ledger, Step},
    utils::helper::fill_slots,
};

/// Everything the reviewer needs to know about the run under review.
pub struct ReviewScope<'a> {
    pub command: &'a str,
    pub executor_id: &'a str,
    pub context: &'a str,
    pub examples: &'a str,
    /// Markdown description of the executor's tools, from
    /// [`ToolRegistry::describe`](crate::tools::ToolRegistry::describe).
    pub tools: &'a str,
}

/// Secondary agent critiquing the executor's work.
///
/// Each critique re-sends the same prompt `passes` times on one conversation
/// and keeps only the last reply; repeating the question measurably lowers
/// premature-termination verdicts.
pub struct Reviewer {
    module: ChatModule,
    passes: NonZeroUsize,
}

impl Reviewer {
    pub fn new(module: ChatModule, passes: NonZeroUsize) -> Self {
        Self { module, passes }
    }

    pub fn id(&self) -> &str {
        self.module.id()
    }

    /// Critique of the latest tool-call batch: loop detection and failed-call
    /// diagnosis. Returns `"CONTINUE"` when nothing is actionable.
    pub async fn review_tool_call(
        &mut self,
        scope: &ReviewScope<'_>,
        ledger: &Ledger,
    ) -> Result<String, GatewayError> {
        let template = format!("{REVIEWER_PREAMBLE}\n{REVIEW_TOOL_CALL_INSTRUCTIONS}");
        self.review(&template, scope, ledger).await
    }

    /// Critique of a just-declared terminal status: is the conclusion backed
    /// by recorded tool calls? Returns `"CONTINUE"` when it is.
    pub async fn review_conclusions(
        &mut self,
        scope: &ReviewScope<'_>,
        ledger: &Ledger,
    ) -> Result<String, GatewayError> {
        let template = format!("{REVIEWER_PREAMBLE}\n{REVIEW_CONCLUSIONS_INSTRUCTIONS}");
        self.review(&template, scope, ledger).await
    }

    async fn review(
        &mut self,
        template: &str,
        scope: &ReviewScope<'_>,
        ledger: &Ledger,
    ) -> Result<String, GatewayError> {
        let step_schema = Step::record_schema().to_string();
        let personality = fill_slots(
            template,
            &[
                ("command", scope.command),
                ("executor_id", scope.executor_id),
                ("step_schema", &step_schema),
                ("tools", scope.tools),
                ("context", scope.context),
                ("examples", scope.examples),
            ],
        );
        self.module.set_personality(personality);
        self.module.clear_conversation();

        // The reviewer sees the full ledger, nested transcripts included.
        let steps_json = ledger.to_json();
        let prompt = fill_slots(REVIEWER_TURN, &[("steps", &steps_json)]);

        let mut critique = None;
        for _ in 0..self.passes.get() {
            let completion = self.module.chat(&prompt, None, Vec::new()).await?;
            critique = completion.text().map(str::to_string);
        }
        let critique = critique.ok_or(GatewayError::EmptyReply)?;
        log::debug!("[{}] critique: {critique}", self.module.id());
        Ok(critique)
    }
}
