use std::slice;

use crate::schemas::Step;

/// Append-only, strictly ordered record of the steps performed while
/// executing one command.
///
/// A ledger is owned by exactly one agent and mutated only by its executor;
/// it is cleared at the start of each run.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    steps: Vec<Step>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Step> {
        self.steps.last_mut()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter(&self) -> slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn push(&mut self, step: Step) {
        match serde_json::to_string(&step) {
            Ok(json) => log::debug!("Step appended: {json}"),
            Err(e) => log::warn!("Unable to serialize step for logging: {e}"),
        }
        self.steps.push(step);
    }

    /// Full JSON rendering, nested `action_steps` included. Used for audit
    /// logging and for the reviewer, which may need the nested transcripts.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.steps).unwrap_or_else(|e| {
            log::warn!("Failed to serialize ledger: {e}");
            "[]".to_string()
        })
    }

    /// Prompt rendering: nested `action_steps` are suppressed to bound
    /// payload growth across iterations.
    pub fn to_prompt_json(&self) -> String {
        let views: Vec<Step> = self.steps.iter().map(Step::prompt_view).collect();
        serde_json::to_string(&views).unwrap_or_else(|e| {
            log::warn!("Failed to serialize ledger: {e}");
            "[]".to_string()
        })
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Step;
    type IntoIter = slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{ActionRecord, Status, Step};

    #[test]
    fn test_push_and_last() {
        let mut ledger = Ledger::new();
        assert!(ledger.last().is_none());

        ledger.push(Step::new("a", "t1", "o1"));
        ledger.push(Step::new("a", "t2", "o2").with_status(Status::Completed));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.last().unwrap().thought, "t2");
        assert!(ledger.last().unwrap().is_terminal());
    }

    #[test]
    fn test_clear() {
        let mut ledger = Ledger::new();
        ledger.push(Step::new("a", "t", "o"));
        ledger.clear();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_prompt_json_suppresses_nested_steps() {
        let mut ledger = Ledger::new();
        ledger.push(
            Step::new("outer", "delegating", "done").with_action(ActionRecord {
                action: "The tool \"inner\" has been called".into(),
                action_input: "{}".into(),
                action_steps: vec![Step::new("inner", "nested", "nested done")],
            }),
        );

        assert!(ledger.to_json().contains("action_steps"));
        assert!(!ledger.to_prompt_json().contains("action_steps"));
    }
}
