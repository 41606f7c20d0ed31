//! Wizard state — which step is showing and what has been answered so far.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::steps::Unit;

/// Where the wizard is.
///
/// Progresses one step at a time: Step(0) → Step(1) → … → Step(N-1) →
/// Complete, with single-step moves back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    Step(usize),
    Complete,
}

impl WizardPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Check if a move from `self` to `target` is allowed in a wizard of
    /// `total` steps.
    pub fn can_transition_to(&self, target: WizardPhase, total: usize) -> bool {
        match (*self, target) {
            (Self::Step(from), Self::Step(to)) => {
                to < total && (to == from + 1 || to + 1 == from)
            }
            (Self::Step(from), Self::Complete) => from + 1 == total,
            (Self::Complete, _) => false,
        }
    }
}

impl std::fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Step(index) => write!(f, "step_{index}"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Mutable wizard bookkeeping, owned by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub current_step: usize,
    /// Selected option ids per choice step, in selection order.
    pub answers: BTreeMap<usize, Vec<String>>,
    /// Picker value per picker step, in the step's active unit.
    pub picker_values: BTreeMap<usize, i32>,
    /// Active unit per picker step. Absent means the primary unit.
    pub unit_toggle: BTreeMap<usize, Unit>,
    pub complete: bool,
}

impl WizardState {
    pub fn phase(&self) -> WizardPhase {
        if self.complete {
            WizardPhase::Complete
        } else {
            WizardPhase::Step(self.current_step)
        }
    }

    pub fn answer(&self, step: usize) -> &[String] {
        self.answers.get(&step).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn active_unit(&self, step: usize) -> Unit {
        self.unit_toggle.get(&step).copied().unwrap_or_default()
    }

    /// Add `id` to the step's answers unless it is already there.
    pub(crate) fn insert_answer(&mut self, step: usize, id: &str) {
        let answer = self.answers.entry(step).or_default();
        if !answer.iter().any(|a| a == id) {
            answer.push(id.to_string());
        }
    }

    /// Remove `id` from the step's answers. Returns whether it was present.
    pub(crate) fn remove_answer(&mut self, step: usize, id: &str) -> bool {
        match self.answers.get_mut(&step) {
            Some(answer) => {
                let before = answer.len();
                answer.retain(|a| a != id);
                before != answer.len()
            }
            None => false,
        }
    }

    pub(crate) fn replace_answer(&mut self, step: usize, id: &str) {
        self.answers.insert(step, vec![id.to_string()]);
    }
}
