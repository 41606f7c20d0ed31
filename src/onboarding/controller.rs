//! Wizard controller — step progression, answer bookkeeping, unit toggles
//! and progress.
//!
//! Every operation is a synchronous reducer over [`WizardState`]. Contract
//! violations (unknown step, unknown option, wrong step kind) come back as
//! [`WizardError`]; out-of-range numbers are clamped without complaint.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::WizardError;
use crate::units::ValueRange;

use super::collaborators::{HapticSink, Navigator};
use super::model::{Measurement, OnboardingProfile};
use super::state::{WizardPhase, WizardState};
use super::steps::{PickerConfig, StepConfig, StepKind, StepTable, Unit, UnitScale};

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    /// The last step was passed and the navigator was notified.
    Completed,
    /// Nothing happened (first step on back, already complete, Next disabled).
    Stayed,
}

pub struct WizardController {
    session_id: Uuid,
    steps: Arc<StepTable>,
    state: WizardState,
    navigator: Arc<dyn Navigator>,
    haptics: Arc<dyn HapticSink>,
}

impl WizardController {
    /// Start a wizard at the first step with nothing answered.
    pub fn new(
        steps: Arc<StepTable>,
        navigator: Arc<dyn Navigator>,
        haptics: Arc<dyn HapticSink>,
    ) -> Self {
        let mut controller = Self {
            session_id: Uuid::new_v4(),
            steps,
            state: WizardState::default(),
            navigator,
            haptics,
        };
        controller.seed_picker(0);
        info!(
            session_id = %controller.session_id,
            steps = controller.steps.len(),
            "Wizard started"
        );
        controller
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn steps(&self) -> &StepTable {
        &self.steps
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn phase(&self) -> WizardPhase {
        self.state.phase()
    }

    pub fn is_complete(&self) -> bool {
        self.state.complete
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn current_config(&self) -> &StepConfig {
        &self.steps[self.state.current_step]
    }

    pub fn answer(&self, step: usize) -> &[String] {
        self.state.answer(step)
    }

    pub fn picker_value(&self, step: usize) -> Option<i32> {
        self.state.picker_values.get(&step).copied()
    }

    pub fn active_unit(&self, step: usize) -> Unit {
        self.state.active_unit(step)
    }

    /// Scale in force for a picker step under its active unit.
    pub fn active_scale(&self, step: usize) -> Result<&UnitScale, WizardError> {
        let picker = self.picker_config(step)?;
        let unit = self.state.active_unit(step);
        picker
            .scale(unit)
            .ok_or_else(|| violation(WizardError::UnitNotSupported { step }))
    }

    pub fn active_range(&self, step: usize) -> Result<ValueRange, WizardError> {
        self.active_scale(step).map(|s| s.range)
    }

    /// Record a choice.
    ///
    /// Single choice replaces the answer and advances, unless the step waits
    /// for an explicit Next. Multi choice toggles the option, unless it is
    /// the skip option, which replaces everything and advances. Advancing
    /// only happens when `step` is the current step. A completed wizard
    /// ignores selections.
    pub fn select_option(
        &mut self,
        step: usize,
        option_id: &str,
    ) -> Result<Option<Transition>, WizardError> {
        if self.state.complete {
            debug!(step, option = option_id, "Selection after completion ignored");
            return Ok(None);
        }
        let steps = Arc::clone(&self.steps);
        let config = steps.get(step).ok_or_else(|| {
            violation(WizardError::UnknownStep {
                step,
                total: steps.len(),
            })
        })?;
        if config.is_choice() && !config.has_option(option_id) {
            return Err(violation(WizardError::UnknownOption {
                step,
                option: option_id.to_string(),
            }));
        }

        let (changed, auto_advance) = match &config.kind {
            StepKind::SingleChoice { .. } => {
                let changed = self.state.answer(step) != [option_id];
                self.state.replace_answer(step, option_id);
                (changed, !config.requires_explicit_next)
            }
            StepKind::MultiChoice { skip_option_id, .. } => {
                if skip_option_id.as_deref() == Some(option_id) {
                    let changed = self.state.answer(step) != [option_id];
                    self.state.replace_answer(step, option_id);
                    (changed, true)
                } else {
                    if let Some(skip) = skip_option_id {
                        self.state.remove_answer(step, skip);
                    }
                    if !self.state.remove_answer(step, option_id) {
                        self.state.insert_answer(step, option_id);
                    }
                    (true, false)
                }
            }
            StepKind::MagnitudePicker(_) => {
                return Err(violation(WizardError::NotAChoiceStep { step }));
            }
        };

        if changed {
            self.haptics.tick();
        }
        debug!(step, option = option_id, answer = ?self.state.answer(step), "Option selected");

        if auto_advance && step == self.state.current_step {
            Ok(Some(self.advance()))
        } else {
            Ok(None)
        }
    }

    /// Move forward one step, or complete the wizard from the last step.
    pub fn advance(&mut self) -> Transition {
        if self.state.complete {
            return Transition::Stayed;
        }
        let from = self.state.current_step;
        if from == self.steps.last_index() {
            debug_assert!(self.phase().can_transition_to(WizardPhase::Complete, self.steps.len()));
            self.state.complete = true;
            info!(session_id = %self.session_id, "Wizard complete");
            self.navigator.wizard_complete();
            return Transition::Completed;
        }
        let to = from + 1;
        self.state.current_step = to;
        self.seed_picker(to);
        info!(from, to, "Wizard advanced");
        Transition::Moved { from, to }
    }

    /// Move back one step. Answers of the step being left are kept.
    pub fn go_back(&mut self) -> Transition {
        if self.state.complete || self.state.current_step == 0 {
            return Transition::Stayed;
        }
        let from = self.state.current_step;
        let to = from - 1;
        self.state.current_step = to;
        self.seed_picker(to);
        info!(from, to, "Wizard went back");
        Transition::Moved { from, to }
    }

    /// Whether the manual "Next" action is available on the current step.
    ///
    /// Picker steps always hold a value. A choice step that waits for Next
    /// needs a selection first; an auto-advancing one only offers Next once
    /// it has been answered, i.e. when the user came back to it.
    pub fn next_enabled(&self) -> bool {
        if self.state.complete {
            return false;
        }
        let step = self.state.current_step;
        let config = self.current_config();
        !config.is_choice() || !self.state.answer(step).is_empty()
    }

    /// The manual "Next" action.
    pub fn next(&mut self) -> Transition {
        if !self.next_enabled() {
            debug!(step = self.state.current_step, "Next ignored, step incomplete");
            return Transition::Stayed;
        }
        self.advance()
    }

    /// Store a picker value, clamped into the active range. Returns the
    /// stored value.
    ///
    /// After completion the stored value is left alone and returned as is.
    pub fn set_picker_value(&mut self, step: usize, value: i32) -> Result<i32, WizardError> {
        let range = self.active_range(step)?;
        if self.state.complete {
            let stored = self.picker_value(step).unwrap_or_else(|| range.clamp(value));
            debug!(step, value, stored, "Picker value after completion ignored");
            return Ok(stored);
        }
        let stored = range.clamp(value);
        if stored != value {
            warn!(step, value, stored, range = %range, "Picker value clamped");
        }
        self.state.picker_values.insert(step, stored);
        debug!(step, value = stored, "Picker value stored");
        Ok(stored)
    }

    /// Switch a picker step to `unit`, converting and clamping its value.
    ///
    /// Returns false when `unit` was already active or the wizard is
    /// complete. The unit and value are written together after every check
    /// has passed.
    pub fn toggle_unit(&mut self, step: usize, unit: Unit) -> Result<bool, WizardError> {
        let picker = self.picker_config(step)?;
        let current_unit = self.state.active_unit(step);
        if current_unit == unit {
            return Ok(false);
        }
        if self.state.complete {
            debug!(step, unit = %unit, "Unit toggle after completion ignored");
            return Ok(false);
        }
        let target = picker
            .scale(unit)
            .ok_or_else(|| violation(WizardError::UnitNotSupported { step }))?;
        let current = match self.state.picker_values.get(&step) {
            Some(value) => *value,
            None => picker
                .scale(current_unit)
                .map(|s| s.default_value)
                .unwrap_or(picker.primary.default_value),
        };
        let converted = picker.convert(current, current_unit, unit);
        let value = target.range.clamp(converted);

        self.state.unit_toggle.insert(step, unit);
        self.state.picker_values.insert(step, value);
        self.haptics.tick();
        info!(step, from = current, to = value, unit = %unit, "Unit toggled");
        Ok(true)
    }

    /// Progress of the current step in `[1 / total, 1]`.
    pub fn compute_progress(&self) -> f32 {
        if self.state.complete {
            return 1.0;
        }
        self.progress_at(self.state.current_step)
    }

    /// Progress shown on `step`: its declared ordinal over the step count.
    ///
    /// A step without an ordinal shows the nearest earlier ordinal, and the
    /// registration step counts as 1, so the bar is never empty.
    pub fn progress_at(&self, step: usize) -> f32 {
        let total = self.steps.len();
        let ordinal = self
            .steps
            .iter()
            .take(step.saturating_add(1))
            .filter_map(|s| s.ordinal)
            .max()
            .unwrap_or(1)
            .clamp(1, total);
        ordinal as f32 / total as f32
    }

    /// Flatten the answers into a profile. Picker values are reported in the
    /// primary unit.
    pub fn profile(&self) -> OnboardingProfile {
        let mut choices = BTreeMap::new();
        let mut measurements = BTreeMap::new();

        for (index, step) in self.steps.iter().enumerate() {
            match &step.kind {
                StepKind::SingleChoice { .. } | StepKind::MultiChoice { .. } => {
                    if let Some(answer) = self.state.answers.get(&index) {
                        choices.insert(step.key.clone(), answer.clone());
                    }
                }
                StepKind::MagnitudePicker(picker) => {
                    if let Some(value) = self.state.picker_values.get(&index) {
                        let unit = self.state.active_unit(index);
                        let primary = picker
                            .primary
                            .range
                            .clamp(picker.convert(*value, unit, Unit::Primary));
                        measurements.insert(
                            step.key.clone(),
                            Measurement {
                                value: primary,
                                unit: picker.primary.label.clone(),
                            },
                        );
                    }
                }
            }
        }

        OnboardingProfile {
            session_id: self.session_id,
            choices,
            measurements,
            completed_at: Utc::now(),
        }
    }

    pub fn into_state(self) -> WizardState {
        self.state
    }

    fn step_config(&self, step: usize) -> Result<&StepConfig, WizardError> {
        self.steps.get(step).ok_or_else(|| {
            violation(WizardError::UnknownStep {
                step,
                total: self.steps.len(),
            })
        })
    }

    fn picker_config(&self, step: usize) -> Result<&PickerConfig, WizardError> {
        self.step_config(step)?
            .picker()
            .ok_or_else(|| violation(WizardError::NotAPickerStep { step }))
    }

    /// Give a picker step its default the first time it is shown.
    fn seed_picker(&mut self, step: usize) {
        if self.state.picker_values.contains_key(&step) {
            return;
        }
        let unit = self.state.active_unit(step);
        let default = self
            .steps
            .get(step)
            .and_then(StepConfig::picker)
            .and_then(|p| p.scale(unit))
            .map(|s| s.default_value);
        if let Some(value) = default {
            self.state.picker_values.insert(step, value);
        }
    }
}

fn violation(err: WizardError) -> WizardError {
    error!(error = %err, "Wizard contract violation");
    err
}
