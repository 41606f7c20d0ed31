//! OnboardingSession — wires the controller, the mounted picker and the host
//! collaborators into one event loop.
//!
//! The host forwards UI events through [`OnboardingSession::dispatch`] and
//! drains timer commands with [`OnboardingSession::drain_commands`] or
//! [`OnboardingSession::next_command`]. Everything runs on the caller's task;
//! the only background work is the picker's re-center timer.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::WizardConfig;
use crate::error::{PickerError, Result};
use crate::picker::{
    CommandReceiver, CommandSender, MagnitudePicker, PickerCommand, PickerSpec, SettleOutcome,
    command_channel,
};

use super::collaborators::{HapticSink, Navigator, ProfileSink};
use super::controller::{Transition, WizardController};
use super::state::WizardPhase;
use super::steps::{StepTable, Unit};

/// UI events the host forwards to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    Select { step: usize, option: String },
    Next,
    Back,
    ToggleUnit { step: usize, unit: Unit },
    ScrollBegin,
    Scroll { offset: f32 },
    ScrollEnd { offset: f32, velocity: f32 },
    MomentumEnd { offset: f32 },
}

/// Snapshot returned after each event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStatus {
    pub phase: WizardPhase,
    pub progress: f32,
    pub next_enabled: bool,
    /// Value committed by a picker settle during this event, if any.
    pub committed_value: Option<i32>,
}

/// The picker on screen and what it was built for.
#[derive(Debug)]
struct MountedPicker {
    step: usize,
    unit: Unit,
    picker: MagnitudePicker,
}

pub struct OnboardingSession {
    config: WizardConfig,
    controller: WizardController,
    mounted: Option<MountedPicker>,
    haptics: Arc<dyn HapticSink>,
    sink: Arc<dyn ProfileSink>,
    commands_tx: CommandSender,
    commands_rx: CommandReceiver,
}

impl OnboardingSession {
    pub fn new(
        steps: Arc<StepTable>,
        config: WizardConfig,
        navigator: Arc<dyn Navigator>,
        haptics: Arc<dyn HapticSink>,
        sink: Arc<dyn ProfileSink>,
    ) -> Result<Self> {
        let controller = WizardController::new(steps, navigator, Arc::clone(&haptics));
        let (commands_tx, commands_rx) = command_channel();
        let mut session = Self {
            config,
            controller,
            mounted: None,
            haptics,
            sink,
            commands_tx,
            commands_rx,
        };
        session.sync_picker()?;
        Ok(session)
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// The picker on screen, if the current step is a picker step.
    pub fn picker(&self) -> Option<&MagnitudePicker> {
        self.mounted.as_ref().map(|m| &m.picker)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            phase: self.controller.phase(),
            progress: self.controller.compute_progress(),
            next_enabled: self.controller.next_enabled(),
            committed_value: None,
        }
    }

    /// Apply one UI event.
    pub async fn dispatch(&mut self, event: WizardEvent) -> Result<SessionStatus> {
        let mut committed_value = None;
        let transition = match event {
            WizardEvent::Select { step, option } => {
                self.controller.select_option(step, &option)?
            }
            WizardEvent::Next => Some(self.controller.next()),
            WizardEvent::Back => Some(self.controller.go_back()),
            WizardEvent::ToggleUnit { step, unit } => {
                self.controller.toggle_unit(step, unit)?;
                None
            }
            WizardEvent::ScrollBegin => {
                if let Some(m) = self.mounted.as_mut() {
                    m.picker.begin_drag();
                }
                None
            }
            WizardEvent::Scroll { offset } => {
                if let Some(m) = self.mounted.as_mut() {
                    m.picker.scroll_to(offset);
                }
                None
            }
            WizardEvent::ScrollEnd { offset, velocity } => {
                let outcome = self
                    .mounted
                    .as_mut()
                    .and_then(|m| m.picker.end_drag(offset, velocity));
                committed_value = self.commit(outcome)?;
                None
            }
            WizardEvent::MomentumEnd { offset } => {
                let outcome = self.mounted.as_mut().map(|m| m.picker.end_momentum(offset));
                committed_value = self.commit(outcome)?;
                None
            }
        };

        if transition == Some(Transition::Completed) {
            self.finish().await?;
        }
        self.sync_picker()?;

        Ok(SessionStatus {
            committed_value,
            ..self.status()
        })
    }

    /// Apply every timer command already queued. Returns how many applied.
    pub fn drain_commands(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.commands_rx.try_recv() {
            if self.apply_command(command) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next timer command and apply it. Returns false when it
    /// targeted a picker that is no longer mounted.
    pub async fn next_command(&mut self) -> bool {
        match self.commands_rx.recv().await {
            Some(command) => self.apply_command(command),
            None => false,
        }
    }

    fn apply_command(&mut self, command: PickerCommand) -> bool {
        match self.mounted.as_mut() {
            Some(m) => m.picker.apply(command),
            None => {
                debug!(picker_id = %command.picker_id(), "Command for unmounted picker dropped");
                false
            }
        }
    }

    /// Copy a settled value into the controller.
    fn commit(&mut self, outcome: Option<SettleOutcome>) -> Result<Option<i32>> {
        let (Some(outcome), Some(m)) = (outcome, self.mounted.as_ref()) else {
            return Ok(None);
        };
        match outcome.changed {
            Some(changed) => {
                let stored = self.controller.set_picker_value(m.step, changed.value)?;
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }

    async fn finish(&mut self) -> Result<()> {
        self.mounted = None;
        let profile = self.controller.profile();
        info!(
            session_id = %profile.session_id,
            choices = profile.choices.len(),
            measurements = profile.measurements.len(),
            "Submitting onboarding profile"
        );
        self.sink.submit(profile).await?;
        Ok(())
    }

    /// Make the mounted picker match the current step and unit.
    ///
    /// A picker is rebuilt from scratch whenever its step or unit changes;
    /// dropping the old one cancels its pending re-center.
    fn sync_picker(&mut self) -> std::result::Result<(), PickerError> {
        if self.controller.is_complete() {
            self.mounted = None;
            return Ok(());
        }
        let step = self.controller.current_step();
        let unit = self.controller.active_unit(step);
        let scale = match self.controller.current_config().picker() {
            Some(picker) => picker.scale(unit).cloned(),
            None => None,
        };
        let Some(scale) = scale else {
            self.mounted = None;
            return Ok(());
        };
        if self
            .mounted
            .as_ref()
            .is_some_and(|m| m.step == step && m.unit == unit)
        {
            return Ok(());
        }

        self.mounted = None;
        let initial_value = self
            .controller
            .picker_value(step)
            .unwrap_or(scale.default_value);
        let mut picker = MagnitudePicker::new(
            PickerSpec {
                range: scale.range,
                initial_value,
                item_extent: self.config.item_extent,
            },
            &self.config,
            scale.format.formatter(),
            Arc::clone(&self.haptics),
        )?;
        picker.schedule_recenter(self.config.recenter_delay, self.commands_tx.clone());
        info!(step, unit = %unit, picker_id = %picker.id(), "Picker mounted for step");
        self.mounted = Some(MountedPicker { step, unit, picker });
        Ok(())
    }
}
