//! Onboarding wizard — the first-launch questionnaire.
//!
//! A fixed sequence of choice and picker steps collects the user's health
//! profile. The controller owns the answers, the session drives it from UI
//! events, and the finished profile is handed to a `ProfileSink`.

pub mod bank;
pub mod collaborators;
pub mod controller;
pub mod model;
pub mod session;
pub mod state;
pub mod steps;

pub use collaborators::{HapticSink, Navigator, NoopHaptics, ProfileSink, ProfileStore};
pub use controller::{Transition, WizardController};
pub use model::{Measurement, OnboardingProfile};
pub use session::{OnboardingSession, SessionStatus, WizardEvent};
pub use state::{WizardPhase, WizardState};
pub use steps::{
    ChoiceOption, LabelFormat, PickerConfig, StepConfig, StepKind, StepTable, Unit, UnitScale,
};
