//! Error types for the onboarding wizard.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Picker error: {0}")]
    Picker(#[from] PickerError),

    #[error("Profile sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Question bank errors, raised while building a `StepTable`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Question bank has no steps")]
    Empty,

    #[error("Step {step} ({key}) repeats option id {option}")]
    DuplicateOption {
        step: usize,
        key: String,
        option: String,
    },

    #[error("Step {step} ({key}) has no options")]
    NoOptions { step: usize, key: String },

    #[error("Step {step} ({key}) skip option {option} is not one of its options")]
    UnknownSkipOption {
        step: usize,
        key: String,
        option: String,
    },

    #[error("Step {step} ({key}) has inverted range [{min}, {max}]")]
    InvertedRange {
        step: usize,
        key: String,
        min: i32,
        max: i32,
    },

    #[error("Step {step} ({key}) default {value} is outside [{min}, {max}]")]
    DefaultOutOfRange {
        step: usize,
        key: String,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("Step {step} ({key}) secondary unit and conversion must be given together")]
    ConversionMismatch { step: usize, key: String },

    #[error("Step {step} ({key}) has invalid conversion factor {factor}")]
    InvalidFactor { step: usize, key: String, factor: f64 },

    #[error("Step {step} ({key}) declares ordinal {ordinal} outside 1..={total}")]
    OrdinalOutOfRange {
        step: usize,
        key: String,
        ordinal: usize,
        total: usize,
    },

    #[error("Step {step} ({key}) ordinal {ordinal} is lower than a preceding step's")]
    OrdinalDecreasing {
        step: usize,
        key: String,
        ordinal: usize,
    },

    #[error("Failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Contract violations on the wizard controller.
///
/// These indicate a caller bug, never bad user input.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Step {step} does not exist ({total} steps)")]
    UnknownStep { step: usize, total: usize },

    #[error("Step {step} has no option {option}")]
    UnknownOption { step: usize, option: String },

    #[error("Step {step} is not a choice step")]
    NotAChoiceStep { step: usize },

    #[error("Step {step} is not a picker step")]
    NotAPickerStep { step: usize },

    #[error("Step {step} has no secondary unit")]
    UnitNotSupported { step: usize },
}

/// Picker construction errors.
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    #[error("Picker range [{min}, {max}] is inverted")]
    InvertedRange { min: i32, max: i32 },

    #[error("Initial value {value} is outside [{min}, {max}]")]
    InitialOutOfRange { value: i32, min: i32, max: i32 },

    #[error("Item extent must be positive and finite, got {0}")]
    InvalidItemExtent(f32),
}

/// Errors reported by a `ProfileSink`.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Profile rejected: {0}")]
    Rejected(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the wizard.
pub type Result<T> = std::result::Result<T, Error>;
