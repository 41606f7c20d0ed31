//! Step definitions — the ordered, read-only question bank.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::units::{Conversion, ValueRange};

/// One selectable answer on a choice step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_label: Option<String>,
}

impl ChoiceOption {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            sub_label: None,
        }
    }

    pub fn with_sub_label(mut self, sub_label: &str) -> Self {
        self.sub_label = Some(sub_label.to_string());
        self
    }
}

/// How picker rows are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFormat {
    #[default]
    Plain,
    /// Inches rendered as `feet'inches"`.
    FeetInches,
}

/// Which of a picker step's units is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    #[default]
    Primary,
    Secondary,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Bounds, default and labelling for a picker in one unit system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitScale {
    /// Toggle label, e.g. "Cm" or "Feet".
    pub label: String,
    pub range: ValueRange,
    pub default_value: i32,
    #[serde(default)]
    pub format: LabelFormat,
}

impl UnitScale {
    pub fn new(label: &str, min: i32, max: i32, default_value: i32) -> Self {
        Self {
            label: label.to_string(),
            range: ValueRange::new(min, max),
            default_value,
            format: LabelFormat::Plain,
        }
    }

    pub fn with_format(mut self, format: LabelFormat) -> Self {
        self.format = format;
        self
    }
}

/// Picker step shape. A step without `secondary` has one fixed unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickerConfig {
    pub primary: UnitScale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<UnitScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion: Option<Conversion>,
}

impl PickerConfig {
    pub fn single(scale: UnitScale) -> Self {
        Self {
            primary: scale,
            secondary: None,
            conversion: None,
        }
    }

    pub fn toggled(primary: UnitScale, secondary: UnitScale, conversion: Conversion) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
            conversion: Some(conversion),
        }
    }

    pub fn has_toggle(&self) -> bool {
        self.secondary.is_some()
    }

    /// Scale for `unit`, or `None` when the step has no such unit.
    pub fn scale(&self, unit: Unit) -> Option<&UnitScale> {
        match unit {
            Unit::Primary => Some(&self.primary),
            Unit::Secondary => self.secondary.as_ref(),
        }
    }

    /// Convert `value` from unit `from` into unit `to`. Unclamped.
    pub fn convert(&self, value: i32, from: Unit, to: Unit) -> i32 {
        match (from, to, self.conversion) {
            (Unit::Primary, Unit::Secondary, Some(c)) => c.to_secondary(value),
            (Unit::Secondary, Unit::Primary, Some(c)) => c.to_primary(value),
            _ => value,
        }
    }
}

/// What a step asks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    SingleChoice {
        options: Vec<ChoiceOption>,
    },
    MultiChoice {
        options: Vec<ChoiceOption>,
        /// Choosing this clears every other selection and advances.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        skip_option_id: Option<String>,
    },
    MagnitudePicker(PickerConfig),
}

/// One wizard step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Field name in the completed profile.
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(flatten)]
    pub kind: StepKind,
    /// Needs a manual "Next" rather than advancing on selection.
    #[serde(default)]
    pub requires_explicit_next: bool,
    /// 1-based position used for progress. The registration step has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<usize>,
}

impl StepConfig {
    pub fn new(key: &str, title: &str, kind: StepKind) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            subtitle: None,
            kind,
            requires_explicit_next: false,
            ordinal: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    pub fn explicit_next(mut self) -> Self {
        self.requires_explicit_next = true;
        self
    }

    pub fn with_ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    /// Options of a choice step; empty for pickers.
    pub fn options(&self) -> &[ChoiceOption] {
        match &self.kind {
            StepKind::SingleChoice { options } | StepKind::MultiChoice { options, .. } => options,
            StepKind::MagnitudePicker(_) => &[],
        }
    }

    pub fn has_option(&self, id: &str) -> bool {
        self.options().iter().any(|o| o.id == id)
    }

    pub fn skip_option_id(&self) -> Option<&str> {
        match &self.kind {
            StepKind::MultiChoice { skip_option_id, .. } => skip_option_id.as_deref(),
            _ => None,
        }
    }

    pub fn picker(&self) -> Option<&PickerConfig> {
        match &self.kind {
            StepKind::MagnitudePicker(config) => Some(config),
            _ => None,
        }
    }

    pub fn is_choice(&self) -> bool {
        !matches!(self.kind, StepKind::MagnitudePicker(_))
    }
}

/// Validated, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StepTable {
    steps: Vec<StepConfig>,
}

impl StepTable {
    /// Validate and wrap `steps`.
    pub fn new(steps: Vec<StepConfig>) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::Empty);
        }
        let total = steps.len();
        let mut last_ordinal = 0;
        for (index, step) in steps.iter().enumerate() {
            validate_step(index, step)?;
            if let Some(ordinal) = step.ordinal {
                if ordinal == 0 || ordinal > total {
                    return Err(ConfigError::OrdinalOutOfRange {
                        step: index,
                        key: step.key.clone(),
                        ordinal,
                        total,
                    });
                }
                if ordinal < last_ordinal {
                    return Err(ConfigError::OrdinalDecreasing {
                        step: index,
                        key: step.key.clone(),
                        ordinal,
                    });
                }
                last_ordinal = ordinal;
            }
        }
        Ok(Self { steps })
    }

    /// Parse and validate a JSON array of steps.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let steps: Vec<StepConfig> = serde_json::from_str(json)?;
        Self::new(steps)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StepConfig> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepConfig> {
        self.steps.iter()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn as_slice(&self) -> &[StepConfig] {
        &self.steps
    }

    /// Index of the step with `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.key == key)
    }
}

impl std::ops::Index<usize> for StepTable {
    type Output = StepConfig;

    fn index(&self, index: usize) -> &StepConfig {
        &self.steps[index]
    }
}

fn validate_step(index: usize, step: &StepConfig) -> Result<(), ConfigError> {
    match &step.kind {
        StepKind::SingleChoice { options } => validate_options(index, step, options),
        StepKind::MultiChoice {
            options,
            skip_option_id,
        } => {
            validate_options(index, step, options)?;
            match skip_option_id {
                Some(skip) if !options.iter().any(|o| &o.id == skip) => {
                    Err(ConfigError::UnknownSkipOption {
                        step: index,
                        key: step.key.clone(),
                        option: skip.clone(),
                    })
                }
                _ => Ok(()),
            }
        }
        StepKind::MagnitudePicker(picker) => {
            validate_scale(index, step, &picker.primary)?;
            if let Some(secondary) = &picker.secondary {
                validate_scale(index, step, secondary)?;
            }
            match (&picker.secondary, &picker.conversion) {
                (Some(_), Some(conversion)) if !conversion.is_valid() => {
                    Err(ConfigError::InvalidFactor {
                        step: index,
                        key: step.key.clone(),
                        factor: conversion.factor,
                    })
                }
                (Some(_), Some(_)) | (None, None) => Ok(()),
                _ => Err(ConfigError::ConversionMismatch {
                    step: index,
                    key: step.key.clone(),
                }),
            }
        }
    }
}

fn validate_options(
    index: usize,
    step: &StepConfig,
    options: &[ChoiceOption],
) -> Result<(), ConfigError> {
    if options.is_empty() {
        return Err(ConfigError::NoOptions {
            step: index,
            key: step.key.clone(),
        });
    }
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.id.as_str()) {
            return Err(ConfigError::DuplicateOption {
                step: index,
                key: step.key.clone(),
                option: option.id.clone(),
            });
        }
    }
    Ok(())
}

fn validate_scale(index: usize, step: &StepConfig, scale: &UnitScale) -> Result<(), ConfigError> {
    let ValueRange { min, max } = scale.range;
    if !scale.range.is_valid() {
        return Err(ConfigError::InvertedRange {
            step: index,
            key: step.key.clone(),
            min,
            max,
        });
    }
    if !scale.range.contains(scale.default_value) {
        return Err(ConfigError::DefaultOutOfRange {
            step: index,
            key: step.key.clone(),
            value: scale.default_value,
            min,
            max,
        });
    }
    Ok(())
}
