//! The built-in onboarding question bank.

use crate::error::ConfigError;
use crate::units::Conversion;

use super::steps::{
    ChoiceOption, LabelFormat, PickerConfig, StepConfig, StepKind, StepTable, UnitScale,
};

/// Profile keys of the built-in steps.
pub mod keys {
    pub const REGISTRATION: &str = "tracking_goals";
    pub const DIABETES_TYPE: &str = "diabetes_type";
    pub const MEDICAL_CONDITIONS: &str = "medical_conditions";
    pub const ACTIVITY_LEVEL: &str = "activity_level";
    pub const AGE: &str = "age";
    pub const HEIGHT: &str = "height";
    pub const WEIGHT: &str = "weight";
    pub const TARGET_WEIGHT: &str = "target_weight";
}

/// Skip option on the medical-conditions step.
pub const NO_CONDITIONS: &str = "none";

fn options(pairs: &[(&str, &str)]) -> Vec<ChoiceOption> {
    pairs
        .iter()
        .map(|(id, label)| ChoiceOption::new(id, label))
        .collect()
}

fn weight_picker(default_kg: i32, default_lb: i32) -> PickerConfig {
    PickerConfig::toggled(
        UnitScale::new("Kg", 30, 300, default_kg),
        UnitScale::new("Lbs", 66, 661, default_lb),
        Conversion::kg_to_pounds(),
    )
}

/// Steps of the built-in bank, unvalidated.
pub fn default_steps() -> Vec<StepConfig> {
    vec![
        StepConfig::new(
            keys::REGISTRATION,
            "What would you like to keep track of?",
            StepKind::MultiChoice {
                options: options(&[
                    ("glucose", "Blood glucose"),
                    ("weight", "Weight"),
                    ("medication", "Medication"),
                    ("activity", "Physical activity"),
                    ("nutrition", "Nutrition"),
                ]),
                skip_option_id: None,
            },
        )
        .with_subtitle("Pick as many as you like")
        .explicit_next(),
        StepConfig::new(
            keys::DIABETES_TYPE,
            "Which type of diabetes do you have?",
            StepKind::SingleChoice {
                options: vec![
                    ChoiceOption::new("type1", "Type 1"),
                    ChoiceOption::new("type2", "Type 2"),
                    ChoiceOption::new("prediabetes", "Prediabetes"),
                    ChoiceOption::new("gestational", "Gestational"),
                    ChoiceOption::new("unsure", "I'm not sure")
                        .with_sub_label("We'll help you find out"),
                ],
            },
        )
        .with_ordinal(2),
        StepConfig::new(
            keys::MEDICAL_CONDITIONS,
            "Do you have any of these conditions?",
            StepKind::MultiChoice {
                options: options(&[
                    ("hbp", "High blood pressure"),
                    ("cholesterol", "High cholesterol"),
                    ("heart", "Heart disease"),
                    ("kidney", "Kidney disease"),
                    ("neuropathy", "Neuropathy"),
                    (NO_CONDITIONS, "None of these"),
                ]),
                skip_option_id: Some(NO_CONDITIONS.to_string()),
            },
        )
        .explicit_next()
        .with_ordinal(3),
        StepConfig::new(
            keys::ACTIVITY_LEVEL,
            "How active are you?",
            StepKind::SingleChoice {
                options: vec![
                    ChoiceOption::new("sedentary", "Sedentary")
                        .with_sub_label("Little or no exercise"),
                    ChoiceOption::new("light", "Lightly active")
                        .with_sub_label("Exercise 1-3 days a week"),
                    ChoiceOption::new("moderate", "Moderately active")
                        .with_sub_label("Exercise 3-5 days a week"),
                    ChoiceOption::new("very_active", "Very active")
                        .with_sub_label("Hard exercise 6-7 days a week"),
                ],
            },
        )
        .with_ordinal(4),
        StepConfig::new(
            keys::AGE,
            "How old are you?",
            StepKind::MagnitudePicker(PickerConfig::single(UnitScale::new("Years", 18, 100, 35))),
        )
        .explicit_next()
        .with_ordinal(5),
        StepConfig::new(
            keys::HEIGHT,
            "How tall are you?",
            StepKind::MagnitudePicker(PickerConfig::toggled(
                UnitScale::new("Cm", 120, 220, 165),
                UnitScale::new("Feet", 48, 87, 65).with_format(LabelFormat::FeetInches),
                Conversion::cm_to_inches(),
            )),
        )
        .explicit_next()
        .with_ordinal(6),
        StepConfig::new(
            keys::WEIGHT,
            "What is your current weight?",
            StepKind::MagnitudePicker(weight_picker(90, 198)),
        )
        .explicit_next()
        .with_ordinal(7),
        StepConfig::new(
            keys::TARGET_WEIGHT,
            "What is your target weight?",
            StepKind::MagnitudePicker(weight_picker(80, 176)),
        )
        .explicit_next()
        .with_ordinal(8),
    ]
}

impl StepTable {
    /// The built-in question bank.
    pub fn default_bank() -> Result<Self, ConfigError> {
        Self::new(default_steps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::steps::Unit;

    #[test]
    fn default_bank_validates() {
        let table = StepTable::default_bank().unwrap();
        assert_eq!(table.len(), 8);
        assert!(table.get(0).unwrap().ordinal.is_none());
        assert_eq!(table.get(table.last_index()).unwrap().ordinal, Some(8));
    }

    #[test]
    fn registration_step_shape() {
        let table = StepTable::default_bank().unwrap();
        let first = table.get(0).unwrap();
        assert!(matches!(first.kind, StepKind::MultiChoice { .. }));
        assert!(first.skip_option_id().is_none());
        assert!(first.requires_explicit_next);
        assert!(first.has_option("glucose"));
    }

    #[test]
    fn weight_defaults_agree_across_units() {
        let table = StepTable::default_bank().unwrap();
        for key in [keys::WEIGHT, keys::TARGET_WEIGHT, keys::HEIGHT] {
            let picker = table
                .get(table.position(key).unwrap())
                .unwrap()
                .picker()
                .unwrap();
            let primary = picker.primary.default_value;
            let secondary = picker.scale(Unit::Secondary).unwrap().default_value;
            assert_eq!(picker.convert(primary, Unit::Primary, Unit::Secondary), secondary);
        }
    }
}
