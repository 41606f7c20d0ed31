//! Completed onboarding profile handed to the profile sink.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A picker answer, always in the step's primary unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: i32,
    pub unit: String,
}

/// Flattened answers of a finished wizard.
///
/// Picker values are stored in the primary unit no matter which unit the
/// user last looked at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingProfile {
    pub session_id: Uuid,
    /// Selected option ids per choice step key.
    pub choices: BTreeMap<String, Vec<String>>,
    /// Final value per picker step key.
    pub measurements: BTreeMap<String, Measurement>,
    pub completed_at: DateTime<Utc>,
}

impl OnboardingProfile {
    pub fn choice(&self, key: &str) -> &[String] {
        self.choices.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn measurement(&self, key: &str) -> Option<&Measurement> {
        self.measurements.get(key)
    }

    /// Render the profile as a short markdown section.
    pub fn to_summary_section(&self) -> String {
        let mut parts = vec!["# Onboarding Profile".to_string()];

        for (key, ids) in &self.choices {
            if !ids.is_empty() {
                parts.push(format!("- **{}:** {}", key, ids.join(", ")));
            }
        }

        for (key, m) in &self.measurements {
            parts.push(format!("- **{}:** {} {}", key, m.value, m.unit));
        }

        parts.join("\n")
    }
}
