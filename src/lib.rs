//! Onboarding wizard — headless step flow and magnitude picker.

pub mod config;
pub mod error;
pub mod onboarding;
pub mod picker;
pub mod units;
