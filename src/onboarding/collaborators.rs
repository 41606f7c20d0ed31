//! Seams to the host: navigation, haptics, and profile storage.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::SinkError;

use super::model::OnboardingProfile;

/// Routing hook called once the last step is passed.
pub trait Navigator: Send + Sync {
    fn wizard_complete(&self);
}

/// Fire-and-forget feedback pulse on committed values and selections.
pub trait HapticSink: Send + Sync {
    fn tick(&self);
}

/// For hosts without haptics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHaptics;

impl HapticSink for NoopHaptics {
    fn tick(&self) {}
}

/// Receives the finished profile.
#[async_trait]
pub trait ProfileSink: Send + Sync {
    async fn submit(&self, profile: OnboardingProfile) -> Result<(), SinkError>;
}

/// Explicitly owned holder for the current profile.
///
/// Screens that need the profile get a clone of the store instead of
/// reaching for shared global state.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profile: Arc<RwLock<Option<OnboardingProfile>>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<OnboardingProfile> {
        self.profile.read().await.clone()
    }

    pub async fn is_onboarded(&self) -> bool {
        self.profile.read().await.is_some()
    }

    pub async fn clear(&self) {
        *self.profile.write().await = None;
    }

    /// Current profile as JSON, for handing across an FFI or storage edge.
    pub async fn to_json(&self) -> Result<Option<String>, SinkError> {
        let profile = self.profile.read().await;
        match profile.as_ref() {
            Some(p) => Ok(Some(serde_json::to_string(p)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ProfileSink for ProfileStore {
    async fn submit(&self, profile: OnboardingProfile) -> Result<(), SinkError> {
        info!(session_id = %profile.session_id, "Onboarding profile stored");
        *self.profile.write().await = Some(profile);
        Ok(())
    }
}
