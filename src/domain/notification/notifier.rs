//! Onboarding notifier trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::message::{NotificationOutcome, OnboardingMessage};

/// Delivers generated credentials to a new user
///
/// Implementations make at most one attempt and report every failure through
/// [`NotificationOutcome::Failed`] instead of returning an error.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OnboardingNotifier: Send + Sync {
    async fn send(&self, message: &OnboardingMessage) -> NotificationOutcome;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
