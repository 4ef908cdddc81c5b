//! Onboarding notification domain

mod message;
mod notifier;

pub use message::{NotificationOutcome, OnboardingMessage};
pub use notifier::OnboardingNotifier;

#[cfg(test)]
pub use notifier::MockOnboardingNotifier;
