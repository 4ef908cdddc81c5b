//! Onboarding notifier implementations

mod disabled;
mod smtp;

pub use disabled::DisabledNotifier;
pub use smtp::{SmtpConfig, SmtpOnboardingNotifier};
