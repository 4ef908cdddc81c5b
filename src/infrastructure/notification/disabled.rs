//! Notifier used when email delivery is switched off

use async_trait::async_trait;

use crate::domain::notification::{NotificationOutcome, OnboardingMessage, OnboardingNotifier};

/// Reports every onboarding email as undelivered
#[derive(Debug, Clone, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl OnboardingNotifier for DisabledNotifier {
    async fn send(&self, _message: &OnboardingMessage) -> NotificationOutcome {
        NotificationOutcome::failed("email delivery disabled")
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::role::RoleName;

    #[tokio::test]
    async fn test_always_fails() {
        let message = OnboardingMessage {
            email: "a@example.com".to_string(),
            full_name: "A".to_string(),
            username: "a".to_string(),
            temporary_password: "x".to_string(),
            role_name: RoleName::Admin,
        };

        assert_eq!(
            DisabledNotifier.send(&message).await,
            NotificationOutcome::failed("email delivery disabled")
        );
    }
}
