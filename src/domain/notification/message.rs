//! Onboarding message and delivery outcome

use serde::Serialize;

use crate::domain::role::RoleName;

/// Credentials delivered to a newly created account
#[derive(Clone)]
pub struct OnboardingMessage {
    pub email: String,
    pub full_name: String,
    pub username: String,
    pub temporary_password: String,
    pub role_name: RoleName,
}

impl OnboardingMessage {
    pub fn subject(&self) -> &'static str {
        "Welcome to EyeCare - Your Account Credentials"
    }

    /// Plain-text body carrying the temporary credentials
    pub fn text_body(&self) -> String {
        format!(
            "Hello {},\n\n\
             Your account has been created with the role {}. \
             Please use the credentials below to log in.\n\n\
             Username: {}\n\
             Password: {}\n\n\
             Important: please change your password after your first login.\n\n\
             This is an automated message from EyeCare Management System.\n",
            self.full_name, self.role_name, self.username, self.temporary_password
        )
    }
}

impl std::fmt::Debug for OnboardingMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingMessage")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("username", &self.username)
            .field("temporary_password", &"[redacted]")
            .field("role_name", &self.role_name)
            .finish()
    }
}

/// Result of a single delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    Delivered { message_id: Option<String> },
    Failed { reason: String },
}

impl NotificationOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> OnboardingMessage {
        OnboardingMessage {
            email: "jroe@example.com".to_string(),
            full_name: "Jane Roe".to_string(),
            username: "jroe".to_string(),
            temporary_password: "Ab3$xYz9".to_string(),
            role_name: RoleName::Receptionist,
        }
    }

    #[test]
    fn test_text_body_contains_credentials() {
        let body = message().text_body();

        assert!(body.contains("Hello Jane Roe"));
        assert!(body.contains("role RECEPTIONIST"));
        assert!(body.contains("Username: jroe"));
        assert!(body.contains("Password: Ab3$xYz9"));
    }

    #[test]
    fn test_debug_redacts_temporary_password() {
        let debug = format!("{:?}", message());

        assert!(!debug.contains("Ab3$xYz9"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn test_outcome_delivery_flag() {
        assert!(NotificationOutcome::Delivered { message_id: None }.is_delivered());
        assert!(!NotificationOutcome::failed("connection refused").is_delivered());
    }
}
