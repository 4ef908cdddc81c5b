//! SMTP onboarding notifier using lettre

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::notification::{NotificationOutcome, OnboardingMessage, OnboardingNotifier};
use crate::domain::DomainError;

/// SMTP connection and sender settings
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_email: String,
    pub from_name: String,
    /// Optional for local relays such as Mailpit
    pub username: Option<String>,
    pub password: Option<String>,
    /// Implicit TLS; disable only for local development servers
    pub use_tls: bool,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("username", &self.username)
            .field("use_tls", &self.use_tls)
            .finish_non_exhaustive()
    }
}

/// Sends onboarding credentials as a plain-text email
pub struct SmtpOnboardingNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    host: String,
}

/// A built email and the value of its `Message-ID` header
struct OutgoingEmail {
    email: Message,
    message_id: String,
}

impl SmtpOnboardingNotifier {
    pub fn new(config: SmtpConfig) -> Result<Self, DomainError> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| DomainError::configuration(format!("Invalid from address: {}", e)))?;

        let credentials = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                Some(Credentials::new(username.clone(), password.clone()))
            }
            _ => None,
        };

        let transport = if config.use_tls {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| {
                    DomainError::configuration(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(config.port);
            if let Some(credentials) = credentials {
                builder = builder.credentials(credentials);
            }
            builder.build()
        } else {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                    .port(config.port);
            if let Some(credentials) = credentials {
                builder = builder.credentials(credentials);
            }
            builder.build()
        };

        Ok(Self {
            transport,
            from,
            host: config.host,
        })
    }

    fn build_message(&self, message: &OnboardingMessage) -> Result<OutgoingEmail, String> {
        let to: Mailbox = format!("{} <{}>", message.full_name, message.email)
            .parse()
            .or_else(|_| message.email.parse())
            .map_err(|e| format!("Invalid recipient address: {}", e))?;

        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain());

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .message_id(Some(message_id.clone()))
            .subject(message.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(message.text_body())
            .map_err(|e| format!("Failed to build email message: {}", e))?;

        Ok(OutgoingEmail { email, message_id })
    }
}

#[async_trait]
impl OnboardingNotifier for SmtpOnboardingNotifier {
    async fn send(&self, message: &OnboardingMessage) -> NotificationOutcome {
        debug!(to = %message.email, host = %self.host, "Sending onboarding email via SMTP");

        let OutgoingEmail { email, message_id } = match self.build_message(message) {
            Ok(outgoing) => outgoing,
            Err(reason) => return NotificationOutcome::failed(reason),
        };

        match self.transport.send(email).await {
            Ok(response) => {
                debug!(code = %response.code(), message_id = %message_id, "SMTP server accepted message");
                NotificationOutcome::Delivered {
                    message_id: Some(message_id),
                }
            }
            Err(e) => NotificationOutcome::failed(format!("SMTP send failed: {}", e)),
        }
    }

    fn name(&self) -> &'static str {
        "SMTP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::role::RoleName;

    fn local_config() -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port: 1025,
            from_email: "noreply@eyecare.local".to_string(),
            from_name: "EyeCare System".to_string(),
            username: None,
            password: Some("secret".to_string()),
            use_tls: false,
        }
    }

    fn message(email: &str) -> OnboardingMessage {
        OnboardingMessage {
            email: email.to_string(),
            full_name: "Jane Roe".to_string(),
            username: "jroe".to_string(),
            temporary_password: "Ab3$xYz9".to_string(),
            role_name: RoleName::Pharmacist,
        }
    }

    #[tokio::test]
    async fn test_build_message_sets_message_id_header() {
        let notifier = SmtpOnboardingNotifier::new(local_config()).unwrap();

        let outgoing = notifier.build_message(&message("jroe@example.com")).unwrap();

        assert!(outgoing.message_id.starts_with('<'));
        assert!(outgoing.message_id.ends_with("@eyecare.local>"));
        assert_eq!(
            outgoing.email.headers().get_raw("Message-ID"),
            Some(outgoing.message_id.as_str())
        );
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_reported_not_raised() {
        let notifier = SmtpOnboardingNotifier::new(local_config()).unwrap();

        let outcome = notifier.send(&message("not an address")).await;
        assert!(matches!(outcome, NotificationOutcome::Failed { ref reason } if reason.starts_with("Invalid recipient address")));
    }

    #[test]
    fn test_invalid_sender_is_configuration_error() {
        let config = SmtpConfig {
            from_email: "broken".to_string(),
            ..local_config()
        };

        assert!(matches!(
            SmtpOnboardingNotifier::new(config),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_config_debug_hides_password() {
        let debug = format!("{:?}", local_config());
        assert!(!debug.contains("secret"));
    }
}
