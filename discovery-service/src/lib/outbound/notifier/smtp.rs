use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::Tls;
use lettre::transport::smtp::client::TlsParameters;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::config::SmtpConfig;
use crate::contact::errors::NotifierError;
use crate::contact::models::ContactMessage;
use crate::contact::ports::ContactNotifier;

/// SMTP-backed contact notifier.
///
/// Forwards each stored contact message to the configured support inbox.
pub struct SmtpContactNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    support: Mailbox,
}

impl SmtpContactNotifier {
    /// Build the transport from configuration.
    ///
    /// Port 465 uses implicit TLS (SMTPS); other ports use STARTTLS.
    ///
    /// # Errors
    /// * `InvalidConfig` - unusable host, TLS setup, or addresses
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifierError> {
        let mut builder = if config.use_tls {
            let tls_params = TlsParameters::new(config.host.clone())
                .map_err(|e| NotifierError::InvalidConfig(format!("TLS setup failed: {}", e)))?;

            if config.port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                    .map_err(|e| NotifierError::InvalidConfig(format!("SMTP relay: {}", e)))?
                    .port(config.port)
                    .tls(Tls::Wrapper(tls_params))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| NotifierError::InvalidConfig(format!("SMTP relay: {}", e)))?
                    .port(config.port)
                    .tls(Tls::Required(tls_params))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
        };

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = config
            .from_address
            .parse()
            .map_err(|e| NotifierError::InvalidConfig(format!("Invalid from address: {}", e)))?;
        let support = config
            .support_address
            .parse()
            .map_err(|e| NotifierError::InvalidConfig(format!("Invalid support address: {}", e)))?;

        Ok(Self {
            transport: builder.build(),
            from,
            support,
        })
    }
}

#[async_trait]
impl ContactNotifier for SmtpContactNotifier {
    async fn notify(&self, message: &ContactMessage) -> Result<(), NotifierError> {
        let subject = message
            .subject
            .clone()
            .unwrap_or_else(|| format!("New contact message ({})", message.id));

        let body = format!(
            "From: {} <{}>\n\n{}\n\nMessage id: {}",
            message.name,
            message.email.as_str(),
            message.message,
            message.id
        );

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.support.clone())
            .subject(subject);

        // replies should go to the submitter when their address parses
        if let Ok(reply_to) = message.email.as_str().parse::<Mailbox>() {
            builder = builder.reply_to(reply_to);
        }

        let email = builder
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| NotifierError::SendFailed(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifierError::SendFailed(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: u16, use_tls: bool) -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port,
            username: None,
            password: None,
            use_tls,
            from_address: "no-reply@example.com".to_string(),
            support_address: "support@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_notifier_creation_without_tls() {
        assert!(SmtpContactNotifier::new(&config(25, false)).is_ok());
    }

    #[tokio::test]
    async fn test_notifier_creation_with_credentials() {
        let mut config = config(587, false);
        config.username = Some("user".to_string());
        config.password = Some("pass".to_string());
        assert!(SmtpContactNotifier::new(&config).is_ok());
    }

    #[test]
    fn test_invalid_from_address_is_refused() {
        let mut config = config(25, false);
        config.from_address = "not an address".to_string();
        assert!(matches!(
            SmtpContactNotifier::new(&config),
            Err(NotifierError::InvalidConfig(_))
        ));
    }
}
