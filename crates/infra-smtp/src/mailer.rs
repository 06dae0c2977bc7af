// SMTP Notification Dispatcher
// STARTTLS relay with authenticated submission. Credentials are resolved
// exactly once, at construction, through the CredentialsProvider port.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use memberwatch_core::error::{AppError, Result};
use memberwatch_core::port::{CredentialsProvider, NotificationDispatcher};

/// Mail relay settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay host, e.g. `smtp.office365.com`
    pub host: String,
    /// Submission port; 587 for STARTTLS
    pub port: u16,
    /// Envelope sender address
    pub sender: String,
}

/// NotificationDispatcher implementation over lettre's async SMTP transport
pub struct SmtpNotificationDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpNotificationDispatcher {
    /// Build the dispatcher, resolving mail credentials once.
    ///
    /// # Errors
    /// - `AppError::Config` when credentials cannot be resolved
    /// - `AppError::Mail` on a malformed sender address or relay setup failure
    pub fn new(config: SmtpConfig, credentials: &dyn CredentialsProvider) -> Result<Self> {
        let creds = credentials.resolve()?;

        let sender: Mailbox = config
            .sender
            .parse()
            .map_err(|e| AppError::Mail(format!("invalid sender address: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Mail(format!("relay setup failed: {}", e)))?
            .port(config.port)
            .credentials(Credentials::new(creds.username, creds.password))
            .build();

        debug!(host = %config.host, port = config.port, "mail transport configured");

        Ok(Self { transport, sender })
    }
}

#[async_trait]
impl NotificationDispatcher for SmtpNotificationDispatcher {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| AppError::Mail(format!("invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| AppError::Mail(format!("message build failed: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(format!("delivery failed: {}", e)))?;

        info!(recipient = %recipient, "notification delivered");
        Ok(())
    }
}
