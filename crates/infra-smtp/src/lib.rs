// Memberwatch SMTP Infrastructure - NotificationDispatcher adapter

mod credentials;
mod mailer;

pub use credentials::EnvCredentialsProvider;
pub use mailer::{SmtpConfig, SmtpNotificationDispatcher};
