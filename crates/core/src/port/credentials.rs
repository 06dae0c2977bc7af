// Mail Credentials Port
// Replaces the lazy prompt-on-first-send global: the composition root
// resolves credentials exactly once, before any dispatcher is constructed.

use crate::error::Result;

/// Resolved mail credentials
#[derive(Debug, Clone)]
pub struct MailCredentials {
    pub username: String,
    pub password: String,
}

/// Credentials provider interface
pub trait CredentialsProvider: Send + Sync {
    /// Resolve credentials for the mail session.
    ///
    /// # Errors
    /// - `AppError::Config` when credentials cannot be obtained
    fn resolve(&self) -> Result<MailCredentials>;
}

/// Static provider holding pre-resolved credentials (tests, wiring)
pub struct StaticCredentialsProvider(MailCredentials);

impl StaticCredentialsProvider {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self(MailCredentials {
            username: username.into(),
            password: password.into(),
        })
    }
}

impl CredentialsProvider for StaticCredentialsProvider {
    fn resolve(&self) -> Result<MailCredentials> {
        Ok(self.0.clone())
    }
}
