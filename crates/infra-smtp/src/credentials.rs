// Environment-backed Credentials Provider

use memberwatch_core::error::{AppError, Result};
use memberwatch_core::port::{CredentialsProvider, MailCredentials};

const USERNAME_VAR: &str = "MEMBERWATCH_SMTP_USERNAME";
const PASSWORD_VAR: &str = "MEMBERWATCH_SMTP_PASSWORD";

/// Resolves mail credentials from the process environment.
///
/// The composition root calls `resolve` once, before constructing the
/// dispatcher; there is no hidden prompt-on-first-send state.
pub struct EnvCredentialsProvider;

impl CredentialsProvider for EnvCredentialsProvider {
    fn resolve(&self) -> Result<MailCredentials> {
        let username = std::env::var(USERNAME_VAR)
            .map_err(|_| AppError::Config(format!("{} not set", USERNAME_VAR)))?;
        let password = std::env::var(PASSWORD_VAR)
            .map_err(|_| AppError::Config(format!("{} not set", PASSWORD_VAR)))?;

        Ok(MailCredentials { username, password })
    }
}
