// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid range: beginning offset {begin} must be strictly less than end offset {end}")]
    InvalidRange { begin: i64, end: i64 },

    #[error("Invalid account identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Identity query matched {0} entries, expected at most one")]
    AmbiguousResult(usize),

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("No expiration set for account: {0}")]
    NoExpirationSet(String),

    #[error("Invalid shadow expiration value: {0}")]
    InvalidShadowValue(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
