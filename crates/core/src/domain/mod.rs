// Domain Layer - account expiration model

pub mod account;
pub mod error;
pub mod filter;
pub mod shadow;

pub use account::{AccountRecord, AccountStatus, ExpirationQuery};
pub use account::{ATTR_MAIL, ATTR_SHADOW_EXPIRE, ATTR_UID, STANDARD_ATTRS};
pub use error::DomainError;
pub use filter::FilterExpression;
pub use shadow::{to_shadow, AbsoluteInstant, ShadowTimestamp, POSIX_DAY};
