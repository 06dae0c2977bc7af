// Application Layer - Use Cases

pub mod expiry;
pub mod interpret;
pub mod notify;

// Re-exports
pub use expiry::{DateFailure, DateMatches, ExpiryReport, ExpiryService, KEY_DATES};
pub use notify::{render_expiry_notice, send_expiry_notice, EXPIRY_SUBJECT};
