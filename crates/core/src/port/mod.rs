// Port Layer - Interfaces for external collaborators

pub mod credentials;
pub mod directory_gateway;
pub mod notification_dispatcher;
pub mod time_provider;

// Re-exports
pub use credentials::{CredentialsProvider, MailCredentials, StaticCredentialsProvider};
pub use directory_gateway::{DirectoryGateway, RawEntry};
pub use notification_dispatcher::NotificationDispatcher;
pub use time_provider::TimeProvider;
