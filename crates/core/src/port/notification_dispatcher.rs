// Notification Dispatcher Port (Interface)
// Abstraction over the external mail transport (SMTP)

use async_trait::async_trait;

use crate::error::Result;

/// Notification dispatcher trait
///
/// The adapter owns transport security and authentication; the core supplies
/// a fully rendered subject and body. Delivery failure surfaces as
/// `AppError::Mail`.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Send a single formatted email.
    ///
    /// # Errors
    /// - `AppError::Mail` on address, transport, or delivery failure
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// A message captured by the mock dispatcher
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SentMessage {
        pub recipient: String,
        pub subject: String,
        pub body: String,
    }

    /// Mock Notification Dispatcher for testing
    pub struct MockNotificationDispatcher {
        fail_with: Option<String>,
        sent: Mutex<Vec<SentMessage>>,
    }

    impl MockNotificationDispatcher {
        pub fn new_success() -> Self {
            Self {
                fail_with: None,
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self {
                fail_with: Some(message.into()),
                sent: Mutex::new(Vec::new()),
            }
        }

        /// Messages delivered so far, in send order
        pub fn sent(&self) -> Vec<SentMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationDispatcher for MockNotificationDispatcher {
        async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
            if let Some(msg) = &self.fail_with {
                return Err(crate::error::AppError::Mail(msg.clone()));
            }
            self.sent.lock().unwrap().push(SentMessage {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
            Ok(())
        }
    }
}
