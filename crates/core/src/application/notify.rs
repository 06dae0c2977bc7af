// Expiry Notification Rendering

use tracing::info;

use crate::error::Result;
use crate::port::NotificationDispatcher;

/// Subject line for expiry notices
pub const EXPIRY_SUBJECT: &str = "Account Expiration Approaching";

/// Render the notice body for an account expiring in `offset_days` days
pub fn render_expiry_notice(offset_days: i64) -> String {
    format!("Your account is set to expire in {} days.", offset_days)
}

/// Render and dispatch one expiry notice.
///
/// # Errors
/// - `AppError::Mail` on delivery failure, propagated from the dispatcher
pub async fn send_expiry_notice(
    dispatcher: &dyn NotificationDispatcher,
    recipient: &str,
    offset_days: i64,
) -> Result<()> {
    let body = render_expiry_notice(offset_days);
    dispatcher.send(recipient, EXPIRY_SUBJECT, &body).await?;

    info!(recipient = %recipient, offset_days, "expiry notification sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::notification_dispatcher::mocks::MockNotificationDispatcher;

    #[test]
    fn test_body_interpolates_day_count_with_spacing() {
        assert_eq!(
            render_expiry_notice(5),
            "Your account is set to expire in 5 days."
        );
        assert_eq!(
            render_expiry_notice(30),
            "Your account is set to expire in 30 days."
        );
    }

    #[tokio::test]
    async fn test_send_expiry_notice() {
        let dispatcher = MockNotificationDispatcher::new_success();

        send_expiry_notice(&dispatcher, "kami@example.edu", 15)
            .await
            .unwrap();

        let sent = dispatcher.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "kami@example.edu");
        assert_eq!(sent[0].subject, "Account Expiration Approaching");
        assert_eq!(sent[0].body, "Your account is set to expire in 15 days.");
    }

    #[tokio::test]
    async fn test_delivery_failure_propagates() {
        let dispatcher = MockNotificationDispatcher::new_fail("relay rejected");

        let result = send_expiry_notice(&dispatcher, "kami@example.edu", 2).await;
        assert!(matches!(result, Err(AppError::Mail(_))));
    }
}
