// Notification Flow - rendering and dispatch through the port

use memberwatch_core::application::notify::{
    render_expiry_notice, send_expiry_notice, EXPIRY_SUBJECT,
};
use memberwatch_core::error::AppError;
use memberwatch_core::port::notification_dispatcher::mocks::MockNotificationDispatcher;
use memberwatch_core::port::{CredentialsProvider, StaticCredentialsProvider};

#[tokio::test]
async fn one_notice_per_invocation_with_rendered_body() {
    let dispatcher = MockNotificationDispatcher::new_success();

    send_expiry_notice(&dispatcher, "flay@example.edu", 30)
        .await
        .unwrap();

    let sent = dispatcher.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "flay@example.edu");
    assert_eq!(sent[0].subject, EXPIRY_SUBJECT);
    assert_eq!(sent[0].body, "Your account is set to expire in 30 days.");
}

#[tokio::test]
async fn body_spacing_survives_every_key_date() {
    for days in [30, 15, 10, 5, 2, 1] {
        let body = render_expiry_notice(days);
        assert!(body.contains(&format!("in {} days", days)), "body: {}", body);
    }
}

#[tokio::test]
async fn delivery_failure_is_propagated_not_swallowed() {
    let dispatcher = MockNotificationDispatcher::new_fail("550 relay denied");

    let result = send_expiry_notice(&dispatcher, "flay@example.edu", 1).await;

    match result {
        Err(AppError::Mail(msg)) => assert!(msg.contains("550")),
        other => panic!("expected mail error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn credentials_resolve_once_up_front() {
    let provider = StaticCredentialsProvider::new("notices@example.edu", "hunter2");

    let creds = provider.resolve().unwrap();
    assert_eq!(creds.username, "notices@example.edu");
    assert_eq!(creds.password, "hunter2");
}
