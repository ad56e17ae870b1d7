// tests/auth_refresh.rs

mod common;

use common::{signed_in_state, ScriptedTransport};
use http::Method;
use promodash_common::models::Dealer;
use promodash_common_ui::commands::auth::AuthCommands;
use promodash_common_ui::commands::resource::CrudList;
use promodash_common_ui::http::RequestBody;
use promodash_common_ui::{AppState, AuthEvent, CommandError, ToastLevel};

const DEALERS: &str = r#"{"count": 1, "results": [{"id": 7, "name": "Acme Motors", "country": 1}]}"#;

#[tokio::test]
async fn login_stores_tokens_for_later_requests() {
    let transport = ScriptedTransport::new();
    transport.on(Method::POST, "auth/token/", 200, r#"{"access": "a-1", "refresh": "r-1"}"#);
    transport.on(Method::GET, "dealers/", 200, DEALERS);
    let state = AppState::new(transport.clone(), 10);

    let session = AuthCommands::login(&state.client, "ops@example.com", "secret", &state.notifications)
        .await
        .unwrap();
    assert_eq!(session.data.email.as_deref(), Some("ops@example.com"));

    let mut list = CrudList::<Dealer>::new(10, state.notifications.clone());
    list.load(&state.client).await.unwrap();

    let requests = transport.requests();
    match &requests[0].body {
        RequestBody::Json(body) => assert_eq!(body["email"], "ops@example.com"),
        other => panic!("unexpected body {other:?}"),
    }
    assert_eq!(requests[1].bearer.as_deref(), Some("a-1"));
}

#[tokio::test]
async fn bad_credentials_are_reported() {
    let transport = ScriptedTransport::new();
    transport.on(
        Method::POST,
        "auth/token/",
        401,
        r#"{"detail": "No active account found with the given credentials"}"#,
    );
    let state = AppState::new(transport.clone(), 10);

    match AuthCommands::login(&state.client, "ops@example.com", "wrong", &state.notifications).await {
        Err(CommandError::InvalidInput(msg)) => assert!(msg.contains("No active account")),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("login should fail"),
    }
    assert!(!state.client.session().await.is_authenticated());
    let toasts = state.notifications.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Error);
    assert!(toasts[0].message.starts_with("Login failed"));
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_retried_once() {
    let transport = ScriptedTransport::new();
    transport.on(Method::GET, "dealers/", 401, r#"{"detail": "Token expired"}"#);
    transport.on(Method::GET, "dealers/", 200, DEALERS);
    transport.on(Method::POST, "auth/token/refresh/", 200, r#"{"access": "access-2"}"#);
    let state = signed_in_state(transport.clone()).await;

    let mut list = CrudList::<Dealer>::new(10, state.notifications.clone());
    list.load(&state.client).await.unwrap();

    assert_eq!(list.items()[0].name, "Acme Motors");
    assert_eq!(transport.count(Method::GET, "dealers/"), 2);
    assert_eq!(transport.count(Method::POST, "auth/token/refresh/"), 1);
    assert_eq!(transport.requests()[2].bearer.as_deref(), Some("access-2"));
    assert!(state.drain_auth_events().is_empty());
}

#[tokio::test]
async fn failed_refresh_asks_for_login() {
    let transport = ScriptedTransport::new();
    transport.on(Method::GET, "dealers/", 401, "");
    transport.on(Method::POST, "auth/token/refresh/", 401, r#"{"detail": "Token is blacklisted"}"#);
    let state = signed_in_state(transport.clone()).await;

    let mut list = CrudList::<Dealer>::new(10, state.notifications.clone());
    assert!(matches!(
        list.load(&state.client).await,
        Err(CommandError::SessionExpired)
    ));
    assert_eq!(state.drain_auth_events(), vec![AuthEvent::LoginRequired]);
    assert_eq!(transport.count(Method::GET, "dealers/"), 1);
    assert!(!state.client.session().await.is_authenticated());
    let toasts = state.notifications.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Error);
}

#[tokio::test]
async fn forbidden_signals_permission_change() {
    let transport = ScriptedTransport::new();
    transport.on(Method::GET, "dealers/", 200, DEALERS);
    transport.on(
        Method::DELETE,
        "dealers/7/",
        403,
        r#"{"detail": "You do not have permission to perform this action."}"#,
    );
    let state = signed_in_state(transport.clone()).await;

    let mut list = CrudList::<Dealer>::new(10, state.notifications.clone());
    list.load(&state.client).await.unwrap();
    list.request_delete(7).unwrap();

    assert!(matches!(
        list.confirm_delete(&state.client).await,
        Err(CommandError::PermissionDenied(_))
    ));
    assert_eq!(
        state.drain_auth_events(),
        vec![AuthEvent::PermissionChanged(
            "You do not have permission to perform this action.".to_string()
        )]
    );
    // still pending so the user can retry once access is restored
    assert_eq!(list.pending_delete(), Some(7));
    // a 403 is not retried
    assert_eq!(transport.count(Method::DELETE, "dealers/7/"), 1);
}
