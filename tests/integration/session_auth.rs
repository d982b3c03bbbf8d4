//! Integration tests for login and session re-validation.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use termboard::api::{ApiClient, ApiError};
use termboard::session::{SessionStore, login_and_store, resolve_session};
use termboard_api::user::{Credentials, NewUser};
use termboard_mock::server::start_server_with_state;
use termboard_mock::state::MockState;

async fn start_with_user() -> (Arc<MockState>, ApiClient) {
    let state = Arc::new(MockState::new());
    state.seed_user("Alice", "alice@example.com", "hunter2").await;
    let (addr, _handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("mock server failed to start");
    (state, ApiClient::new(&format!("http://{addr}")))
}

fn temp_store() -> SessionStore {
    let path = std::env::temp_dir()
        .join("termboard-test")
        .join(format!("session-{}.toml", uuid::Uuid::now_v7()));
    SessionStore::at(path)
}

#[tokio::test]
async fn login_persists_and_resolves() {
    let (_state, api) = start_with_user().await;
    let store = temp_store();

    let session = login_and_store(&api, &store, "alice@example.com", "hunter2")
        .await
        .unwrap();
    assert_eq!(session.name, "Alice");

    // A fresh start reuses the stored session.
    let resolved = resolve_session(&api, &store).await.unwrap();
    assert_eq!(resolved, Some(session));
    store.clear().unwrap();
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let (_state, api) = start_with_user().await;
    let err = api
        .login(&Credentials {
            email: "alice@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn revoked_token_invalidates_stored_session() {
    let (state, api) = start_with_user().await;
    let store = temp_store();

    let session = login_and_store(&api, &store, "alice@example.com", "hunter2")
        .await
        .unwrap();
    state.revoke_tokens(&session.user_id).await;

    // Server says 401, so the session is gone and the file cleaned up.
    let resolved = resolve_session(&api, &store).await.unwrap();
    assert_eq!(resolved, None);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn unreachable_service_keeps_stored_session() {
    let (_state, api) = start_with_user().await;
    let store = temp_store();

    let session = login_and_store(&api, &store, "alice@example.com", "hunter2")
        .await
        .unwrap();

    // Nothing listens here; re-validation fails with a transport error,
    // which must not log the user out.
    let dead_api = ApiClient::new("http://127.0.0.1:9");
    let resolved = resolve_session(&dead_api, &store).await.unwrap();
    assert_eq!(resolved, Some(session));
    store.clear().unwrap();
}

#[tokio::test]
async fn register_creates_a_usable_account() {
    let (_state, api) = start_with_user().await;

    let new_user = NewUser {
        name: "Bob".to_string(),
        email: "bob@example.com".to_string(),
        password: "pw".to_string(),
    };
    let user = api.register(&new_user).await.unwrap();
    assert_eq!(user.name, "Bob");
    assert!(!user.token.is_empty());

    // The same email cannot be registered twice.
    let err = api.register(&new_user).await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 409, .. }));

    // The fresh account can log in.
    let logged_in = api
        .login(&Credentials {
            email: "bob@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);
}

#[tokio::test]
async fn no_stored_session_resolves_to_none() {
    let (_state, api) = start_with_user().await;
    let store = temp_store();
    assert_eq!(resolve_session(&api, &store).await.unwrap(), None);
}
