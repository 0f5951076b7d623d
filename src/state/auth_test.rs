use super::*;
use crate::state::session::SessionState;
use crate::test_helpers::{MockApi, alice, resolver};

use tokio::sync::Notify;

// =============================================================================
// resolve
// =============================================================================

#[tokio::test]
async fn resolve_without_token_is_anonymous_and_offline() {
    let api = Arc::new(MockApi::standard());
    let auth = resolver(api.clone(), None);

    assert!(auth.store().snapshot().resolving);
    let snap = auth.resolve().await;

    assert!(!snap.resolving);
    assert_eq!(snap.state, SessionState::Anonymous);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn resolve_valid_token_authenticates_and_keeps_token() {
    let api = Arc::new(MockApi::standard());
    let auth = resolver(api.clone(), Some("T1"));

    let snap = auth.resolve().await;

    assert!(!snap.resolving);
    assert_eq!(snap.state, SessionState::Authenticated(alice()));
    assert_eq!(auth.store().get_token().as_deref(), Some("T1"));
    assert_eq!(api.calls(), vec!["me:T1".to_owned()]);
}

#[tokio::test]
async fn resolve_rejected_token_clears_it() {
    let api = Arc::new(MockApi::standard());
    let auth = resolver(api.clone(), Some("stale"));

    let snap = auth.resolve().await;

    assert!(!snap.resolving);
    assert_eq!(snap.state, SessionState::Anonymous);
    assert_eq!(auth.store().get_token(), None);
    assert_eq!(api.identity_calls(), 1);
}

#[tokio::test]
async fn resolve_stays_resolving_until_identity_answers() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(MockApi::standard().with_gate(gate.clone()));
    let auth = resolver(api, Some("T1"));

    let task = tokio::spawn({
        let auth = auth.clone();
        async move { auth.resolve().await }
    });
    tokio::task::yield_now().await;
    assert!(auth.store().snapshot().resolving);

    gate.notify_one();
    let snap = task.await.unwrap();
    assert!(!snap.resolving);
    assert!(snap.is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn resolve_timeout_degrades_to_anonymous() {
    let api = Arc::new(MockApi::standard().hanging_identity());
    let store = SessionStore::new(Arc::new(crate::storage::MemoryStorage::with_token("T1")));
    let auth = AuthResolver::new(api, store, Some(Duration::from_secs(10)));

    let snap = auth.resolve().await;

    assert!(!snap.resolving);
    assert_eq!(snap.state, SessionState::Anonymous);
    assert_eq!(auth.store().get_token(), None);
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_success_authenticates_in_order() {
    let api = Arc::new(MockApi::standard());
    let auth = resolver(api.clone(), None);
    auth.resolve().await;

    let user = auth.login("alice", "correct").await.unwrap();

    assert_eq!(user, alice());
    assert_eq!(auth.store().get_token().as_deref(), Some("T1"));
    assert_eq!(auth.store().snapshot().state, SessionState::Authenticated(alice()));
    assert_eq!(api.calls(), vec!["token:alice".to_owned(), "me:T1".to_owned()]);
}

#[tokio::test]
async fn login_bad_credentials_skips_identity_check() {
    let api = Arc::new(MockApi::standard());
    let auth = resolver(api.clone(), None);
    auth.resolve().await;

    let err = auth.login("alice", "wrong").await.unwrap_err();

    assert!(matches!(err, AuthError::Credentials(_)));
    assert_eq!(err.user_message(), LOGIN_FAILED_MESSAGE);
    assert_eq!(api.identity_calls(), 0);
    assert_eq!(auth.store().get_token(), None);
    assert_eq!(auth.store().snapshot().state, SessionState::Anonymous);
}

#[tokio::test]
async fn login_credential_failure_keeps_existing_token() {
    let api = Arc::new(MockApi::standard());
    let auth = resolver(api, Some("T1"));
    auth.resolve().await;

    auth.login("alice", "wrong").await.unwrap_err();

    assert_eq!(auth.store().get_token().as_deref(), Some("T1"));
    assert!(auth.store().snapshot().is_authenticated());
}

#[tokio::test]
async fn login_identity_failure_removes_token() {
    let api = Arc::new(MockApi::new().with_login("alice", "correct", "T1"));
    let auth = resolver(api, None);
    auth.resolve().await;

    let err = auth.login("alice", "correct").await.unwrap_err();

    assert!(matches!(&err, AuthError::SessionInvalid(e) if e.is_unauthorized()));
    assert_eq!(err.user_message(), LOGIN_FAILED_MESSAGE);
    assert_eq!(auth.store().get_token(), None);
    let snap = auth.store().snapshot();
    assert!(!snap.resolving);
    assert_eq!(snap.state, SessionState::Anonymous);
}

#[tokio::test]
async fn login_superseded_by_logout_reports_failure() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(MockApi::standard().with_gate(gate.clone()));
    let auth = resolver(api, None);
    auth.resolve().await;

    let task = tokio::spawn({
        let auth = auth.clone();
        async move { auth.login("alice", "correct").await }
    });
    tokio::task::yield_now().await;
    auth.logout();
    gate.notify_one();

    let err = task.await.unwrap().unwrap_err();
    assert_eq!(err, AuthError::Superseded);
    assert_eq!(err.user_message(), LOGIN_FAILED_MESSAGE);
    assert_eq!(auth.store().get_token(), None);
    assert_eq!(auth.store().snapshot().state, SessionState::Anonymous);
}

#[tokio::test]
async fn second_login_wins_over_first_in_flight() {
    let gate = Arc::new(Notify::new());
    let bob = crate::test_helpers::user(2, "bob", true, None);
    let api = Arc::new(
        MockApi::standard()
            .with_login("bob", "pw", "T2")
            .with_identity("T2", bob.clone())
            .with_gate_for("T1", gate.clone()),
    );
    let auth = resolver(api, None);
    auth.resolve().await;

    let first = tokio::spawn({
        let auth = auth.clone();
        async move { auth.login("alice", "correct").await }
    });
    tokio::task::yield_now().await;
    assert_eq!(auth.login("bob", "pw").await.unwrap(), bob);
    gate.notify_one();

    assert_eq!(first.await.unwrap().unwrap_err(), AuthError::Superseded);
    assert_eq!(auth.store().get_token().as_deref(), Some("T2"));
    assert_eq!(auth.store().snapshot().state, SessionState::Authenticated(bob));
}

// =============================================================================
// register / logout
// =============================================================================

#[tokio::test]
async fn register_does_not_authenticate() {
    let api = Arc::new(MockApi::standard());
    let auth = resolver(api.clone(), None);
    auth.resolve().await;

    auth.register("carol", "c@x.com", "pw").await.unwrap();

    assert_eq!(auth.store().get_token(), None);
    assert!(!auth.store().snapshot().is_authenticated());
    assert_eq!(api.calls(), vec!["register:carol".to_owned()]);
}

#[tokio::test]
async fn register_conflict_maps_to_form_message() {
    let api = Arc::new(MockApi::standard().with_taken_username("alice"));
    let auth = resolver(api, None);

    let err = auth.register("alice", "a@x.com", "pw").await.unwrap_err();

    assert!(matches!(&err, AuthError::Registration(e) if e.is_conflict()));
    assert_eq!(err.user_message(), REGISTRATION_FAILED_MESSAGE);
}

#[tokio::test]
async fn logout_clears_token_and_is_idempotent() {
    let api = Arc::new(MockApi::standard());
    let auth = resolver(api.clone(), Some("T1"));
    auth.resolve().await;

    auth.logout();
    let first = auth.store().snapshot();
    auth.logout();

    assert_eq!(auth.store().get_token(), None);
    assert_eq!(first.state, SessionState::Anonymous);
    assert_eq!(auth.store().snapshot(), first);
    assert_eq!(api.identity_calls(), 1);
}
