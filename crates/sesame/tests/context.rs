//! Integration tests for the session context.
//!
//! The happy paths run against the in-memory backend from `sesame-local`;
//! failure injection uses the stub backend from `common`. Profile fetches
//! are spawned fire-and-forget, so assertions wait on the state channel
//! and tolerate interleaving.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use common::{RecordingAlerts, RecordingNavigator, StubBackend, session_for};
use sesame_core::KeyStore;
use sesame::{ContextConfig, SessionContext};
use sesame_core::traits::Backend;
use sesame_core::{AuthEvent, Credentials, Profile};
use sesame_local::{LocalBackend, MemoryKeyStore};

const WAIT: Duration = Duration::from_secs(2);

struct Harness<B: Backend + 'static> {
    context: SessionContext<B>,
    backend: B,
    storage: MemoryKeyStore,
    navigator: RecordingNavigator,
    alerts: RecordingAlerts,
}

fn harness<B: Backend + Clone + 'static>(backend: B) -> Harness<B> {
    let storage = MemoryKeyStore::new();
    let navigator = RecordingNavigator::new();
    let alerts = RecordingAlerts::new();
    let context = SessionContext::new(
        backend.clone(),
        Arc::new(storage.clone()),
        Arc::new(navigator.clone()),
        Arc::new(alerts.clone()),
        ContextConfig::default(),
    );
    Harness {
        context,
        backend,
        storage,
        navigator,
        alerts,
    }
}

/// A local backend with one signed-in account and a profile row.
async fn signed_in_backend() -> LocalBackend {
    let backend = LocalBackend::new();
    let user = backend.add_account("alice@example.com", "secret");
    backend.put_profile(
        &user,
        Profile::new("alice", "https://alice.example", "avatars/alice.png"),
    );
    backend
        .sign_in(Credentials::new("alice@example.com", "secret"))
        .await
        .unwrap();
    backend
}

#[tokio::test]
async fn initialize_with_existing_session_populates_profile() {
    let h = harness(signed_in_backend().await);
    h.context.initialize().await;

    let mut state = h.context.watch();
    let snapshot = timeout(WAIT, state.wait_for(|s| !s.loading && s.username == "alice"))
        .await
        .expect("profile never populated")
        .expect("state channel closed");

    assert!(snapshot.session.is_some());
    assert_eq!(snapshot.website, "https://alice.example");
    assert_eq!(snapshot.avatar_url, "avatars/alice.png");
    drop(snapshot);

    assert!(h.alerts.messages().is_empty());
}

#[tokio::test]
async fn initialize_without_session_stays_signed_out() {
    let h = harness(LocalBackend::new());
    h.context.initialize().await;

    let snapshot = h.context.snapshot();
    assert!(snapshot.session.is_none());
    assert!(!snapshot.loading);
    assert_eq!(snapshot.username, "");
    assert_eq!(snapshot.website, "");
    assert_eq!(snapshot.avatar_url, "");
    assert!(h.alerts.messages().is_empty());
}

#[tokio::test]
async fn signed_out_event_clears_profile_fields() {
    let h = harness(signed_in_backend().await);
    h.context.initialize().await;
    let _events = h.context.subscribe();

    let mut state = h.context.watch();
    timeout(WAIT, state.wait_for(|s| s.username == "alice"))
        .await
        .expect("profile never populated")
        .expect("state channel closed");

    h.backend.sign_out().await.unwrap();

    let snapshot = timeout(
        WAIT,
        state.wait_for(|s| s.session.is_none() && s.username.is_empty()),
    )
    .await
    .expect("sign-out event never observed")
    .expect("state channel closed");

    assert_eq!(snapshot.website, "");
    assert_eq!(snapshot.avatar_url, "");
}

#[tokio::test]
async fn signed_in_event_triggers_profile_fetch() {
    let backend = LocalBackend::new();
    let user = backend.add_account("alice@example.com", "secret");
    backend.put_profile(&user, Profile::new("a", "b", "c"));

    let h = harness(backend);
    h.context.initialize().await;
    let _events = h.context.subscribe();

    h.backend
        .sign_in(Credentials::new("alice@example.com", "secret"))
        .await
        .unwrap();

    let mut state = h.context.watch();
    let snapshot = timeout(WAIT, state.wait_for(|s| s.username == "a"))
        .await
        .expect("profile never populated")
        .expect("state channel closed");

    assert_eq!(snapshot.website, "b");
    assert_eq!(snapshot.avatar_url, "c");
    assert_eq!(
        snapshot.session.as_ref().map(|s| s.user().clone()),
        Some(user)
    );
}

#[tokio::test]
async fn missing_profile_row_leaves_fields_unchanged_without_alert() {
    let backend = LocalBackend::new();
    backend.add_account("alice@example.com", "secret");
    backend
        .sign_in(Credentials::new("alice@example.com", "secret"))
        .await
        .unwrap();

    let h = harness(backend);
    h.context.initialize().await;

    // Give the spawned fetch time to resolve its not-found
    sleep(Duration::from_millis(100)).await;

    let snapshot = h.context.snapshot();
    assert!(snapshot.session.is_some());
    assert_eq!(snapshot.username, "");
    assert!(h.alerts.messages().is_empty());
}

#[tokio::test]
async fn profile_fetch_failure_is_alerted_and_fields_kept() {
    let backend = StubBackend::new();
    let session = common::test_session();
    backend.set_session(Some(session));
    backend.fail_profile_fetch("connection reset by peer");

    let h = harness(backend);
    h.context.initialize().await;

    let mut state = h.context.watch();
    timeout(WAIT, state.wait_for(|s| !s.loading))
        .await
        .expect("loading never dropped")
        .expect("state channel closed");
    sleep(Duration::from_millis(100)).await;

    let messages = h.alerts.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("connection reset by peer"));
    assert_eq!(h.context.snapshot().username, "");
}

#[tokio::test]
async fn refresh_profile_picks_up_changed_row() {
    let backend = signed_in_backend().await;
    let h = harness(backend);
    h.context.initialize().await;

    let mut state = h.context.watch();
    timeout(WAIT, state.wait_for(|s| s.username == "alice"))
        .await
        .expect("profile never populated")
        .expect("state channel closed");

    let user = h.context.snapshot().session.unwrap().user().clone();
    h.backend
        .put_profile(&user, Profile::new("alice2", "w2", "a2"));
    h.context.refresh_profile().await;

    let snapshot = h.context.snapshot();
    assert_eq!(snapshot.username, "alice2");
    assert_eq!(snapshot.website, "w2");
    assert_eq!(snapshot.avatar_url, "a2");
}

#[tokio::test]
async fn sign_out_clears_state_sweeps_keys_and_navigates() {
    let h = harness(signed_in_backend().await);
    h.storage.set("sb-project-session", "{}").await.unwrap();
    h.storage.set("sb-refresh", "tok").await.unwrap();
    h.storage.set("chat-session-cache", "x").await.unwrap();
    h.storage.set("theme", "dark").await.unwrap();

    h.context.initialize().await;

    // Let the initial profile fetch settle before signing out
    let mut state = h.context.watch();
    timeout(WAIT, state.wait_for(|s| s.username == "alice"))
        .await
        .expect("profile never populated")
        .expect("state channel closed");

    h.context.sign_out().await;

    let snapshot = h.context.snapshot();
    assert!(snapshot.session.is_none());
    assert!(!snapshot.loading);
    assert_eq!(snapshot.username, "");
    assert_eq!(snapshot.website, "");
    assert_eq!(snapshot.avatar_url, "");

    // Only the auth-ish keys are swept
    assert_eq!(h.storage.keys().await.unwrap(), vec!["theme".to_string()]);

    assert_eq!(
        h.navigator.resets(),
        vec![("/sign-in".to_string(), Vec::new())]
    );
    assert!(h.alerts.messages().is_empty());
}

#[tokio::test]
async fn sign_out_backend_failure_alerts_and_keeps_local_session() {
    let backend = StubBackend::new();
    backend.set_session(Some(common::test_session()));
    backend.fail_sign_out("logout rejected");

    let h = harness(backend);
    h.context.initialize().await;

    let mut state = h.context.watch();
    timeout(WAIT, state.wait_for(|s| s.session.is_some()))
        .await
        .expect("session never stored")
        .expect("state channel closed");

    h.context.sign_out().await;

    let messages = h.alerts.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("logout rejected"));

    // Current behavior: the local session mirror survives a failed
    // backend sign-out, and no navigation happens.
    let snapshot = h.context.snapshot();
    assert!(snapshot.session.is_some());
    assert!(!snapshot.loading);
    assert!(h.navigator.resets().is_empty());
}

#[tokio::test]
async fn dropped_guard_stops_event_handling() {
    let backend = StubBackend::new();
    let h = harness(backend);
    h.context.initialize().await;

    let events = h.context.subscribe();
    events.unsubscribe();

    h.backend
        .push_event(AuthEvent::SignedIn(common::test_session()));
    sleep(Duration::from_millis(100)).await;

    assert!(h.context.snapshot().session.is_none());
}

#[tokio::test]
async fn events_interleaving_is_last_write_wins() {
    let backend = StubBackend::new();
    let user = sesame_core::UserId::from_uuid(uuid::Uuid::new_v4());
    backend.put_profile(&user, Profile::new("a", "b", "c"));

    let h = harness(backend);
    h.context.initialize().await;
    let _events = h.context.subscribe();

    // A sign-in immediately followed by a sign-out. The superseded fetch
    // is not cancelled, so the profile fields may end up either empty or
    // holding the fetched row; the session itself must settle on None.
    h.backend.push_event(AuthEvent::SignedIn(session_for(&user)));
    h.backend.push_event(AuthEvent::SignedOut);

    let mut state = h.context.watch();
    timeout(WAIT, state.wait_for(|s| s.session.is_none()))
        .await
        .expect("terminal state never reached")
        .expect("state channel closed");
}
