//! Shared test doubles for context tests.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, RwLock};
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures_core::Stream;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use uuid::Uuid;

use sesame_core::error::ApiError;
use sesame_core::traits::{Alerts, Backend, Navigator};
use sesame_core::{
    AccessToken, AuthEvent, Credentials, Error, Profile, Result, Session, UserId,
};

/// Build a session for an arbitrary user.
pub fn test_session() -> Session {
    session_for(&UserId::from_uuid(Uuid::new_v4()))
}

/// Build a session for a specific user.
pub fn session_for(user: &UserId) -> Session {
    Session::new(
        user.clone(),
        Some("alice@example.com".to_string()),
        AccessToken::new("stub-access-token"),
        None,
        None,
    )
}

/// Records every alert message shown.
#[derive(Clone, Default)]
pub struct RecordingAlerts {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Alerts for RecordingAlerts {
    async fn alert(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Records every stack reset requested.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    resets: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resets(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.resets.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn reset_to(&self, path: &str, params: &[(String, String)]) -> Result<()> {
        self.resets
            .lock()
            .unwrap()
            .push((path.to_string(), params.to_vec()));
        Ok(())
    }
}

/// A backend double with programmable failures.
#[derive(Clone)]
pub struct StubBackend {
    session: Arc<RwLock<Option<Session>>>,
    profiles: Arc<RwLock<HashMap<UserId, Profile>>>,
    profile_error: Arc<RwLock<Option<String>>>,
    sign_out_error: Arc<RwLock<Option<String>>>,
    events: broadcast::Sender<AuthEvent>,
}

impl StubBackend {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            session: Arc::new(RwLock::new(None)),
            profiles: Arc::new(RwLock::new(HashMap::new())),
            profile_error: Arc::new(RwLock::new(None)),
            sign_out_error: Arc::new(RwLock::new(None)),
            events,
        }
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.write().unwrap() = session;
    }

    pub fn put_profile(&self, user: &UserId, profile: Profile) {
        self.profiles.write().unwrap().insert(user.clone(), profile);
    }

    /// Make every profile fetch fail with an API error carrying `message`.
    pub fn fail_profile_fetch(&self, message: &str) {
        *self.profile_error.write().unwrap() = Some(message.to_string());
    }

    /// Make the next backend sign-out fail with an API error carrying
    /// `message`.
    pub fn fail_sign_out(&self, message: &str) {
        *self.sign_out_error.write().unwrap() = Some(message.to_string());
    }

    /// Push an auth event to subscribers.
    pub fn push_event(&self, event: AuthEvent) {
        let _ = self.events.send(event);
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn stub_error(message: &str) -> Error {
    Error::Api(ApiError::new(500, None, Some(message.to_string())))
}

#[async_trait]
impl Backend for StubBackend {
    type Events = StubEvents;

    async fn sign_in(&self, _credentials: Credentials) -> Result<Session> {
        let session = test_session();
        *self.session.write().unwrap() = Some(session.clone());
        self.push_event(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.session.read().unwrap().clone())
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(message) = self.sign_out_error.read().unwrap().as_deref() {
            return Err(stub_error(message));
        }
        *self.session.write().unwrap() = None;
        self.push_event(AuthEvent::SignedOut);
        Ok(())
    }

    async fn fetch_profile(&self, user: &UserId) -> Result<Option<Profile>> {
        if let Some(message) = self.profile_error.read().unwrap().as_deref() {
            return Err(stub_error(message));
        }
        Ok(self.profiles.read().unwrap().get(user).cloned())
    }

    fn subscribe(&self) -> Self::Events {
        StubEvents {
            inner: BroadcastStream::new(self.events.subscribe()),
        }
    }
}

pub struct StubEvents {
    inner: BroadcastStream<AuthEvent>,
}

impl Stream for StubEvents {
    type Item = AuthEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => return Poll::Ready(Some(event)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(_)))) => {}
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
