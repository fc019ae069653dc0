//! In-memory auth backend.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use futures_core::Stream;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use sesame_core::error::AuthError;
use sesame_core::traits::Backend;
use sesame_core::{
    AccessToken, AuthEvent, Credentials, Profile, RefreshToken, Result, Session, UserId,
};

/// Buffered auth events per subscriber before lagging.
const EVENT_CAPACITY: usize = 16;

/// Access token lifetime handed out by the local backend.
const TOKEN_LIFETIME_MINUTES: i64 = 60;

struct Account {
    user: UserId,
    password: String,
}

/// An in-memory auth backend.
///
/// Accounts and profile rows live in process memory; sessions and events
/// behave like the network implementation's. Cheap to clone; clones share
/// all state.
#[derive(Clone)]
pub struct LocalBackend {
    inner: Arc<BackendInner>,
}

struct BackendInner {
    accounts: RwLock<HashMap<String, Account>>,
    profiles: RwLock<HashMap<UserId, Profile>>,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl LocalBackend {
    /// Create an empty backend with no accounts.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(BackendInner {
                accounts: RwLock::new(HashMap::new()),
                profiles: RwLock::new(HashMap::new()),
                session: RwLock::new(None),
                events,
            }),
        }
    }

    /// Register an account and return its generated user id.
    pub fn add_account(&self, email: impl Into<String>, password: impl Into<String>) -> UserId {
        let user = UserId::from_uuid(Uuid::new_v4());
        let email = email.into();
        debug!(%user, email, "Registering local account");
        self.inner.accounts.write().unwrap().insert(
            email,
            Account {
                user: user.clone(),
                password: password.into(),
            },
        );
        user
    }

    /// Insert or replace the profile row for a user.
    pub fn put_profile(&self, user: &UserId, profile: Profile) {
        self.inner
            .profiles
            .write()
            .unwrap()
            .insert(user.clone(), profile);
    }

    /// Remove the profile row for a user, if present.
    pub fn remove_profile(&self, user: &UserId) {
        self.inner.profiles.write().unwrap().remove(user);
    }

    fn emit(&self, event: AuthEvent) {
        // Nobody listening is fine
        let _ = self.inner.events.send(event);
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for LocalBackend {
    type Events = LocalEvents;

    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    async fn sign_in(&self, credentials: Credentials) -> Result<Session> {
        info!("Creating local session");

        let user = {
            let accounts = self.inner.accounts.read().unwrap();
            let account = accounts
                .get(credentials.email())
                .ok_or(AuthError::InvalidCredentials)?;
            if account.password != credentials.password() {
                return Err(AuthError::InvalidCredentials.into());
            }
            account.user.clone()
        };

        let session = Session::new(
            user,
            Some(credentials.email().to_string()),
            AccessToken::new(format!("local-access-{}", Uuid::new_v4())),
            Some(RefreshToken::new(format!("local-refresh-{}", Uuid::new_v4()))),
            Some(Utc::now() + Duration::minutes(TOKEN_LIFETIME_MINUTES)),
        );

        *self.inner.session.write().unwrap() = Some(session.clone());
        self.emit(AuthEvent::SignedIn(session.clone()));

        Ok(session)
    }

    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.inner.session.read().unwrap().clone())
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<()> {
        let had_session = self.inner.session.write().unwrap().take().is_some();
        if had_session {
            info!("Local session ended");
            self.emit(AuthEvent::SignedOut);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn fetch_profile(&self, user: &UserId) -> Result<Option<Profile>> {
        debug!("Fetching local profile");
        Ok(self.inner.profiles.read().unwrap().get(user).cloned())
    }

    fn subscribe(&self) -> Self::Events {
        LocalEvents {
            inner: BroadcastStream::new(self.inner.events.subscribe()),
        }
    }
}

/// Stream of auth events from a [`LocalBackend`].
pub struct LocalEvents {
    inner: BroadcastStream<AuthEvent>,
}

impl Stream for LocalEvents {
    type Item = AuthEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => return Poll::Ready(Some(event)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    warn!(skipped, "auth event receiver lagged");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
