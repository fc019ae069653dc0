//! The session/profile context service.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use sesame_core::traits::{Alerts, Backend, KeyStore, Navigator};
use sesame_core::{AuthEvent, Result, Session};

use crate::config::ContextConfig;
use crate::state::ContextState;

/// Tracks the current session and the signed-in user's profile.
///
/// The context mirrors the backend's authoritative session into observable
/// state, fetches the profile row for the session's user, and exposes
/// sign-out with local cleanup and a navigation reset. Constructed once at
/// application start with its collaborators injected; cheap to clone, and
/// clones share all state.
///
/// Failures are terminal for the operation that hit them: each is reported
/// once through the injected [`Alerts`] surface and never retried. A
/// missing profile row is expected absence, not a failure.
pub struct SessionContext<B: Backend> {
    inner: Arc<ContextInner<B>>,
}

struct ContextInner<B> {
    backend: B,
    storage: Arc<dyn KeyStore>,
    navigator: Arc<dyn Navigator>,
    alerts: Arc<dyn Alerts>,
    config: ContextConfig,
    state: watch::Sender<ContextState>,
}

impl<B: Backend> Clone for SessionContext<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: Backend + 'static> SessionContext<B> {
    /// Create a new context from its collaborators.
    ///
    /// The context starts with no session and `loading` raised; call
    /// [`initialize`](Self::initialize) to resolve the backend's current
    /// session and [`subscribe`](Self::subscribe) to follow auth changes.
    pub fn new(
        backend: B,
        storage: Arc<dyn KeyStore>,
        navigator: Arc<dyn Navigator>,
        alerts: Arc<dyn Alerts>,
        config: ContextConfig,
    ) -> Self {
        let (state, _) = watch::channel(ContextState::new());
        Self {
            inner: Arc::new(ContextInner {
                backend,
                storage,
                navigator,
                alerts,
                config,
                state,
            }),
        }
    }

    /// Returns a receiver observing the context state.
    ///
    /// Consumers re-render on every change notification.
    pub fn watch(&self) -> watch::Receiver<ContextState> {
        self.inner.state.subscribe()
    }

    /// Returns a clone of the current state.
    pub fn snapshot(&self) -> ContextState {
        self.inner.state.borrow().clone()
    }

    /// Resolve the backend's current session.
    ///
    /// Clears profile fields, stores whatever session the backend reports,
    /// and spawns a profile fetch when a user is present. `loading` drops
    /// once the session query resolves, independent of the profile fetch.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        self.inner.state.send_modify(ContextState::clear_profile);
        let _loading = LoadingGuard::raise(&self.inner.state);

        match self.inner.backend.current_session().await {
            Ok(session) => {
                debug!(present = session.is_some(), "initial session resolved");
                self.inner
                    .state
                    .send_modify(|state| state.session = session.clone());
                if let Some(session) = session {
                    self.spawn_profile_fetch(session);
                }
            }
            Err(err) => {
                warn!(error = %err, "initial session query failed");
                self.inner.alerts.alert(&err.to_string()).await;
            }
        }
    }

    /// Follow the backend's auth state change notifications.
    ///
    /// Spawns a task driving the event stream into the context. Dropping
    /// the returned guard unsubscribes; keep it alive for as long as the
    /// context should react to events.
    pub fn subscribe(&self) -> EventsGuard {
        let mut events = self.inner.backend.subscribe();
        let context = self.clone();
        let task = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                context.handle_auth_event(event);
            }
            debug!("auth event stream ended");
        });
        EventsGuard { task }
    }

    /// Apply one auth state change.
    ///
    /// The event's session is always stored; an absent session clears the
    /// profile fields in the same update. A present user triggers a
    /// fire-and-forget profile fetch with no ordering guarantee relative
    /// to later events.
    fn handle_auth_event(&self, event: AuthEvent) {
        debug!(event = event.name(), "auth state changed");

        let session = event.session().cloned();
        self.inner.state.send_modify(|state| {
            if session.is_none() {
                state.clear_profile();
            }
            state.session = session.clone();
        });

        if let Some(session) = session {
            self.spawn_profile_fetch(session);
        }
    }

    /// Re-fetch the profile for the current session's user.
    pub async fn refresh_profile(&self) {
        self.fetch_profile_for(None).await;
    }

    fn spawn_profile_fetch(&self, session: Session) {
        let context = self.clone();
        tokio::spawn(async move {
            context.fetch_profile_for(Some(session)).await;
        });
    }

    /// Fetch the profile row for the given session's user, or the current
    /// session's when none is given.
    ///
    /// No user means nothing to do. A missing row leaves the fields
    /// untouched and raises no alert; any other failure is alerted and the
    /// fields stay unchanged. `loading` is lowered on every exit path.
    #[instrument(skip(self, session))]
    async fn fetch_profile_for(&self, session: Option<Session>) {
        let session = session.or_else(|| self.inner.state.borrow().session.clone());
        let Some(session) = session else {
            debug!("no session; skipping profile fetch");
            return;
        };
        let user = session.user().clone();

        let _loading = LoadingGuard::raise(&self.inner.state);

        match self.inner.backend.fetch_profile(&user).await {
            Ok(Some(profile)) => {
                debug!(%user, "profile fetched");
                self.inner
                    .state
                    .send_modify(|state| state.apply_profile(&profile));
            }
            Ok(None) => {
                debug!(%user, "no profile row");
            }
            Err(err) => {
                warn!(%user, error = %err, "profile fetch failed");
                self.inner.alerts.alert(&err.to_string()).await;
            }
        }
    }

    /// Sign out: local key sweep, backend sign-out, state reset, and a
    /// stack-resetting navigation to the sign-in path.
    ///
    /// Any failing step is alerted and stops the operation. A backend
    /// sign-out failure returns before local session state is cleared, so
    /// the context still reports the session until a retry succeeds.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) {
        let _loading = LoadingGuard::raise(&self.inner.state);

        if let Err(err) = self.sign_out_flow().await {
            warn!(error = %err, "sign-out failed");
            self.inner.alerts.alert(&err.to_string()).await;
        }
    }

    async fn sign_out_flow(&self) -> Result<()> {
        // Best-effort sweep of locally persisted auth keys; the backend
        // sign-out below is what actually ends the session.
        let keys = self.inner.storage.keys().await?;
        let stale: Vec<String> = keys
            .into_iter()
            .filter(|key| {
                key.starts_with(&self.inner.config.storage_prefix) || key.contains("session")
            })
            .collect();
        if !stale.is_empty() {
            debug!(count = stale.len(), "removing persisted auth keys");
            self.inner.storage.remove(&stale).await?;
        }

        self.inner.backend.sign_out().await?;

        self.inner.state.send_modify(|state| {
            state.session = None;
            state.clear_profile();
        });

        self.inner
            .navigator
            .reset_to(&self.inner.config.sign_in_path, &[])
            .await?;

        Ok(())
    }
}

/// Raises the loading flag and guarantees it drops on every exit path.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<ContextState>,
}

impl<'a> LoadingGuard<'a> {
    fn raise(state: &'a watch::Sender<ContextState>) -> Self {
        state.send_modify(|s| s.loading = true);
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.loading = false);
    }
}

/// Scoped subscription to the backend's auth events.
///
/// Dropping the guard stops the listening task on all exit paths.
pub struct EventsGuard {
    task: JoinHandle<()>,
}

impl EventsGuard {
    /// Stop listening for auth events.
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for EventsGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}
