//! HTTP-backed implementation of the auth backend.

use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures_core::Stream;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, info, instrument, warn};

use sesame_core::error::{AuthError, Error};
use sesame_core::traits::Backend;
use sesame_core::{
    AccessToken, AuthEvent, Credentials, Profile, RefreshToken, Result, ServiceUrl, Session, UserId,
};

use crate::client::RestClient;
use crate::endpoints::{
    GRANT_PASSWORD, GRANT_REFRESH_TOKEN, GRANT_TYPE, LOGOUT, PROFILE_COLUMNS,
    PROFILES_TABLE, PasswordGrantRequest, ProfileRow, RefreshGrantRequest, TOKEN, TokenResponse,
};

/// Buffered auth events per subscriber before lagging.
const EVENT_CAPACITY: usize = 16;

/// A network-backed auth backend for the hosted service.
///
/// Holds the current session and emits [`AuthEvent`]s on its own
/// transitions: sign-in, token refresh, sign-out. Cheap to clone; clones
/// share session state and the event channel.
#[derive(Clone)]
pub struct HttpBackend {
    inner: Arc<BackendInner>,
}

struct BackendInner {
    client: RestClient,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl HttpBackend {
    /// Create a new backend for the given service.
    pub fn new(service: ServiceUrl, api_key: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(BackendInner {
                client: RestClient::new(service, api_key),
                session: RwLock::new(None),
                events,
            }),
        }
    }

    /// Seed the backend with a previously persisted session.
    ///
    /// No event is emitted; restoring is not a state transition.
    pub fn with_session(self, session: Session) -> Self {
        *self.inner.session.write().unwrap() = Some(session);
        self
    }

    /// Returns the service URL for this backend.
    pub fn service(&self) -> &ServiceUrl {
        self.inner.client.service()
    }

    /// Refresh the current session's tokens.
    ///
    /// Emits a token-refreshed event on success.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no session, the session has no refresh
    /// token, or the grant is rejected.
    #[instrument(skip(self))]
    pub async fn refresh_session(&self) -> Result<Session> {
        info!("Refreshing session");

        let refresh_token = {
            let session = self.inner.session.read().unwrap();
            session
                .as_ref()
                .map(|s| s.refresh_token().map(|t| t.as_str().to_string()))
        };
        let refresh_token = refresh_token
            .ok_or(AuthError::NotAuthenticated)?
            .ok_or(AuthError::RefreshTokenInvalid)?;

        let request = RefreshGrantRequest {
            refresh_token: &refresh_token,
        };
        let response: TokenResponse = self
            .inner
            .client
            .auth_procedure(
                TOKEN,
                &[(GRANT_TYPE, GRANT_REFRESH_TOKEN)],
                &request,
                None,
            )
            .await?;

        let session = session_from_response(response)?;
        *self.inner.session.write().unwrap() = Some(session.clone());
        self.emit(AuthEvent::TokenRefreshed(session.clone()));

        debug!("Session refreshed successfully");
        Ok(session)
    }

    fn access_token(&self) -> Option<AccessToken> {
        let session = self.inner.session.read().unwrap();
        session.as_ref().map(|s| s.access_token().clone())
    }

    fn emit(&self, event: AuthEvent) {
        // Nobody listening is fine
        let _ = self.inner.events.send(event);
    }
}

#[async_trait]
impl Backend for HttpBackend {
    type Events = AuthEvents;

    #[instrument(skip(self, credentials), fields(service = %self.service(), email = %credentials.email()))]
    async fn sign_in(&self, credentials: Credentials) -> Result<Session> {
        info!("Creating new session");

        let request = PasswordGrantRequest {
            email: credentials.email(),
            password: credentials.password(),
        };
        let response: TokenResponse = self
            .inner
            .client
            .auth_procedure(
                TOKEN,
                &[(GRANT_TYPE, GRANT_PASSWORD)],
                &request,
                None,
            )
            .await?;

        let session = session_from_response(response)?;
        *self.inner.session.write().unwrap() = Some(session.clone());
        self.emit(AuthEvent::SignedIn(session.clone()));

        debug!(user = %session.user(), "Session created successfully");
        Ok(session)
    }

    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.inner.session.read().unwrap().clone())
    }

    #[instrument(skip(self), fields(service = %self.service()))]
    async fn sign_out(&self) -> Result<()> {
        let Some(token) = self.access_token() else {
            debug!("No session to sign out");
            return Ok(());
        };

        self.inner
            .client
            .auth_procedure_empty(LOGOUT, Some(&token))
            .await
            .map_err(expired_session)?;

        *self.inner.session.write().unwrap() = None;
        self.emit(AuthEvent::SignedOut);

        info!("Signed out");
        Ok(())
    }

    #[instrument(skip(self), fields(service = %self.service(), user = %user))]
    async fn fetch_profile(&self, user: &UserId) -> Result<Option<Profile>> {
        debug!("Fetching profile");

        let token = self.access_token();
        let filter = ("id", format!("eq.{}", user));
        let row: Option<ProfileRow> = self
            .inner
            .client
            .select_single(PROFILES_TABLE, PROFILE_COLUMNS, &[filter], token.as_ref())
            .await
            .map_err(|err| match token {
                // A rejected API key is not a session problem
                Some(_) => expired_session(err),
                None => err,
            })?;

        Ok(row.map(Profile::from))
    }

    fn subscribe(&self) -> Self::Events {
        AuthEvents::new(self.inner.events.subscribe())
    }
}

// Custom Debug impl that hides session contents
impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("service", self.service())
            .finish_non_exhaustive()
    }
}

/// Map a rejected bearer token onto the session-expired error.
///
/// Only called on paths that sent a session's access token; grant
/// rejections during sign-in keep their API error body.
fn expired_session(err: Error) -> Error {
    match err {
        Error::Api(api) if api.is_auth_error() => Error::Auth(AuthError::SessionExpired),
        other => other,
    }
}

/// Build a session from a token grant response.
fn session_from_response(response: TokenResponse) -> Result<Session> {
    let user = UserId::new(&response.user.id)?;

    let expires_at = match (response.expires_at, response.expires_in) {
        (Some(at), _) => DateTime::<Utc>::from_timestamp(at, 0),
        (None, Some(seconds)) => Some(Utc::now() + Duration::seconds(seconds)),
        (None, None) => None,
    };

    Ok(Session::new(
        user,
        response.user.email,
        AccessToken::new(response.access_token),
        response.refresh_token.map(RefreshToken::new),
        expires_at,
    ))
}

/// Stream of auth events from an [`HttpBackend`].
pub struct AuthEvents {
    inner: BroadcastStream<AuthEvent>,
}

impl AuthEvents {
    fn new(rx: broadcast::Receiver<AuthEvent>) -> Self {
        Self {
            inner: BroadcastStream::new(rx),
        }
    }
}

impl Stream for AuthEvents {
    type Item = AuthEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => return Poll::Ready(Some(event)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    // Skip over the gap; the next event still reflects
                    // the latest session state.
                    warn!(skipped, "auth event receiver lagged");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
