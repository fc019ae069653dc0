//! Auth backend trait.

use async_trait::async_trait;

use crate::credentials::Credentials;
use crate::profile::Profile;
use crate::session::Session;
use crate::types::UserId;
use crate::Result;

use super::EventStream;

/// The hosted auth + data backend.
///
/// Owns the authentication protocol (token issuance, refresh, storage
/// encryption) and the authoritative session. Holders observe the session
/// through [`current_session`](Backend::current_session) and
/// [`subscribe`](Backend::subscribe); they never manage tokens themselves.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Event stream type for this backend.
    type Events: EventStream + 'static;

    /// Authenticate and create a new session.
    async fn sign_in(&self, credentials: Credentials) -> Result<Session>;

    /// Returns the current session, if one exists.
    async fn current_session(&self) -> Result<Option<Session>>;

    /// End the current session.
    ///
    /// The backend sign-out is authoritative; local cleanup elsewhere is
    /// best-effort.
    async fn sign_out(&self) -> Result<()>;

    /// Fetch the profile row for a user.
    ///
    /// Returns `Ok(None)` when no row exists (expected absence, distinct
    /// from a query failure).
    async fn fetch_profile(&self, user: &UserId) -> Result<Option<Profile>>;

    /// Subscribe to auth state change notifications.
    fn subscribe(&self) -> Self::Events;
}
