//! Authenticated session type.

use chrono::{DateTime, Utc};

use crate::tokens::{AccessToken, RefreshToken};
use crate::types::UserId;

/// An authenticated session issued by the auth backend.
///
/// A session is an opaque token bundle identifying an authenticated user.
/// The backend owns session validity; holders keep a read-only mirror that
/// lives until the next auth event or an explicit sign-out.
#[derive(Clone)]
pub struct Session {
    user: UserId,
    email: Option<String>,
    access_token: AccessToken,
    refresh_token: Option<RefreshToken>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a new session.
    pub fn new(
        user: UserId,
        email: Option<String>,
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            user,
            email,
            access_token,
            refresh_token,
            expires_at,
        }
    }

    /// Returns the id of the user this session authenticates.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Returns the email address of the signed-in user, if known.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the access token for this session.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the refresh token for this session, if any.
    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    /// Returns the expiry time of the access token, if known.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns true if the access token expiry is known and in the past.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

// Custom Debug impl that hides token material
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
