//! Token types for session authentication.

use std::fmt;

/// An access token for authenticated requests to the hosted service.
///
/// Access tokens are short-lived JWTs issued by the auth backend.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    ///
    /// # Security
    ///
    /// Use only when constructing HTTP authorization headers or
    /// persisting a session.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A refresh token for obtaining new access tokens.
///
/// Refresh tokens are longer-lived and used to obtain new access tokens
/// without requiring re-authentication.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Create a new refresh token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in refresh requests.
    ///
    /// # Security
    ///
    /// Use only when constructing token refresh requests or
    /// persisting a session.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}
