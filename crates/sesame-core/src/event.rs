//! Auth state change events.

use crate::session::Session;

/// A state change notification pushed by the auth backend.
///
/// Backends emit one of these whenever the session transitions: a new
/// sign-in, a token refresh on an existing session, or a sign-out. The
/// payload is the session after the transition, absent for sign-out.
#[derive(Clone, Debug)]
pub enum AuthEvent {
    /// A user signed in; carries the new session.
    SignedIn(Session),

    /// The session's tokens were refreshed; carries the updated session.
    TokenRefreshed(Session),

    /// The session ended.
    SignedOut,
}

impl AuthEvent {
    /// Returns the session after this transition, if one exists.
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthEvent::SignedIn(session) | AuthEvent::TokenRefreshed(session) => Some(session),
            AuthEvent::SignedOut => None,
        }
    }

    /// Returns a short name for the event kind, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::SignedIn(_) => "signed-in",
            AuthEvent::TokenRefreshed(_) => "token-refreshed",
            AuthEvent::SignedOut => "signed-out",
        }
    }
}
