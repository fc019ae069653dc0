//! Observable context state.

use sesame_core::{Profile, Session};

/// The state a [`SessionContext`](crate::SessionContext) exposes to
/// consumers.
///
/// Profile fields are non-empty only while a session with a user id is
/// present; any transition to "no session" clears session and profile
/// fields in a single state update, so consumers never observe a stale
/// profile next to a missing session.
#[derive(Clone, Debug)]
pub struct ContextState {
    /// The current session, if any.
    pub session: Option<Session>,

    /// True while a session query, profile fetch, or sign-out is running.
    pub loading: bool,

    /// Display name of the signed-in user.
    pub username: String,

    /// Website of the signed-in user.
    pub website: String,

    /// Avatar URL of the signed-in user.
    pub avatar_url: String,
}

impl ContextState {
    pub(crate) fn new() -> Self {
        Self {
            session: None,
            loading: true,
            username: String::new(),
            website: String::new(),
            avatar_url: String::new(),
        }
    }

    /// Reset all profile fields to empty.
    pub(crate) fn clear_profile(&mut self) {
        self.username.clear();
        self.website.clear();
        self.avatar_url.clear();
    }

    /// Overwrite the profile fields from a fetched record.
    pub(crate) fn apply_profile(&mut self, profile: &Profile) {
        self.username = profile.username.clone();
        self.website = profile.website.clone();
        self.avatar_url = profile.avatar_url.clone();
    }
}

impl Default for ContextState {
    fn default() -> Self {
        Self::new()
    }
}
