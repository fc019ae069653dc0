//! User profile type.

use serde::{Deserialize, Serialize};

/// User-supplied display attributes stored server-side.
///
/// Profiles are keyed 1:1 by user id in the service's `profiles` table.
/// Missing columns deserialize as empty strings; holders treat the whole
/// record as display-only and never persist it locally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name chosen by the user.
    #[serde(default)]
    pub username: String,

    /// Personal website URL.
    #[serde(default)]
    pub website: String,

    /// URL (or storage path) of the user's avatar image.
    #[serde(default)]
    pub avatar_url: String,
}

impl Profile {
    /// Create a new profile.
    pub fn new(
        username: impl Into<String>,
        website: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            website: website.into(),
            avatar_url: avatar_url.into(),
        }
    }
}
