//! Auth and REST endpoint definitions and request/response types.

use serde::{Deserialize, Serialize};

use sesame_core::Profile;

// ============================================================================
// Endpoint Names
// ============================================================================

/// auth/v1/token
pub const TOKEN: &str = "token";

/// auth/v1/logout
pub const LOGOUT: &str = "logout";

/// Query key selecting the token grant flavor.
pub const GRANT_TYPE: &str = "grant_type";

/// Grant type for email/password sign-in.
pub const GRANT_PASSWORD: &str = "password";

/// Grant type for refreshing an existing session.
pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";

/// The table holding user profile rows, keyed 1:1 by user id.
pub const PROFILES_TABLE: &str = "profiles";

/// Columns selected from the profiles table.
pub const PROFILE_COLUMNS: &str = "username,website,avatar_url";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for the password grant.
#[derive(Debug, Serialize)]
pub struct PasswordGrantRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for the refresh token grant.
#[derive(Debug, Serialize)]
pub struct RefreshGrantRequest<'a> {
    pub refresh_token: &'a str,
}

/// Response from a token grant.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Absolute expiry as a Unix timestamp; preferred over `expires_in`.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: ApiUser,
}

/// The user object embedded in token responses.
#[derive(Debug, Deserialize)]
pub struct ApiUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A row from the profiles table.
#[derive(Debug, Deserialize)]
pub struct ProfileRow {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            username: row.username.unwrap_or_default(),
            website: row.website.unwrap_or_default(),
            avatar_url: row.avatar_url.unwrap_or_default(),
        }
    }
}

/// Error body returned by the service.
///
/// The auth API uses `error`/`error_description` (and sometimes `msg`);
/// the tabular API uses `code`/`message`. One lenient shape covers both.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ApiErrorBody {
    /// The service error code, whichever field carried it.
    pub fn error_code(&self) -> Option<String> {
        self.code.clone().or_else(|| self.error.clone())
    }

    /// The human-readable message, whichever field carried it.
    pub fn error_message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.msg.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_row_nulls_become_empty_strings() {
        let row: ProfileRow =
            serde_json::from_str(r#"{"username":"alice","website":null}"#).unwrap();
        let profile = Profile::from(row);
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.website, "");
        assert_eq!(profile.avatar_url, "");
    }

    #[test]
    fn error_body_reads_auth_api_shape() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(body.error_code().as_deref(), Some("invalid_grant"));
        assert_eq!(
            body.error_message().as_deref(),
            Some("Invalid login credentials")
        );
    }

    #[test]
    fn error_body_reads_rest_api_shape() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"code":"PGRST116","message":"The result contains 0 rows"}"#,
        )
        .unwrap();
        assert_eq!(body.error_code().as_deref(), Some("PGRST116"));
        assert_eq!(
            body.error_message().as_deref(),
            Some("The result contains 0 rows")
        );
    }
}
