//! Session persistence for CLI login state.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sesame_core::traits::KeyStore;
use sesame_core::{AccessToken, RefreshToken, ServiceUrl, Session, UserId};

use crate::store::FileKeyStore;

/// Key the CLI session is stored under.
///
/// Named with the auth prefix and the word "session" so the context's
/// sign-out sweep removes it.
pub const SESSION_KEY: &str = "sb-cli-session";

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    service: String,
    api_key: String,
    user_id: String,
    email: Option<String>,
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

/// Save a session (with the service it belongs to) into the store.
pub async fn save_session(
    store: &FileKeyStore,
    service: &ServiceUrl,
    api_key: &str,
    session: &Session,
) -> Result<()> {
    let stored = StoredSession {
        service: service.to_string(),
        api_key: api_key.to_string(),
        user_id: session.user().to_string(),
        email: session.email().map(str::to_string),
        access_token: session.access_token().as_str().to_string(),
        refresh_token: session.refresh_token().map(|t| t.as_str().to_string()),
        expires_at: session.expires_at(),
    };

    let json = serde_json::to_string(&stored)?;
    store
        .set(SESSION_KEY, &json)
        .await
        .context("Failed to persist session")?;

    Ok(())
}

/// Load the stored session, if any, along with its service and API key.
pub async fn load_session(store: &FileKeyStore) -> Result<Option<(ServiceUrl, String, Session)>> {
    let Some(json) = store
        .get(SESSION_KEY)
        .await
        .context("Failed to read session")?
    else {
        return Ok(None);
    };

    let stored: StoredSession = match serde_json::from_str(&json) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!(error = %e, "Stored session is unreadable, ignoring it");
            return Ok(None);
        }
    };

    let service = ServiceUrl::new(&stored.service).context("Invalid service URL in session")?;
    let user = UserId::new(&stored.user_id).context("Invalid user id in session")?;

    let session = Session::new(
        user,
        stored.email,
        AccessToken::new(stored.access_token),
        stored.refresh_token.map(RefreshToken::new),
        stored.expires_at,
    );

    Ok(Some((service, stored.api_key, session)))
}
