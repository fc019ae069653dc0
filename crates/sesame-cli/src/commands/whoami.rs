//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session;
use crate::store::FileKeyStore;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let store = FileKeyStore::open_default()?;
    let (service, _api_key, active) = session::load_session(&store)
        .await?
        .context("No active session. Run 'sesame login' first.")?;

    output::field("User", &active.user().to_string());
    if let Some(email) = active.email() {
        output::field("Email", email);
    }
    output::field("Service", service.as_str());
    if let Some(expires_at) = active.expires_at() {
        output::field("Expires", &expires_at.to_rfc3339());
        if active.is_expired() {
            output::error("Session is expired; sign in again");
        }
    }

    Ok(())
}
