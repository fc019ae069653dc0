//! Profile command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use sesame_core::traits::Backend;
use sesame_http::HttpBackend;

use crate::output;
use crate::session;
use crate::store::FileKeyStore;

#[derive(Args, Debug)]
pub struct ProfileArgs {}

pub async fn run(_args: ProfileArgs) -> Result<()> {
    let store = FileKeyStore::open_default()?;
    let (service, api_key, active) = session::load_session(&store)
        .await?
        .context("No active session. Run 'sesame login' first.")?;

    let backend = HttpBackend::new(service, api_key).with_session(active.clone());

    let profile = backend
        .fetch_profile(active.user())
        .await
        .context("Failed to fetch profile")?;

    match profile {
        Some(profile) => {
            output::field("Username", &profile.username);
            output::field("Website", &profile.website);
            output::field("Avatar", &profile.avatar_url);
        }
        None => {
            eprintln!("{}", "No profile row for this user".dimmed());
        }
    }

    Ok(())
}
