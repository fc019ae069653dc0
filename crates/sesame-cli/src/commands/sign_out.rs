//! Sign-out command implementation.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::Args;
use colored::Colorize;

use sesame::{ContextConfig, SessionContext};
use sesame_core::traits::{Alerts, Navigator};
use sesame_http::HttpBackend;

use crate::output;
use crate::session;
use crate::store::FileKeyStore;

#[derive(Args, Debug)]
pub struct SignOutArgs {}

/// Prints alerts raised during sign-out to stderr.
struct TerminalAlerts;

#[async_trait]
impl Alerts for TerminalAlerts {
    async fn alert(&self, message: &str) {
        output::error(message);
    }
}

/// Echoes the navigation target instead of switching screens.
struct TerminalNavigator;

#[async_trait]
impl Navigator for TerminalNavigator {
    async fn reset_to(&self, path: &str, _params: &[(String, String)]) -> sesame_core::Result<()> {
        eprintln!("{}", format!("-> {path}").dimmed());
        Ok(())
    }
}

pub async fn run(_args: SignOutArgs) -> Result<()> {
    let store = FileKeyStore::open_default()?;
    let (service, api_key, active) = session::load_session(&store)
        .await?
        .context("No active session. Run 'sesame login' first.")?;

    let backend = HttpBackend::new(service, api_key).with_session(active);
    let context = SessionContext::new(
        backend,
        Arc::new(store),
        Arc::new(TerminalNavigator),
        Arc::new(TerminalAlerts),
        ContextConfig::default(),
    );

    context.initialize().await;
    context.sign_out().await;

    // The context surfaces failures through alerts rather than a return
    // value, so inspect the state to decide the exit code.
    if context.snapshot().session.is_some() {
        bail!("Sign out failed; the stored session was kept");
    }

    output::success("Signed out");
    Ok(())
}
