//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use sesame_core::traits::Backend;
use sesame_core::{Credentials, ServiceUrl};
use sesame_http::HttpBackend;

use crate::output;
use crate::session;
use crate::store::FileKeyStore;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Service base URL
    #[arg(long)]
    pub service: String,

    /// Publishable API key for the service
    #[arg(long)]
    pub api_key: String,

    /// Account email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let service = ServiceUrl::new(&args.service).context("Invalid service URL")?;
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Signing in...".dimmed());

    let backend = HttpBackend::new(service.clone(), &args.api_key);
    let session = backend
        .sign_in(credentials)
        .await
        .context("Failed to sign in")?;

    // Save session
    let store = FileKeyStore::open_default()?;
    session::save_session(&store, &service, &args.api_key, &session)
        .await
        .context("Failed to save session")?;

    // Print success
    output::success("Signed in successfully");
    println!();
    output::field("User", &session.user().to_string());
    if let Some(email) = session.email() {
        output::field("Email", email);
    }
    output::field("Service", service.as_str());

    Ok(())
}
