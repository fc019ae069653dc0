//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{login, profile, sign_out, whoami};

/// CLI for exploring a sesame-backed auth service.
#[derive(Parser, Debug)]
#[command(name = "sesame")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new session (sign in)
    Login(login::LoginArgs),

    /// Display the active session
    Whoami(whoami::WhoamiArgs),

    /// Fetch the signed-in user's profile row
    Profile(profile::ProfileArgs),

    /// End the session and sweep local auth keys
    SignOut(sign_out::SignOutArgs),
}
