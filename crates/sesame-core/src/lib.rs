//! sesame-core - Core types and collaborator traits for the sesame session toolkit.
//!
//! This crate defines the data model (sessions, profiles, auth events) and the
//! trait seams behind which the external collaborators live: the hosted auth
//! backend, the local key-value store, the navigation stack, and the blocking
//! user notification surface. Implementations live in sibling crates
//! (`sesame-http`, `sesame-local`) and in host applications.

pub mod credentials;
pub mod error;
pub mod event;
pub mod profile;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::Error;
pub use event::AuthEvent;
pub use profile::Profile;
pub use session::Session;
pub use tokens::{AccessToken, RefreshToken};
pub use traits::{Alerts, Backend, EventStream, KeyStore, Navigator};
pub use types::{ServiceUrl, UserId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
