//! sesame - Session and profile context service.
//!
//! This crate provides [`SessionContext`], the component that tracks the
//! current authentication session, mirrors the signed-in user's profile
//! record, and reacts to auth state change notifications pushed by the
//! backend. Collaborators (backend, key-value storage, navigation, user
//! alerts) are injected through the `sesame-core` traits; implementations
//! live in `sesame-http`, `sesame-local`, and host applications.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sesame::{ContextConfig, SessionContext};
//! # async fn example(
//! #     backend: sesame_local::LocalBackend,
//! #     storage: Arc<dyn sesame_core::KeyStore>,
//! #     navigator: Arc<dyn sesame_core::Navigator>,
//! #     alerts: Arc<dyn sesame_core::Alerts>,
//! # ) {
//! let context = SessionContext::new(
//!     backend,
//!     storage,
//!     navigator,
//!     alerts,
//!     ContextConfig::default(),
//! );
//!
//! context.initialize().await;
//! let _events = context.subscribe();
//!
//! let mut state = context.watch();
//! while state.changed().await.is_ok() {
//!     let snapshot = state.borrow_and_update().clone();
//!     println!("signed in: {}", snapshot.session.is_some());
//! }
//! # }
//! ```

mod config;
mod context;
mod state;

pub use config::ContextConfig;
pub use context::{EventsGuard, SessionContext};
pub use state::ContextState;

// Re-export the types consumers handle through the context
pub use sesame_core::{AuthEvent, Credentials, Profile, Session};
