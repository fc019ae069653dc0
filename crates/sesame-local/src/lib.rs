//! sesame-local - In-memory collaborators for development and tests.
//!
//! Provides a [`LocalBackend`] implementing the same [`Backend`]
//! (sesame_core::Backend) contract as the network implementation, plus a
//! [`MemoryKeyStore`]. Useful for offline development and for exercising
//! the session context without a running service.

mod backend;
mod key_store;

pub use backend::{LocalBackend, LocalEvents};
pub use key_store::MemoryKeyStore;
