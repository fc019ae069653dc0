//! sesame-http - HTTP-backed auth service implementation.
//!
//! Implements the [`Backend`](sesame_core::Backend) trait against a hosted
//! auth-as-a-service API: token grants and sign-out under `/auth/v1/`, and
//! single-row profile lookups against the PostgREST-style `/rest/v1/`
//! tabular API. Auth state change events are emitted by this client on its
//! own transitions (sign-in, token refresh, sign-out) and delivered through
//! a broadcast stream.

mod backend;
mod client;
mod endpoints;

pub use backend::{AuthEvents, HttpBackend};
pub use client::RestClient;
