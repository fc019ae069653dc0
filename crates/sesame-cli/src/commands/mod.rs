//! Command implementations.

pub mod login;
pub mod profile;
pub mod sign_out;
pub mod whoami;
