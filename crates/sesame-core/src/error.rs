//! Error types for the sesame crates.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, service API, storage, and input validation
//! errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for sesame operations.
///
/// This error type covers all possible failure modes across the crates,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, HTTP plumbing).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (invalid credentials, expired session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Service API errors (non-success responses with a service error body).
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Local key-value storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (invalid user id or service URL).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Session has expired.
    #[error("session expired")]
    SessionExpired,

    /// Refresh token is invalid or expired.
    #[error("refresh token invalid")]
    RefreshTokenInvalid,

    /// An operation requiring a session was attempted without one.
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Errors returned by the hosted service API.
///
/// Carries the HTTP status together with the service's error code and
/// message when the response body included them.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Service error code (if present).
    pub code: Option<String>,
    /// Error message from the service.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// The tabular query layer's code for "zero rows matched a single-object
/// request". Expected absence, not a failure.
pub const NOT_FOUND_CODE: &str = "PGRST116";

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, code: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    /// Check if this is the not-found status for a single-row query.
    ///
    /// Not-found is expected absence and is distinct from a query failure;
    /// callers treat it as non-fatal.
    pub fn is_not_found(&self) -> bool {
        self.code.as_deref() == Some(NOT_FOUND_CODE)
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
            || self.code.as_deref() == Some("invalid_grant")
            || self.code.as_deref() == Some("session_not_found")
    }
}

/// Local key-value storage errors.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StorageError {
    /// Description of the storage failure.
    pub message: String,
}

impl StorageError {
    /// Create a new storage error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid user id format.
    #[error("invalid user id '{value}': {reason}")]
    UserId { value: String, reason: String },

    /// Invalid service URL format.
    #[error("invalid service URL '{value}': {reason}")]
    ServiceUrl { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
