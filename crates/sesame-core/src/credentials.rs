//! Sign-in credentials type.

use std::fmt;

/// Sign-in credentials for the auth backend.
///
/// This type holds the email address and password required to create a
/// session with the hosted service.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental
/// logging.
///
/// # Example
///
/// ```
/// use sesame_core::Credentials;
///
/// let creds = Credentials::new("alice@example.com", "hunter2");
/// assert_eq!(creds.email(), "alice@example.com");
/// ```
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use only when constructing the sign-in request.
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Hide password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
