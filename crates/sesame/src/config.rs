//! Context configuration.

/// Configuration for a [`SessionContext`](crate::SessionContext).
#[derive(Clone, Debug)]
pub struct ContextConfig {
    /// Path the navigator resets to after a successful sign-out.
    pub sign_in_path: String,

    /// Prefix marking locally persisted keys as belonging to the auth
    /// subsystem; such keys are swept on sign-out.
    pub storage_prefix: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            sign_in_path: "/sign-in".to_string(),
            storage_prefix: "sb-".to_string(),
        }
    }
}
