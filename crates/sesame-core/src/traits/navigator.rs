//! Navigation trait.

use async_trait::async_trait;

use crate::Result;

/// The host application's navigation stack.
///
/// Only one operation is needed here: a stack-resetting navigation that
/// replaces history, so back-navigation cannot return to the screens
/// behind it.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Reset the navigation stack and go to `path` with the given params.
    async fn reset_to(&self, path: &str, params: &[(String, String)]) -> Result<()>;
}
