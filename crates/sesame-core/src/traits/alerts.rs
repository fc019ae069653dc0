//! User notification trait.

use async_trait::async_trait;

/// Blocking user-facing notifications.
///
/// Every failure that isn't expected absence is reported exactly once
/// through this surface, carrying the error's message. Implementations
/// decide how "blocking" looks on their platform (modal dialog, terminal
/// line, test recording).
#[async_trait]
pub trait Alerts: Send + Sync {
    /// Show a blocking notification with the given message.
    async fn alert(&self, message: &str);
}
