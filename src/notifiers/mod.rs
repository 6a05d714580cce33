mod file;
mod sendgrid;

pub use file::FileNotifier;
pub use sendgrid::SendGridNotifier;

use crate::WatchError;
use async_trait::async_trait;

/// A file sent along with an alert.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// A one-shot message announcing updated recipes.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub subject: String,
    pub text: String,
    pub attachment: Attachment,
}

/// Unified trait for every alert sink
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Get the notifier name (e.g., "sendgrid", "file")
    fn name(&self) -> &str;

    /// Deliver the alert
    async fn send(&self, alert: &Alert) -> Result<(), WatchError>;
}
