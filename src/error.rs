use thiserror::Error;

/// Errors that can occur while scraping, diffing, or notifying
#[derive(Error, Debug)]
pub enum WatchError {
    /// Failed to fetch a page or API response
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Response body was not the JSON we expected
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A source table row did not have the expected shape
    #[error("Malformed recipe row: {0}")]
    MalformedRow(String),

    /// A CSS selector could not be parsed
    #[error("Invalid selector '{0}'")]
    SelectorError(String),

    /// The notification sink rejected or failed the alert
    #[error("Notification failed: {0}")]
    NotificationError(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
