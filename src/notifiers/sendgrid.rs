use crate::config::NotifyConfig;
use crate::notifiers::{Alert, Notifier};
use crate::WatchError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub struct SendGridNotifier {
    client: Client,
    timeout: Duration,
    endpoint: String,
    api_key: String,
    from: String,
    to: String,
}

impl SendGridNotifier {
    /// Create a new SendGrid notifier from configuration
    pub fn new(config: &NotifyConfig, timeout: Duration) -> Result<Self, WatchError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("SENDGRID_API_KEY").ok())
            .ok_or_else(|| {
                WatchError::NotificationError(
                    "SENDGRID_API_KEY not found in config or environment".to_string(),
                )
            })?;
        let from = config.from.clone().ok_or_else(|| {
            WatchError::NotificationError("notify.from is not configured".to_string())
        })?;
        let to = config.to.clone().ok_or_else(|| {
            WatchError::NotificationError("notify.to is not configured".to_string())
        })?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(SendGridNotifier {
            client,
            timeout,
            endpoint: config.endpoint.clone(),
            api_key,
            from,
            to,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The v3 mail/send request body for `alert`.
    fn payload(&self, alert: &Alert) -> Value {
        json!({
            "personalizations": [
                { "to": [{ "email": self.to }] }
            ],
            "from": { "email": self.from },
            "subject": alert.subject,
            "content": [
                { "type": "text/plain", "value": alert.text }
            ],
            "attachments": [
                {
                    "content": STANDARD.encode(&alert.attachment.content),
                    "filename": alert.attachment.filename,
                    "type": alert.attachment.content_type,
                    "disposition": "attachment"
                }
            ]
        })
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    fn name(&self) -> &str {
        "sendgrid"
    }

    async fn send(&self, alert: &Alert) -> Result<(), WatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.payload(alert))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("{}", body);
            return Err(WatchError::NotificationError(format!(
                "SendGrid responded with {}",
                status
            )));
        }

        info!("Sent '{}' to {}", alert.subject, self.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifiers::Attachment;

    fn test_config() -> NotifyConfig {
        NotifyConfig {
            api_key: Some("test-key".to_string()),
            from: Some("alerts@example.com".to_string()),
            to: Some("me@example.com".to_string()),
            ..NotifyConfig::default()
        }
    }

    #[test]
    fn test_notifier_creation() {
        let notifier = SendGridNotifier::new(&test_config(), Duration::from_secs(30)).unwrap();
        assert_eq!(notifier.name(), "sendgrid");
    }

    #[test]
    fn test_client_uses_configured_timeout() {
        let notifier = SendGridNotifier::new(&test_config(), Duration::from_secs(7)).unwrap();
        assert_eq!(notifier.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_missing_recipient() {
        let config = NotifyConfig {
            to: None,
            ..test_config()
        };
        assert!(matches!(
            SendGridNotifier::new(&config, Duration::from_secs(30)),
            Err(WatchError::NotificationError(_))
        ));
    }

    #[test]
    fn test_payload_encodes_attachment() {
        let notifier = SendGridNotifier::new(&test_config(), Duration::from_secs(30)).unwrap();
        let alert = Alert {
            subject: "Recipe Alert".to_string(),
            text: "Updated Cooking Recipes".to_string(),
            attachment: Attachment {
                filename: "cooking.json".to_string(),
                content_type: "application/json".to_string(),
                content: b"[]".to_vec(),
            },
        };

        let payload = notifier.payload(&alert);
        assert_eq!(payload["personalizations"][0]["to"][0]["email"], "me@example.com");
        assert_eq!(payload["from"]["email"], "alerts@example.com");
        assert_eq!(payload["attachments"][0]["content"], "W10=");
        assert_eq!(payload["attachments"][0]["filename"], "cooking.json");
        assert_eq!(payload["attachments"][0]["disposition"], "attachment");
    }
}
