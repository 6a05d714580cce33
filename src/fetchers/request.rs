use crate::WatchError;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, WatchError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; BdoRecipeWatch/1.0)")
            .build()?;

        Ok(Self { client })
    }

    /// GETs `url` and returns the body, failing on non-success statuses.
    pub async fn fetch(&self, url: &str) -> Result<String, WatchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        Ok(body)
    }

    /// GETs `url` and parses the body as JSON. Surrounding whitespace is ignored,
    /// the recipe endpoint pads its output.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, WatchError> {
        let body = self.fetch(url).await?;
        Ok(serde_json::from_str(body.trim())?)
    }
}
