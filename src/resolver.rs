use crate::fetchers::RequestFetcher;
use crate::parsing::{parse_number, substring_between, Fragment};
use crate::WatchError;
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Display data scraped from an item's tooltip page.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetails {
    pub name: String,
    pub grade: u32,
}

/// Looks up item names and grades on the tooltip endpoint.
///
/// Lookups are memoized by `(type, id)` for the lifetime of the resolver, and
/// concurrent lookups of the same key wait on a single request. Failed lookups
/// are not cached.
pub struct ItemResolver {
    fetcher: RequestFetcher,
    base_url: String,
    locale: String,
    cache: Mutex<HashMap<(String, String), Arc<OnceCell<ItemDetails>>>>,
    requests: AtomicUsize,
}

impl ItemResolver {
    pub fn new(fetcher: RequestFetcher, base_url: &str, locale: &str) -> Self {
        ItemResolver {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            locale: locale.to_string(),
            cache: Mutex::new(HashMap::new()),
            requests: AtomicUsize::new(0),
        }
    }

    pub async fn resolve(&self, item_type: &str, id: &str) -> Result<ItemDetails, WatchError> {
        let cell = {
            let mut cache = self.cache.lock().await;
            cache
                .entry((item_type.to_string(), id.to_string()))
                .or_default()
                .clone()
        };

        let details = cell
            .get_or_try_init(|| self.fetch_details(item_type, id))
            .await?;
        Ok(details.clone())
    }

    /// Number of tooltip requests actually sent.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn tip_url(&self, item_type: &str, id: &str) -> String {
        format!(
            "{}/tip.php?id={}--{}&caphrasenhancement=&l={}&nf=on",
            self.base_url, item_type, id, self.locale
        )
    }

    async fn fetch_details(&self, item_type: &str, id: &str) -> Result<ItemDetails, WatchError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let body = self.fetcher.fetch(&self.tip_url(item_type, id)).await?;
        let details = parse_tip(&body)?;
        debug!("Resolved {}--{} as {:?}", item_type, id, details);
        Ok(details)
    }
}

/// Name is the first bold text of the tooltip; grade comes from its
/// `item_grade_<N>` class.
fn parse_tip(body: &str) -> Result<ItemDetails, WatchError> {
    let name = Fragment::parse(body).first_text("b")?.unwrap_or_default();
    let grade = substring_between(body, "item_grade_", " ")
        .map(|grade| parse_number(grade, 0.0))
        .unwrap_or(0.0);

    Ok(ItemDetails {
        name,
        grade: grade as u32,
    })
}
