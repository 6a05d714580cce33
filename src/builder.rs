use std::time::Duration;

use log::{error, info};

use crate::config::WatchConfig;
use crate::fetchers::RequestFetcher;
use crate::notifiers::{Notifier, SendGridNotifier};
use crate::pipelines::{self, Category, Endpoints, Outcome};
use crate::resolver::ItemResolver;
use crate::WatchError;

/// How one category fared during a run
#[derive(Debug)]
pub struct CategoryReport {
    pub category: Category,
    pub result: Result<Outcome, WatchError>,
}

/// Checks recipe categories for new entries and sends alerts
pub struct RecipeWatcher {
    fetcher: RequestFetcher,
    endpoints: Endpoints,
    concurrency: usize,
    subject: String,
    notifier: Box<dyn Notifier>,
}

impl RecipeWatcher {
    /// Creates a new builder for a watcher
    ///
    /// # Example
    /// ```
    /// use bdo_recipe_watch::RecipeWatcher;
    ///
    /// let builder = RecipeWatcher::builder();
    /// ```
    pub fn builder() -> RecipeWatcherBuilder {
        RecipeWatcherBuilder::default()
    }

    /// A builder with every setting taken from `config`; only the notifier is left to set
    pub fn builder_from_config(config: &WatchConfig) -> RecipeWatcherBuilder {
        Self::builder()
            .source_url(&config.source.base_url)
            .locale(&config.source.locale)
            .baseline_url(&config.baseline.base_url)
            .concurrency(config.concurrency)
            .timeout(Duration::from_secs(config.timeout))
            .subject(&config.notify.subject)
    }

    /// Wires a watcher from configuration, alerting through SendGrid
    pub fn from_config(config: &WatchConfig) -> Result<Self, WatchError> {
        let notifier =
            SendGridNotifier::new(&config.notify, Duration::from_secs(config.timeout))?;
        Self::builder_from_config(config)
            .notifier(Box::new(notifier))
            .build()
    }

    pub fn notifier_name(&self) -> &str {
        self.notifier.name()
    }

    /// A resolver with an empty item cache
    pub fn resolver(&self) -> ItemResolver {
        ItemResolver::new(
            self.fetcher.clone(),
            &self.endpoints.source_url,
            &self.endpoints.locale,
        )
    }

    /// Fetches, builds and diffs one category without alerting
    pub async fn check(
        &self,
        category: Category,
        resolver: &ItemResolver,
    ) -> Result<Outcome, WatchError> {
        pipelines::check(
            category,
            &self.endpoints,
            &self.fetcher,
            resolver,
            self.concurrency,
        )
        .await
    }

    /// Checks one category and sends an alert if it has new recipes
    pub async fn run_category(
        &self,
        category: Category,
        resolver: &ItemResolver,
    ) -> Result<Outcome, WatchError> {
        let outcome = self.check(category, resolver).await?;

        match &outcome {
            Outcome::Updated { recipes, new_ids } => {
                info!(
                    "{}: {} new recipes ({})",
                    category,
                    new_ids.len(),
                    new_ids.join(", ")
                );
                let alert = pipelines::alert_for(category, recipes, &self.subject)?;
                self.notifier.send(&alert).await?;
                info!("{}: alert sent via {}", category, self.notifier.name());
            }
            Outcome::Unchanged => info!("{}: no new recipes", category),
        }

        Ok(outcome)
    }

    /// Runs each category in turn. A failing category is logged and reported
    /// without stopping the ones after it.
    ///
    /// Item lookups are cached for the duration of this call only.
    pub async fn run(&self, categories: &[Category]) -> Vec<CategoryReport> {
        let resolver = self.resolver();
        let mut reports = Vec::with_capacity(categories.len());

        for &category in categories {
            let result = self.run_category(category, &resolver).await;
            if let Err(e) = &result {
                error!("{}: {}", category, e);
            }
            reports.push(CategoryReport { category, result });
        }

        info!("Resolved items with {} requests", resolver.request_count());
        reports
    }
}

/// Builder for configuring a [`RecipeWatcher`]
#[derive(Default)]
pub struct RecipeWatcherBuilder {
    source_url: Option<String>,
    locale: Option<String>,
    baseline_url: Option<String>,
    concurrency: Option<usize>,
    timeout: Option<Duration>,
    subject: Option<String>,
    notifier: Option<Box<dyn Notifier>>,
}

impl RecipeWatcherBuilder {
    /// Base URL of the recipe database (defaults to https://bdocodex.com)
    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Directory URL of the published `cooking.json` / `alchemy.json`
    pub fn baseline_url(mut self, url: impl Into<String>) -> Self {
        self.baseline_url = Some(url.into());
        self
    }

    /// Maximum number of recipe rows built at once
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit);
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Where alerts go
    ///
    /// # Example
    /// ```
    /// use bdo_recipe_watch::notifiers::FileNotifier;
    /// use bdo_recipe_watch::RecipeWatcher;
    ///
    /// let watcher = RecipeWatcher::builder()
    ///     .notifier(Box::new(FileNotifier::new("out")))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(watcher.notifier_name(), "file");
    /// ```
    pub fn notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the watcher
    ///
    /// # Errors
    /// Returns `WatchError::BuilderError` if no notifier was set or the
    /// concurrency limit is zero, and `WatchError::FetchError` if the HTTP
    /// client can't be created.
    pub fn build(self) -> Result<RecipeWatcher, WatchError> {
        let notifier = self.notifier.ok_or_else(|| {
            WatchError::BuilderError("No notifier specified. Use .notifier()".to_string())
        })?;

        let defaults = WatchConfig::default();
        let concurrency = self.concurrency.unwrap_or(defaults.concurrency);
        if concurrency == 0 {
            return Err(WatchError::BuilderError(
                "Concurrency must be at least 1".to_string(),
            ));
        }

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(defaults.timeout));

        Ok(RecipeWatcher {
            fetcher: RequestFetcher::new(Some(timeout))?,
            endpoints: Endpoints {
                source_url: self.source_url.unwrap_or(defaults.source.base_url),
                locale: self.locale.unwrap_or(defaults.source.locale),
                baseline_url: self.baseline_url.unwrap_or(defaults.baseline.base_url),
            },
            concurrency,
            subject: self.subject.unwrap_or(defaults.notify.subject),
            notifier,
        })
    }
}
