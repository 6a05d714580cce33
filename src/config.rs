use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main watcher configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct WatchConfig {
    /// Where live recipe data is scraped from
    #[serde(default)]
    pub source: SourceConfig,
    /// Where the last published recipe lists live
    #[serde(default)]
    pub baseline: BaselineConfig,
    /// Email alert settings
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Maximum number of recipe rows built at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            baseline: BaselineConfig::default(),
            notify: NotifyConfig::default(),
            concurrency: default_concurrency(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Base URL of the recipe database site
    #[serde(default = "default_source_url")]
    pub base_url: String,
    /// Language code passed as `l=` to every endpoint
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_source_url(),
            locale: default_locale(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BaselineConfig {
    /// Directory URL holding `cooking.json` and `alchemy.json`
    #[serde(default = "default_baseline_url")]
    pub base_url: String,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            base_url: default_baseline_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotifyConfig {
    /// SendGrid mail send endpoint
    #[serde(default = "default_notify_endpoint")]
    pub endpoint: String,
    /// API key (can also be set via SENDGRID_API_KEY)
    pub api_key: Option<String>,
    /// Verified sender address
    pub from: Option<String>,
    /// Recipient address
    pub to: Option<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            endpoint: default_notify_endpoint(),
            api_key: None,
            from: None,
            to: None,
            subject: default_subject(),
        }
    }
}

// Default value functions
fn default_source_url() -> String {
    "https://bdocodex.com".to_string()
}

fn default_locale() -> String {
    "us".to_string()
}

fn default_baseline_url() -> String {
    "https://raw.githubusercontent.com/alancuriel/bdo-recipes/main".to_string()
}

fn default_notify_endpoint() -> String {
    "https://api.sendgrid.com/v3/mail/send".to_string()
}

fn default_subject() -> String {
    "Recipe Alert".to_string()
}

fn default_concurrency() -> usize {
    8
}

fn default_timeout() -> u64 {
    30
}

impl WatchConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_WATCH__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_WATCH__NOTIFY__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`WatchConfig::load`] for precedence.
pub fn load_config() -> Result<WatchConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_WATCH__SOURCE__BASE_URL
        .add_source(
            Environment::with_prefix("RECIPE_WATCH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
