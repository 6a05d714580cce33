//! Scrapes cooking and alchemy recipes from bdocodex, compares them with the
//! last published lists and sends an alert with the fresh data when new
//! recipes show up.

pub mod builder;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod model;
pub mod notifiers;
pub mod parsing;
pub mod pipelines;
pub mod recipe_builder;
pub mod resolver;

pub use builder::{CategoryReport, RecipeWatcher, RecipeWatcherBuilder};
pub use config::WatchConfig;
pub use error::WatchError;
pub use model::{Item, Mastery, Recipe};
pub use pipelines::{Category, Outcome};

/// Loads configuration, then checks every category and emails any updates.
///
/// Per-category failures are logged and returned in the reports; only
/// configuration problems fail the call.
pub async fn check_for_new_recipes() -> Result<Vec<CategoryReport>, WatchError> {
    let config = WatchConfig::load()?;
    let watcher = RecipeWatcher::from_config(&config)?;
    Ok(watcher.run(&Category::ALL).await)
}
