//! Per-category fetch, build, diff and alert steps.

mod category;

pub use category::Category;

use crate::fetchers::RequestFetcher;
use crate::model::{KnownRecipe, RawRecipeRow, Recipe, RecipeTable};
use crate::notifiers::{Alert, Attachment};
use crate::recipe_builder::build_recipe;
use crate::resolver::ItemResolver;
use crate::WatchError;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info, warn};
use std::collections::HashSet;

/// Result of comparing the live recipe list against the baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// At least one live recipe is missing from the baseline
    Updated {
        /// The full live list, in table order
        recipes: Vec<Recipe>,
        /// Ids not present in the baseline, in table order
        new_ids: Vec<String>,
    },
    /// Every live recipe is already known
    Unchanged,
}

/// Where the live table and the baseline files are fetched from.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub source_url: String,
    pub locale: String,
    pub baseline_url: String,
}

impl Endpoints {
    pub fn recipes_url(&self, category: Category) -> String {
        format!(
            "{}/query.php?a=recipes&type={}&id=1&l={}",
            self.source_url.trim_end_matches('/'),
            category.api_type(),
            self.locale
        )
    }

    pub fn baseline_url(&self, category: Category) -> String {
        format!(
            "{}/{}.json",
            self.baseline_url.trim_end_matches('/'),
            category.file_stem()
        )
    }
}

/// Fetches the baseline and the live table for `category` concurrently, builds
/// every live recipe and diffs the two by id.
///
/// Any transport or JSON error aborts the category.
pub async fn check(
    category: Category,
    endpoints: &Endpoints,
    fetcher: &RequestFetcher,
    resolver: &ItemResolver,
    concurrency: usize,
) -> Result<Outcome, WatchError> {
    let baseline_url = endpoints.baseline_url(category);
    let recipes_url = endpoints.recipes_url(category);

    let (baseline, recipes) = tokio::try_join!(
        fetcher.fetch_json::<Vec<KnownRecipe>>(&baseline_url),
        async {
            let table = fetcher.fetch_json::<RecipeTable>(&recipes_url).await?;
            build_all(table, resolver, concurrency).await
        }
    )?;

    info!(
        "{}: {} known recipes, {} live recipes",
        category,
        baseline.len(),
        recipes.len()
    );

    Ok(diff(&baseline, recipes))
}

/// Builds recipes from the table rows, at most `concurrency` rows at a time.
/// Malformed rows and rows that yield no recipe are skipped; order is kept.
pub async fn build_all(
    table: RecipeTable,
    resolver: &ItemResolver,
    concurrency: usize,
) -> Result<Vec<Recipe>, WatchError> {
    let rows: Vec<RawRecipeRow> = table
        .rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match RawRecipeRow::try_from(value) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!("Skipping row {}: {}", index, e);
                None
            }
        })
        .collect();

    let built: Vec<Option<Recipe>> = stream::iter(rows.iter())
        .map(|row| build_recipe(row, resolver))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let total = built.len();
    let recipes: Vec<Recipe> = built.into_iter().flatten().collect();
    debug!("Built {} of {} rows", recipes.len(), total);

    Ok(recipes)
}

/// Ids of `live` recipes that are not in `baseline`, deduplicated, in order.
pub fn new_recipe_ids(baseline: &[KnownRecipe], live: &[Recipe]) -> Vec<String> {
    let known: HashSet<&str> = baseline.iter().map(|r| r.id.as_str()).collect();
    let mut seen = HashSet::new();

    live.iter()
        .map(|r| r.id.as_str())
        .filter(|id| !known.contains(id) && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

pub fn diff(baseline: &[KnownRecipe], live: Vec<Recipe>) -> Outcome {
    let new_ids = new_recipe_ids(baseline, &live);
    if new_ids.is_empty() {
        Outcome::Unchanged
    } else {
        Outcome::Updated {
            recipes: live,
            new_ids,
        }
    }
}

/// The alert announcing an updated list, with the full list attached as JSON.
pub fn alert_for(
    category: Category,
    recipes: &[Recipe],
    subject: &str,
) -> Result<Alert, WatchError> {
    Ok(Alert {
        subject: subject.to_string(),
        text: format!("Updated {} Recipes", category.label()),
        attachment: Attachment {
            filename: format!("{}.json", category.file_stem()),
            content_type: "application/json".to_string(),
            content: serde_json::to_vec(recipes)?,
        },
    })
}
