use bdo_recipe_watch::notifiers::FileNotifier;
use bdo_recipe_watch::{Category, RecipeWatcher, WatchConfig};
use log::info;
use std::env;

const USAGE: &str = "Usage: bdo-recipe-watch [cooking|alchemy ...] [--output-dir DIR]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut categories = Vec::new();
    let mut output_dir = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--output-dir" => {
                output_dir = Some(args.next().ok_or(USAGE)?);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            other => categories.push(other.parse::<Category>()?),
        }
    }

    if categories.is_empty() {
        categories = Category::ALL.to_vec();
    }

    let config = WatchConfig::load()?;
    let watcher = match output_dir {
        // Write the lists locally instead of emailing them
        Some(dir) => RecipeWatcher::builder_from_config(&config)
            .notifier(Box::new(FileNotifier::new(dir)))
            .build()?,
        None => RecipeWatcher::from_config(&config)?,
    };

    let reports = watcher.run(&categories).await;
    let failed = reports.iter().filter(|r| r.result.is_err()).count();
    info!("Done: {} categories checked, {} failed", reports.len(), failed);

    Ok(())
}
