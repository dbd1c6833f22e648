use std::env;

use anyhow::Result;
use recipe_viewer::cache::SnapshotCache;
use recipe_viewer::config::AppConfig;
use recipe_viewer::errors::error_logging::{log_config_error, log_internal_error};
use recipe_viewer::filter::{self, FilterContext};
use recipe_viewer::ingredient_parser::IngredientParser;
use recipe_viewer::models::{CategorySelection, StoreSelection};
use recipe_viewer::observability;
use recipe_viewer::resolver::{diagnose, resolve_recipe};
use recipe_viewer::search::SearchRanker;
use recipe_viewer::snapshot::Snapshot;
use recipe_viewer::sources::{FileFetcher, HttpFetcher};
use serde_json::json;
use tracing::info;

/// Command line options
#[derive(Debug, Default)]
struct CliArgs {
    store: Option<String>,
    category: Option<String>,
    diagnose: Option<String>,
    local_dir: Option<String>,
    keyword: Vec<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| anyhow::anyhow!("{} requires a value", flag))
        };
        match arg.as_str() {
            "--store" => cli.store = Some(value("--store")?),
            "--category" => cli.category = Some(value("--category")?),
            "--diagnose" => cli.diagnose = Some(value("--diagnose")?),
            "--local" => cli.local_dir = Some(value("--local")?),
            _ => cli.keyword.push(arg),
        }
    }
    Ok(cli)
}

fn render_results(snapshot: &Snapshot, context: &FilterContext, ranker: &SearchRanker) -> serde_json::Value {
    let results = filter::apply(&snapshot.recipes, context, ranker);
    let recipes: Vec<serde_json::Value> = results
        .iter()
        .map(|scored| {
            json!({
                "recipe": scored.recipe,
                "score": scored.score,
                "ingredients": resolve_recipe(scored.recipe, &snapshot.master_index),
            })
        })
        .collect();

    json!({
        "count": recipes.len(),
        "store_options": filter::store_options(&snapshot.recipes),
        "category_options": filter::category_options(&snapshot.recipes),
        "sources": snapshot.statuses,
        "results": recipes,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    if let Err(e) = config.validate() {
        log_config_error(&e, "app", "startup validation");
        return Err(e.into());
    }

    let metrics_handle = observability::init_observability_with_config(&config.observability)?;
    info!("{}", config.summary());

    let cli = parse_args(env::args().skip(1))?;
    let parser = IngredientParser::with_config(config.parser.clone());
    let ranker = SearchRanker::with_config(config.search.clone());
    let cache = SnapshotCache::new(config.cache.snapshot_ttl());

    let snapshot = match &cli.local_dir {
        Some(dir) => {
            cache
                .get_or_refresh(&FileFetcher::with_base_dir(dir), &config.sources, &parser)
                .await
        }
        None => {
            let fetcher = HttpFetcher::new(config.cache.http_timeout())?;
            cache.get_or_refresh(&fetcher, &config.sources, &parser).await
        }
    };

    let output = match &cli.diagnose {
        Some(word) => json!({
            "catalogue_size": snapshot.master_index.len(),
            "catalogue_preview": snapshot.catalogue_preview(),
            "diagnosis": diagnose(word, &snapshot.master_index),
        }),
        None => {
            let context = FilterContext::new()
                .with_store(StoreSelection::from_label(cli.store.as_deref().unwrap_or_default()))
                .with_category(CategorySelection::from_label(
                    cli.category.as_deref().unwrap_or_default(),
                ))
                .with_keyword(cli.keyword.join(" "));
            render_results(&snapshot, &context, &ranker)
        }
    };

    let rendered = serde_json::to_string_pretty(&output).map_err(|e| {
        log_internal_error(&e, "cli", "render output");
        e
    })?;
    println!("{}", rendered);

    if let Some(handle) = metrics_handle {
        tracing::debug!(metrics = %handle.render(), "Metrics at exit");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let cli = parse_args(args(&["--store", "渋谷店", "chicken", "curry"])).unwrap();
        assert_eq!(cli.store.as_deref(), Some("渋谷店"));
        assert_eq!(cli.keyword, vec!["chicken", "curry"]);
    }

    #[test]
    fn test_parse_args_missing_value() {
        assert!(parse_args(args(&["--category"])).is_err());
    }
}
