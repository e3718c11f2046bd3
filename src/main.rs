// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line entry point: run one search request and print its summary.
//!
//! ```text
//! gear-search request.json
//! gear-search request.json --config search.toml --threads 8 --rows 20
//! RUST_LOG=debug gear-search request.json
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use gear_search::config::SearchConfig;
use gear_search::gear::Item;
use gear_search::predicates::FilterSpec;
use gear_search::session::{SearchRequest, SessionRegistry};
use gear_search::stats::{
    BaseStats, BaseStatsEntry, BaseStatsProvider, BaseStatsTable, ReferenceCalculator,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Search six-slot gear builds for stat and set constraints.
#[derive(Parser, Debug)]
#[command(name = "gear-search")]
#[command(version)]
struct Args {
    /// JSON request: items, filter, and base stats or a hero to look up
    request: PathBuf,

    /// Configuration file, layered under GEAR_SEARCH_* variables
    #[arg(short, long, env = "GEAR_SEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the result capacity
    #[arg(long)]
    max_results: Option<usize>,

    /// Override the worker thread count
    #[arg(short, long)]
    threads: Option<usize>,

    /// Print this many captured rows after the summary
    #[arg(long, default_value_t = 0)]
    rows: usize,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Deserialize)]
struct HeroRef {
    name: String,
    stars: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CliRequest {
    items: Vec<Item>,
    filter: FilterSpec,
    predict_reforges: bool,
    base: Option<BaseStats>,
    hero: Option<HeroRef>,
    base_stats: Vec<BaseStatsEntry>,
}

impl CliRequest {
    fn into_search_request(self) -> Result<SearchRequest> {
        let base = match (self.base, &self.hero) {
            (Some(base), _) => base,
            (None, Some(hero)) => {
                let table: BaseStatsTable = self.base_stats.into_iter().collect();
                table.base_stats(&hero.name, hero.stars).with_context(|| {
                    format!("no base stats for {} at {} stars", hero.name, hero.stars)
                })?
            }
            (None, None) => bail!("request needs either \"base\" or \"hero\""),
        };
        Ok(SearchRequest {
            items: self.items,
            filter: self.filter,
            base,
            predict_reforges: self.predict_reforges,
        })
    }
}

#[derive(Debug, Serialize)]
struct Output<'a> {
    execution_id: String,
    summary: &'a gear_search::engine::SearchSummary,
    rows: Vec<gear_search::state::Candidate>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = SearchConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(max_results) = args.max_results {
        config = config.with_max_results(max_results);
    }
    if let Some(threads) = args.threads {
        config = config.with_worker_threads(threads);
    }

    let text = fs::read_to_string(&args.request)
        .with_context(|| format!("failed to read {}", args.request.display()))?;
    let request: CliRequest = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", args.request.display()))?;
    let request = request.into_search_request()?;

    let registry = SessionRegistry::new(config, Arc::new(ReferenceCalculator))?;
    let id = registry.prepare();
    let summary = registry.run(&id, &request)?;

    let output = Output {
        execution_id: id.to_string(),
        summary: &summary,
        rows: registry.rows(&id, 0..args.rows),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    registry.delete(&id);
    Ok(())
}
