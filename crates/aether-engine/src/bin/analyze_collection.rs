//! Analyse one collection from the command line and print its theme.
//!
//! Uses the same theme cache file as the API server, so a run here warms
//! the cache the server reads.

use std::path::PathBuf;
use std::sync::Arc;

use aether_engine::{EngineConfig, LookupOptions, ThemeCache};
use aether_store::JsonFileThemeStore;
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "analyze-collection", version, about = "Detect the slideshow theme of an image collection")]
struct CliArgs {
    /// Collection directory; `THEME_COLLECTION_PATH` or `images` when omitted.
    path: Option<PathBuf>,

    /// Images to sample.
    #[arg(long)]
    sample_size: Option<usize>,

    /// Recompute even if the cached theme is current.
    #[arg(long)]
    refresh: bool,
}

impl CliArgs {
    fn options(&self) -> LookupOptions {
        LookupOptions {
            sample_size: self.sample_size,
            force_refresh: self.refresh,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli_args = CliArgs::parse();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("aether=info".parse()?))
        .init();

    let config = EngineConfig::from_env();
    let path = cli_args
        .path
        .clone()
        .unwrap_or_else(|| config.collection_path.clone());

    let store = JsonFileThemeStore::open(&config.cache_file)
        .await
        .with_context(|| format!("opening theme store {}", config.cache_file.display()))?;
    let cache = ThemeCache::with_default_analyzer(Arc::new(store), config);

    let lookup = cache
        .lookup(&path, cli_args.options())
        .await
        .with_context(|| format!("analysing {}", path.display()))?;

    let profile = &lookup.record.profile;
    eprintln!(
        "analyze-collection: {} -> {} ({:.2}){}",
        path.display(),
        profile.theme_name,
        profile.confidence,
        if lookup.cache_hit { " [cached]" } else { "" }
    );
    println!("{}", serde_json::to_string_pretty(&lookup.record)?);
    Ok(())
}
