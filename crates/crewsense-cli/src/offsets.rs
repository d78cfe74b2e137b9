//! Offset table acquisition.
//!
//! Sources, in order: an explicit file; a download for the game version
//! (refreshing the local cache); the local cache for the game version.

use std::path::PathBuf;

use anyhow::{Context, Result};
use crewsense::OffsetTable;
use crewsense::offset::{fetch_offset_table_with_cache, load_offset_table, try_load_cached_table};
use tracing::{debug, info};

#[derive(clap::Args, Debug, Clone, Default)]
pub struct OffsetArgs {
    /// Offset table JSON file
    #[arg(short, long, env = "CREWSENSE_OFFSETS")]
    pub offsets: Option<PathBuf>,

    /// Base URL serving `{version}.json` offset tables
    #[arg(long, env = "CREWSENSE_OFFSETS_URL")]
    pub offsets_url: Option<String>,

    /// Game version used to pick the downloaded or cached table
    #[arg(long, env = "CREWSENSE_GAME_VERSION")]
    pub game_version: Option<String>,
}

fn cache_path() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir().context("Failed to determine cache directory")?;
    Ok(cache_dir.join("crewsense").join("offsets-cache.json"))
}

/// Load the offset table from the first available source
pub fn acquire(args: &OffsetArgs) -> Result<OffsetTable> {
    if let Some(path) = &args.offsets {
        let table = load_offset_table(path)
            .with_context(|| format!("Failed to load offsets from {}", path.display()))?;
        info!("Loaded offsets {} from {}", table.version, path.display());
        return Ok(table);
    }

    let version = args
        .game_version
        .as_deref()
        .context("No offset table: pass --offsets <file>, or --game-version to use a downloaded one")?;
    let cache = cache_path()?;
    debug!("Offset cache: {}", cache.display());

    match &args.offsets_url {
        Some(url) => fetch_offset_table_with_cache(url, version, &cache)
            .with_context(|| format!("No offsets available for game version {}", version)),
        None => try_load_cached_table(&cache, version).with_context(|| {
            format!(
                "No cached offsets for game version {}; pass --offsets-url to download them",
                version
            )
        }),
    }
}
