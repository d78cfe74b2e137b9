//! Local cache of the last fetched offset table.
//!
//! The cache is the fallback when the offset server is unreachable, so it is
//! keyed by game version and never expires on age alone.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::offset::OffsetTable;

/// Cached offset table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetCache {
    /// Game version the table was fetched for
    pub version: String,
    pub table: OffsetTable,
    pub created_at: DateTime<Utc>,
}

impl OffsetCache {
    pub fn new(table: OffsetTable) -> Self {
        Self {
            version: table.version.clone(),
            table,
            created_at: Utc::now(),
        }
    }

    /// Load cache from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!("Offset cache not found or unreadable: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<OffsetCache>(&content) {
            Ok(cache) => {
                debug!(
                    "Loaded offset cache: version={}, created_at={}",
                    cache.version, cache.created_at
                );
                Some(cache)
            }
            Err(e) => {
                warn!("Failed to parse offset cache {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Save cache to a specific path, creating parent directories
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved offset cache to {}", path.display());
        Ok(())
    }

    /// Check if the cached table can serve the given game version
    pub fn is_valid_for(&self, game_version: &str) -> bool {
        if self.version != game_version || self.table.version != game_version {
            debug!(
                "Cache version mismatch: cached={}, current={}",
                self.version, game_version
            );
            return false;
        }

        if let Err(e) = self.table.validate() {
            debug!("Cached offset table is invalid: {}", e);
            return false;
        }

        true
    }
}

/// Try to load a cached table if valid for the given version
pub fn try_load_cached_table<P: AsRef<Path>>(path: P, game_version: &str) -> Option<OffsetTable> {
    let cache = OffsetCache::load_from_path(path)?;

    if cache.is_valid_for(game_version) {
        info!(
            "Using cached offsets (version: {}, cached at {})",
            cache.version, cache.created_at
        );
        Some(cache.table)
    } else {
        None
    }
}

/// Save a table to the cache, logging failures
pub fn save_table_to_cache<P: AsRef<Path>>(path: P, table: &OffsetTable) {
    if let Err(e) = OffsetCache::new(table.clone()).save_to_path(path) {
        warn!("Failed to save offset cache: {}", e);
    }
}
