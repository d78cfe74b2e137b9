//! Fetching offset tables from an offset server.
//!
//! Tables are published per game version as `{base_url}/{version}.json`.

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::offset::{OffsetTable, parse_offset_table, save_table_to_cache, try_load_cached_table};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub fn offsets_url(base_url: &str, version: &str) -> String {
    format!("{}/{}.json", base_url.trim_end_matches('/'), version)
}

/// Download and validate the table for `version`
pub fn fetch_offset_table(base_url: &str, version: &str) -> Result<OffsetTable> {
    let url = offsets_url(base_url, version);
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(FETCH_TIMEOUT))
        .build();
    let agent: ureq::Agent = config.into();

    let mut response = agent.get(&url).call()?;
    let content = response.body_mut().read_to_string()?;
    let table = parse_offset_table(&content)?;

    if table.version != version {
        return Err(Error::OffsetVersionMismatch {
            expected: version.to_string(),
            actual: table.version,
        });
    }

    info!("Fetched offsets for {} from {}", version, url);
    Ok(table)
}

/// Fetch the table for `version`, refreshing the cache on success and
/// falling back to it on failure
pub fn fetch_offset_table_with_cache<P: AsRef<Path>>(
    base_url: &str,
    version: &str,
    cache_path: P,
) -> Result<OffsetTable> {
    match fetch_offset_table(base_url, version) {
        Ok(table) => {
            save_table_to_cache(&cache_path, &table);
            Ok(table)
        }
        Err(e) => {
            warn!("Failed to fetch offsets for {} ({}), trying cache", version, e);
            try_load_cached_table(&cache_path, version).ok_or(e)
        }
    }
}
