//! Target list loading.

use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::ReconError;

/// Read the ordered list of targets from a line-delimited file.
///
/// Lines are whitespace-trimmed; blank lines and `#` comments are skipped.
/// No deduplication and no syntax validation happen here: a malformed target
/// simply fails its own fetch later.
pub async fn load_targets(path: &Path) -> Result<Vec<String>, ReconError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ReconError::InputRead {
            path: path.to_path_buf(),
            source,
        })?;

    let targets: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    debug!("loaded {} targets from {}", targets.len(), path.display());
    Ok(targets)
}
