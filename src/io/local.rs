use anyhow::{Context, Result};
use std::path::Path;

/// Load a whole archive file into memory.
///
/// The decoder works on a fully buffered archive, so the file is read in one
/// go rather than through positioned reads.
pub async fn read_archive(path: &Path) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot open {}", path.display()))?;
    log::debug!("loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}
