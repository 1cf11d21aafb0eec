use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use anyhow::{Context, Result};

use super::archive::Archive;
use super::entry::Entry;

/// Writes archive entries out to the filesystem or stdout.
pub struct ZipExtractor<'a> {
    archive: Archive<'a>,
}

impl<'a> ZipExtractor<'a> {
    pub fn new(archive: Archive<'a>) -> Self {
        Self { archive }
    }

    pub fn archive(&self) -> &Archive<'a> {
        &self.archive
    }

    /// List all entries in the archive
    pub fn list_files(&self) -> Result<Vec<Entry<'a>>> {
        let entries = self.archive.entries()?.collect::<crate::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Decoded content of an entry as an owned buffer.
    pub fn extract_to_memory(&self, entry: &Entry<'_>) -> Result<Vec<u8>> {
        let data = entry
            .data()
            .with_context(|| format!("cannot decode {}", entry.name()))?;
        Ok(data.to_vec())
    }

    /// Extract an entry to disk.
    ///
    /// Directory entries become directories. Files get their parent
    /// directories created first and, on Unix hosts, the permission bits the
    /// archive recorded for them.
    pub async fn extract_to_file(&self, entry: &Entry<'_>, output_path: &Path) -> Result<()> {
        if entry.is_directory() {
            fs::create_dir_all(output_path).await?;
            return Ok(());
        }

        // Create parent directories if needed
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let data = entry
            .data()
            .with_context(|| format!("cannot decode {}", entry.name()))?;

        let mut file = fs::File::create(output_path).await?;
        file.write_all(data).await?;
        file.flush().await?;

        #[cfg(unix)]
        if let Some(mode) = entry.mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(output_path, std::fs::Permissions::from_mode(mode)).await?;
        }

        Ok(())
    }

    /// Extract an entry to stdout
    pub async fn extract_to_stdout(&self, entry: &Entry<'_>) -> Result<()> {
        let data = entry
            .data()
            .with_context(|| format!("cannot decode {}", entry.name()))?;

        let mut stdout = tokio::io::stdout();
        stdout.write_all(data).await?;
        stdout.flush().await?;

        Ok(())
    }
}
