use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

/// URL prefix under which stored audio is served.
pub const MEDIA_URL_PREFIX: &str = "/media";

/// Local directory holding uploaded voice notes and synthesized replies.
#[derive(Debug, Clone)]
pub struct AudioStorage {
    root: PathBuf,
}

impl AudioStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` to `<root>/<category>/<uuid>.<ext>` and return its public URL.
    pub async fn save(&self, category: &str, data: &[u8], ext: &str) -> std::io::Result<String> {
        let dir = self.root.join(category);
        tokio::fs::create_dir_all(&dir).await?;

        let filename = format!("{}.{}", Uuid::now_v7(), ext);
        let path = dir.join(&filename);
        tokio::fs::write(&path, data).await?;

        debug!("Stored {} bytes at {}", data.len(), path.display());
        Ok(format!("{MEDIA_URL_PREFIX}/{category}/{filename}"))
    }

    /// Map a URL returned by [`AudioStorage::save`] back to its file.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix(MEDIA_URL_PREFIX)?.trim_start_matches('/');
        if relative.split('/').any(|part| part == ".." || part.is_empty()) {
            return None;
        }
        Some(self.root.join(relative))
    }
}
