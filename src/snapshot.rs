//! Persistence of the last listing seen for each source.
//!
//! Each source owns one JSON file holding its most recent [`ArticleListing`].
//! Saves replace the whole file through a temporary sibling and a rename, so
//! a crash mid-write leaves the previous snapshot readable.
//!
//! ```text
//! snapshot_dir/
//! ├── mfa_article_links.json
//! ├── escs_article_links.json
//! ├── mil_article_links.json
//! ├── mineconomy_article_links.json
//! └── gov_article_links.json
//! ```

use crate::error::PersistenceError;
use crate::models::{ArticleListing, ArticleRef, Source};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

/// Load/save of the per-source "last seen" listing.
pub trait SnapshotStore {
    /// The stored listing, or an empty one if nothing was saved yet.
    async fn load(&self, source: Source) -> Result<ArticleListing, PersistenceError>;

    /// Replace the stored listing for `source` in full.
    async fn save(&self, source: Source, listing: &[ArticleRef]) -> Result<(), PersistenceError>;
}

/// [`SnapshotStore`] keeping one JSON file per source in a directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, source: Source) -> PathBuf {
        self.dir
            .join(format!("{}_article_links.json", source.key().to_lowercase()))
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl SnapshotStore for FileSnapshotStore {
    #[instrument(level = "debug", skip(self), fields(%source))]
    async fn load(&self, source: Source) -> Result<ArticleListing, PersistenceError> {
        let path = self.path_for(source);
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(PersistenceError::io(path, e)),
        };

        serde_json::from_slice(&raw).map_err(|source| PersistenceError::Corrupt { path, source })
    }

    #[instrument(level = "debug", skip(self, listing), fields(%source, count = listing.len()))]
    async fn save(&self, source: Source, listing: &[ArticleRef]) -> Result<(), PersistenceError> {
        let path = self.path_for(source);
        let tmp = Self::temp_path(&path);
        let json = serde_json::to_vec_pretty(listing).map_err(PersistenceError::Encode)?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PersistenceError::io(&self.dir, e))?;

        let mut file = fs::File::create(&tmp)
            .await
            .map_err(|e| PersistenceError::io(&tmp, e))?;
        file.write_all(&json)
            .await
            .map_err(|e| PersistenceError::io(&tmp, e))?;
        file.sync_all()
            .await
            .map_err(|e| PersistenceError::io(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &path)
            .await
            .map_err(|e| PersistenceError::io(&path, e))?;

        info!(path = %path.display(), "Snapshot saved");
        Ok(())
    }
}
