//! Snapshot storage backed by a single JSON file.
//!
//! Writes go to a sibling temp file that is then renamed over the target, so
//! readers see either the previous blob or the new one.

use crate::domain::entities::snapshot::CachedSnapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::snapshot_storage::SnapshotStorage;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStorage for JsonFileSnapshotStore {
    fn read(&self) -> Result<Option<CachedSnapshot>, DomainError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DomainError::Database(format!("read {}: {e}", self.path.display()))),
        };
        match serde_json::from_str(&raw) {
            Ok(cached) => Ok(Some(cached)),
            Err(e) => {
                // A blob from an older layout is as good as no blob.
                warn!(path = %self.path.display(), error = %e, "unreadable snapshot cache file ignored");
                Ok(None)
            }
        }
    }

    fn write(&self, cached: &CachedSnapshot) -> Result<(), DomainError> {
        let json = serde_json::to_vec(cached).map_err(|e| DomainError::Parse(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| DomainError::Database(format!("create {}: {e}", parent.display())))?;
        }

        let tmp = self.tmp_path();
        let write_tmp = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()
        };
        write_tmp().map_err(|e| DomainError::Database(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| DomainError::Database(format!("rename to {}: {e}", self.path.display())))
    }

    fn clear(&self) -> Result<(), DomainError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Database(format!("remove {}: {e}", self.path.display()))),
        }
    }
}
