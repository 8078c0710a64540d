use crate::domain::entities::snapshot::CachedSnapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::snapshot_storage::SnapshotStorage;
use std::sync::Mutex;

/// Process-local snapshot storage. Nothing survives a restart.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    blob: Mutex<Option<CachedSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(cached: CachedSnapshot) -> Self {
        Self {
            blob: Mutex::new(Some(cached)),
        }
    }
}

impl SnapshotStorage for InMemorySnapshotStore {
    fn read(&self) -> Result<Option<CachedSnapshot>, DomainError> {
        let blob = self
            .blob
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(blob.clone())
    }

    fn write(&self, cached: &CachedSnapshot) -> Result<(), DomainError> {
        let mut blob = self
            .blob
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        *blob = Some(cached.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), DomainError> {
        let mut blob = self
            .blob
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        *blob = None;
        Ok(())
    }
}
