use crate::domain::entities::snapshot::CachedSnapshot;
use crate::domain::error::DomainError;

/// Durable home of the single cached dashboard snapshot.
///
/// One key, three operations. A write replaces the previous blob as a whole.
pub trait SnapshotStorage: Send + Sync {
    fn read(&self) -> Result<Option<CachedSnapshot>, DomainError>;
    fn write(&self, cached: &CachedSnapshot) -> Result<(), DomainError>;
    fn clear(&self) -> Result<(), DomainError>;
}
