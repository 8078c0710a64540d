//! Time-boxed cache in front of a [`StatsSource`].
//!
//! Holds exactly one snapshot for the whole dashboard, persisted through a
//! [`SnapshotStorage`] so it survives restarts. Nothing here ever returns an
//! error to the caller: failed fetches fall back to whatever was cached last,
//! even if it is stale.

use crate::domain::entities::snapshot::{CachedSnapshot, Snapshot};
use crate::domain::ports::clock::Clock;
use crate::domain::ports::snapshot_storage::SnapshotStorage;
use crate::domain::ports::stats_source::{StatsRequest, StatsSource};
use chrono::Duration;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub fn freshness_window() -> Duration {
    Duration::minutes(5)
}

#[derive(Clone)]
pub struct SnapshotCache {
    source: Arc<dyn StatsSource>,
    storage: Arc<dyn SnapshotStorage>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    current: Arc<Mutex<Option<CachedSnapshot>>>,
}

impl SnapshotCache {
    pub fn new(
        source: Arc<dyn StatsSource>,
        storage: Arc<dyn SnapshotStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_ttl(source, storage, clock, freshness_window())
    }

    /// Build the cache and adopt the persisted snapshot if it is still fresh.
    pub fn with_ttl(
        source: Arc<dyn StatsSource>,
        storage: Arc<dyn SnapshotStorage>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        let now = clock.now();
        let current = match storage.read() {
            Ok(Some(cached)) if cached.is_fresh(now, ttl) => Some(cached),
            Ok(Some(_)) => {
                debug!("persisted snapshot expired, not loaded");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "could not read persisted snapshot");
                None
            }
        };

        Self {
            source,
            storage,
            clock,
            ttl,
            current: Arc::new(Mutex::new(current)),
        }
    }

    /// The snapshot currently held in memory, fresh or not.
    pub fn cached(&self) -> Option<CachedSnapshot> {
        self.slot().clone()
    }

    /// Serve the cached snapshot while it is fresh, otherwise fetch a new one.
    ///
    /// With `force_refresh` the cache is bypassed for reading but still
    /// updated. Returns `None` only when the fetch failed and nothing was
    /// ever cached.
    pub async fn get(&self, request: &StatsRequest, force_refresh: bool) -> Option<Snapshot> {
        if !force_refresh {
            if let Some(snapshot) = self.fresh() {
                return Some(snapshot);
            }
        }

        match self.source.fetch(request).await {
            Ok(snapshot) => {
                self.store(snapshot.clone());
                Some(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "dashboard fetch failed, serving last known snapshot");
                self.last_known()
            }
        }
    }

    /// Recompute without making the caller wait. On failure the existing
    /// cache stays as it is. Overlapping refreshes are last-write-wins.
    pub fn refresh_in_background(&self, request: StatsRequest) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            match cache.source.fetch(&request).await {
                Ok(snapshot) => {
                    cache.store(snapshot);
                    debug!("background dashboard refresh stored");
                }
                Err(e) => warn!(error = %e, "background dashboard refresh failed"),
            }
        })
    }

    pub fn invalidate(&self) {
        *self.slot() = None;
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "could not clear persisted snapshot");
        }
        info!("dashboard snapshot cache invalidated");
    }

    fn fresh(&self) -> Option<Snapshot> {
        let now = self.clock.now();
        self.slot()
            .as_ref()
            .filter(|cached| cached.is_fresh(now, self.ttl))
            .map(|cached| cached.snapshot.clone())
    }

    /// In-memory copy first, then whatever is still on disk.
    fn last_known(&self) -> Option<Snapshot> {
        if let Some(cached) = self.slot().as_ref() {
            return Some(cached.snapshot.clone());
        }
        match self.storage.read() {
            Ok(persisted) => persisted.map(|cached| cached.snapshot),
            Err(e) => {
                warn!(error = %e, "could not read persisted snapshot");
                None
            }
        }
    }

    fn store(&self, snapshot: Snapshot) {
        let cached = CachedSnapshot::new(snapshot, self.clock.now());
        if let Err(e) = self.storage.write(&cached) {
            warn!(error = %e, "could not persist dashboard snapshot");
        }
        *self.slot() = Some(cached);
    }

    fn slot(&self) -> MutexGuard<'_, Option<CachedSnapshot>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
