pub mod assignment_repository;
pub mod clock;
pub mod deal_repository;
pub mod lead_repository;
pub mod snapshot_storage;
pub mod stats_source;
pub mod user_repository;

/// Offset window for bulk reads. A page shorter than `limit` is the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }

    pub fn next(self) -> Self {
        Self {
            offset: self.offset + self.limit,
            limit: self.limit,
        }
    }
}
