use crate::domain::entities::snapshot::Snapshot;
use crate::domain::error::DomainError;
use crate::domain::values::role::Role;
use async_trait::async_trait;

/// Who is asking for dashboard numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsRequest {
    /// Display name of the requesting rep; `None` means "whole team".
    pub requester_name: Option<String>,
    /// Accepted for forward compatibility, not used in filtering.
    pub requester_role: Role,
}

impl StatsRequest {
    pub fn new(requester_name: Option<String>, requester_role: Role) -> Self {
        let requester_name = requester_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self {
            requester_name,
            requester_role,
        }
    }

    pub fn team() -> Self {
        Self::default()
    }
}

/// Anything that can produce a fresh snapshot: the local aggregation or a
/// remote stats endpoint.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch(&self, request: &StatsRequest) -> Result<Snapshot, DomainError>;
}
