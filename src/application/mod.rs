pub mod assignment;
pub mod dashboard_stats;
pub mod deals;
pub mod lead_intake;
pub mod snapshot_cache;
pub mod team;
