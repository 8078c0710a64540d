use chrono::{DateTime, Utc};

/// Source of "now". Everything time-relative in the dashboard goes through this.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
