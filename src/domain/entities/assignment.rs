use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ownership link between a lead and a sales rep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub lead_id: String,
    pub user_id: String,
    pub assigned_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(lead_id: String, user_id: String) -> Self {
        Self {
            lead_id,
            user_id,
            assigned_at: Utc::now(),
        }
    }
}
