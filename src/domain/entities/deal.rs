use crate::domain::values::deal_status::DealStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A "hot lead": a prospect that made it into the sales pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub title: String,
    pub status: DealStatus,
    pub setter_id: Option<String>,
    pub closer_id: Option<String>,
    pub won_since: Option<NaiveDate>,
    pub consultation_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Deal {
    pub fn new(
        title: String,
        setter_id: Option<String>,
        closer_id: Option<String>,
        consultation_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            status: DealStatus::InProgress,
            setter_id,
            closer_id,
            won_since: None,
            consultation_at,
            created_at: Utc::now(),
        }
    }

    pub fn mark_won(&mut self, won_since: NaiveDate) {
        self.status = DealStatus::Won;
        self.won_since = Some(won_since);
    }

    pub fn is_won(&self) -> bool {
        self.status == DealStatus::Won
    }

    pub fn involves_any(&self, user_ids: &[&str]) -> bool {
        [self.setter_id.as_deref(), self.closer_id.as_deref()]
            .into_iter()
            .flatten()
            .any(|id| user_ids.contains(&id))
    }
}
