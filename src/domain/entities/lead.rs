use crate::domain::values::outcome::Outcome;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub contacted: bool,
    /// Raw outcome label as stored. Older rows may carry labels outside the
    /// current vocabulary, so this is not an `Outcome`.
    pub outcome: Option<String>,
    pub contact_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    pub fn new(
        name: String,
        email: Option<String>,
        phone: Option<String>,
        source: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            phone,
            source,
            contacted: false,
            outcome: None,
            contact_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn record_contact(&mut self, outcome: Option<Outcome>, contact_date: NaiveDate) {
        self.contacted = true;
        self.outcome = outcome.map(|o| o.label().to_string());
        self.contact_date = Some(contact_date);
    }

    pub fn classified_outcome(&self) -> Option<Outcome> {
        Outcome::classify(self.outcome.as_deref())
    }

    pub fn is_consultation(&self) -> bool {
        self.classified_outcome() == Some(Outcome::Consultation)
    }
}
