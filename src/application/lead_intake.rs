use crate::domain::entities::lead::Lead;
use crate::domain::error::DomainError;
use crate::domain::ports::lead_repository::LeadRepository;
use crate::domain::values::outcome::Outcome;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

pub struct LeadIntakeUseCase {
    repo: Arc<dyn LeadRepository>,
}

impl LeadIntakeUseCase {
    pub fn new(repo: Arc<dyn LeadRepository>) -> Self {
        Self { repo }
    }

    pub fn add(
        &self,
        name: String,
        email: Option<String>,
        phone: Option<String>,
        source: Option<String>,
    ) -> Result<Lead, DomainError> {
        if name.trim().is_empty() && email.is_none() && phone.is_none() {
            return Err(DomainError::InvalidInput(
                "a lead needs a name, an email or a phone number".into(),
            ));
        }
        let lead = Lead::new(name.trim().to_string(), email, phone, source);
        self.repo.add_lead(&lead)?;
        info!(lead_id = %lead.id, "lead added");
        Ok(lead)
    }

    /// Mark a lead as contacted. `outcome` must come from the fixed
    /// vocabulary; `None` records a contact without a result.
    pub fn record_contact(
        &self,
        lead_id: &str,
        outcome: Option<&str>,
        contact_date: NaiveDate,
    ) -> Result<Lead, DomainError> {
        let outcome = outcome
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| o.parse::<Outcome>().map_err(DomainError::InvalidInput))
            .transpose()?;
        if outcome == Some(Outcome::NoOutcome) {
            return Err(DomainError::InvalidInput(
                "'Kein Ergebnis' is derived, leave the outcome empty instead".into(),
            ));
        }

        let mut lead = self
            .repo
            .get_lead(lead_id)?
            .ok_or_else(|| DomainError::NotFound(format!("Lead not found: {lead_id}")))?;
        lead.record_contact(outcome, contact_date);
        self.repo.update_contact(&lead)?;
        Ok(lead)
    }
}
