use crate::domain::entities::lead::Lead;
use crate::domain::error::DomainError;
use crate::domain::ports::Page;

pub trait LeadRepository: Send + Sync {
    fn add_lead(&self, lead: &Lead) -> Result<(), DomainError>;
    fn get_lead(&self, id: &str) -> Result<Option<Lead>, DomainError>;
    /// Persist contact state (`contacted`, `outcome`, `contact_date`) of an existing lead.
    fn update_contact(&self, lead: &Lead) -> Result<(), DomainError>;
    fn list_leads(&self, page: Page) -> Result<Vec<Lead>, DomainError>;
}
