use crate::domain::entities::deal::Deal;
use crate::domain::error::DomainError;
use crate::domain::ports::Page;

pub trait DealRepository: Send + Sync {
    fn add_deal(&self, deal: &Deal) -> Result<(), DomainError>;
    fn get_deal(&self, id: &str) -> Result<Option<Deal>, DomainError>;
    fn update_deal(&self, deal: &Deal) -> Result<(), DomainError>;
    fn list_deals(&self, page: Page) -> Result<Vec<Deal>, DomainError>;
}
