use crate::domain::entities::deal::Deal;
use crate::domain::error::DomainError;
use crate::domain::ports::deal_repository::DealRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::domain::ports::Page;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

pub struct DealUseCase {
    deals: Arc<dyn DealRepository>,
    users: Arc<dyn UserRepository>,
}

impl DealUseCase {
    pub fn new(deals: Arc<dyn DealRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { deals, users }
    }

    pub fn add(
        &self,
        title: String,
        setter_id: Option<String>,
        closer_id: Option<String>,
        consultation_at: Option<DateTime<Utc>>,
    ) -> Result<Deal, DomainError> {
        for id in [&setter_id, &closer_id].into_iter().flatten() {
            if self.users.get_user(id)?.is_none() {
                return Err(DomainError::NotFound(format!("User not found: {id}")));
            }
        }
        let deal = Deal::new(title, setter_id, closer_id, consultation_at);
        self.deals.add_deal(&deal)?;
        Ok(deal)
    }

    pub fn mark_won(&self, id: &str, won_since: NaiveDate) -> Result<Deal, DomainError> {
        let mut deal = self
            .deals
            .get_deal(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Deal not found: {id}")))?;
        deal.mark_won(won_since);
        self.deals.update_deal(&deal)?;
        Ok(deal)
    }

    pub fn list(&self, limit: usize) -> Result<Vec<Deal>, DomainError> {
        self.deals.list_deals(Page::first(limit))
    }
}
