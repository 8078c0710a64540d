use crate::domain::entities::assignment::Assignment;
use crate::domain::error::DomainError;
use crate::domain::ports::Page;

pub trait AssignmentRepository: Send + Sync {
    /// Returns `false` when the pair already existed.
    fn assign(&self, assignment: &Assignment) -> Result<bool, DomainError>;
    /// Returns `false` when there was nothing to remove.
    fn unassign(&self, lead_id: &str, user_id: &str) -> Result<bool, DomainError>;
    fn list_assignments(&self, page: Page) -> Result<Vec<Assignment>, DomainError>;
}
