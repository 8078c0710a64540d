use crate::domain::entities::assignment::Assignment;
use crate::domain::error::DomainError;
use crate::domain::ports::assignment_repository::AssignmentRepository;
use crate::domain::ports::lead_repository::LeadRepository;
use crate::domain::ports::user_repository::UserRepository;
use std::sync::Arc;
use tracing::debug;

pub struct AssignmentUseCase {
    assignments: Arc<dyn AssignmentRepository>,
    leads: Arc<dyn LeadRepository>,
    users: Arc<dyn UserRepository>,
}

impl AssignmentUseCase {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        leads: Arc<dyn LeadRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            assignments,
            leads,
            users,
        }
    }

    /// Give a lead to a rep. Assigning the same pair twice is a no-op.
    pub fn assign(&self, lead_id: &str, user_id: &str) -> Result<Assignment, DomainError> {
        if self.leads.get_lead(lead_id)?.is_none() {
            return Err(DomainError::NotFound(format!("Lead not found: {lead_id}")));
        }
        if self.users.get_user(user_id)?.is_none() {
            return Err(DomainError::NotFound(format!("User not found: {user_id}")));
        }
        let assignment = Assignment::new(lead_id.to_string(), user_id.to_string());
        if !self.assignments.assign(&assignment)? {
            debug!(lead_id, user_id, "assignment already present");
        }
        Ok(assignment)
    }

    pub fn unassign(&self, lead_id: &str, user_id: &str) -> Result<(), DomainError> {
        if !self.assignments.unassign(lead_id, user_id)? {
            return Err(DomainError::NotFound(format!(
                "Lead {lead_id} is not assigned to {user_id}"
            )));
        }
        Ok(())
    }
}
