use crate::domain::entities::user::User;
use crate::domain::error::DomainError;
use crate::domain::ports::user_repository::UserRepository;
use crate::domain::values::role::Role;
use std::sync::Arc;

pub struct TeamUseCase {
    repo: Arc<dyn UserRepository>,
}

impl TeamUseCase {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub fn add(&self, name: String, email: Option<String>, roles: Vec<Role>) -> Result<User, DomainError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("user name must not be empty".into()));
        }
        let user = User::new(name, email, roles);
        self.repo.add_user(&user)?;
        Ok(user)
    }

    pub fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repo.list_users()
    }
}
