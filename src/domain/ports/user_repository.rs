use crate::domain::entities::user::User;
use crate::domain::error::DomainError;

pub trait UserRepository: Send + Sync {
    fn add_user(&self, user: &User) -> Result<(), DomainError>;
    fn get_user(&self, id: &str) -> Result<Option<User>, DomainError>;
    fn list_users(&self) -> Result<Vec<User>, DomainError>;
}
