use crate::domain::values::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sales rep (or admin) account as far as the dashboard cares about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: Option<String>, roles: Vec<Role>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            roles,
            created_at: Utc::now(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Trimmed, case-insensitive comparison against a display name.
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
