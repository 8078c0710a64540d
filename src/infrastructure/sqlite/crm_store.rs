use crate::domain::entities::assignment::Assignment;
use crate::domain::entities::deal::Deal;
use crate::domain::entities::lead::Lead;
use crate::domain::entities::user::User;
use crate::domain::error::DomainError;
use crate::domain::ports::assignment_repository::AssignmentRepository;
use crate::domain::ports::deal_repository::DealRepository;
use crate::domain::ports::lead_repository::LeadRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::domain::ports::Page;
use crate::domain::values::deal_status::DealStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

const USER_COLS: &str = "id, name, email, roles, created_at";
const LEAD_COLS: &str = "id, name, email, phone, source, contacted, outcome, contact_date, created_at";
const DEAL_COLS: &str = "id, title, status, setter_id, closer_id, won_since, consultation_at, created_at";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One connection serving every CRM table.
pub struct SqliteCrmStore {
    conn: Mutex<Connection>,
}

impl SqliteCrmStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DomainError> {
        self.conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    fn row_to_user(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
        let roles_str: String = row.get(3)?;
        let created_str: String = row.get(4)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            roles: serde_json::from_str(&roles_str).unwrap_or_else(|_| {
                warn!(roles = %roles_str, "invalid roles column, treating as none");
                Vec::new()
            }),
            created_at: parse_timestamp(&created_str).unwrap_or_else(Utc::now),
        })
    }

    fn row_to_lead(row: &rusqlite::Row) -> Result<Lead, rusqlite::Error> {
        let contacted: i32 = row.get(5)?;
        let contact_date: Option<String> = row.get(7)?;
        let created_str: String = row.get(8)?;
        Ok(Lead {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            source: row.get(4)?,
            contacted: contacted != 0,
            outcome: row.get(6)?,
            contact_date: contact_date.and_then(|s| parse_date(&s)),
            created_at: parse_timestamp(&created_str).unwrap_or_else(Utc::now),
        })
    }

    fn row_to_assignment(row: &rusqlite::Row) -> Result<Assignment, rusqlite::Error> {
        let assigned_str: String = row.get(2)?;
        Ok(Assignment {
            lead_id: row.get(0)?,
            user_id: row.get(1)?,
            assigned_at: parse_timestamp(&assigned_str).unwrap_or_else(Utc::now),
        })
    }

    fn row_to_deal(row: &rusqlite::Row) -> Result<Deal, rusqlite::Error> {
        let status_str: String = row.get(2)?;
        let won_since: Option<String> = row.get(5)?;
        let consultation_at: Option<String> = row.get(6)?;
        let created_str: String = row.get(7)?;
        Ok(Deal {
            id: row.get(0)?,
            title: row.get(1)?,
            status: status_str.parse().unwrap_or_else(|_| {
                warn!(status = %status_str, "invalid deal status, defaulting to in_progress");
                DealStatus::InProgress
            }),
            setter_id: row.get(3)?,
            closer_id: row.get(4)?,
            won_since: won_since.and_then(|s| parse_date(&s)),
            consultation_at: consultation_at.and_then(|s| parse_timestamp(&s)),
            created_at: parse_timestamp(&created_str).unwrap_or_else(Utc::now),
        })
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

impl UserRepository for SqliteCrmStore {
    fn add_user(&self, user: &User) -> Result<(), DomainError> {
        let roles = serde_json::to_string(&user.roles)
            .map_err(|e| DomainError::Parse(e.to_string()))?;
        self.conn()?
            .execute(
                "INSERT INTO users (id, name, email, roles, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user.id, user.name, user.email, roles, user.created_at.to_rfc3339()],
            )
            .map_err(|e| DomainError::Database(format!("Failed to add user: {e}")))?;
        Ok(())
    }

    fn get_user(&self, id: &str) -> Result<Option<User>, DomainError> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLS} FROM users ORDER BY name, id"))?;
        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}

impl LeadRepository for SqliteCrmStore {
    fn add_lead(&self, lead: &Lead) -> Result<(), DomainError> {
        self.conn()?
            .execute(
                &format!("INSERT INTO leads ({LEAD_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
                params![
                    lead.id,
                    lead.name,
                    lead.email,
                    lead.phone,
                    lead.source,
                    lead.contacted as i32,
                    lead.outcome,
                    format_date(lead.contact_date),
                    lead.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| DomainError::Database(format!("Failed to add lead: {e}")))?;
        Ok(())
    }

    fn get_lead(&self, id: &str) -> Result<Option<Lead>, DomainError> {
        let conn = self.conn()?;
        let lead = conn
            .query_row(
                &format!("SELECT {LEAD_COLS} FROM leads WHERE id = ?1"),
                params![id],
                Self::row_to_lead,
            )
            .optional()?;
        Ok(lead)
    }

    fn update_contact(&self, lead: &Lead) -> Result<(), DomainError> {
        let rows = self.conn()?.execute(
            "UPDATE leads SET contacted = ?1, outcome = ?2, contact_date = ?3 WHERE id = ?4",
            params![
                lead.contacted as i32,
                lead.outcome,
                format_date(lead.contact_date),
                lead.id
            ],
        )?;
        if rows == 0 {
            return Err(DomainError::NotFound(format!("Lead not found: {}", lead.id)));
        }
        Ok(())
    }

    fn list_leads(&self, page: Page) -> Result<Vec<Lead>, DomainError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {LEAD_COLS} FROM leads ORDER BY created_at, id LIMIT ?1 OFFSET ?2"
        ))?;
        let leads = stmt
            .query_map(params![page.limit as i64, page.offset as i64], Self::row_to_lead)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(leads)
    }
}

impl AssignmentRepository for SqliteCrmStore {
    fn assign(&self, assignment: &Assignment) -> Result<bool, DomainError> {
        let rows = self.conn()?.execute(
            "INSERT OR IGNORE INTO lead_assignments (lead_id, user_id, assigned_at) VALUES (?1, ?2, ?3)",
            params![
                assignment.lead_id,
                assignment.user_id,
                assignment.assigned_at.to_rfc3339()
            ],
        )?;
        Ok(rows > 0)
    }

    fn unassign(&self, lead_id: &str, user_id: &str) -> Result<bool, DomainError> {
        let rows = self.conn()?.execute(
            "DELETE FROM lead_assignments WHERE lead_id = ?1 AND user_id = ?2",
            params![lead_id, user_id],
        )?;
        Ok(rows > 0)
    }

    fn list_assignments(&self, page: Page) -> Result<Vec<Assignment>, DomainError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT lead_id, user_id, assigned_at FROM lead_assignments
             ORDER BY assigned_at, lead_id, user_id LIMIT ?1 OFFSET ?2",
        )?;
        let assignments = stmt
            .query_map(
                params![page.limit as i64, page.offset as i64],
                Self::row_to_assignment,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(assignments)
    }
}

impl DealRepository for SqliteCrmStore {
    fn add_deal(&self, deal: &Deal) -> Result<(), DomainError> {
        self.conn()?
            .execute(
                &format!("INSERT INTO deals ({DEAL_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                params![
                    deal.id,
                    deal.title,
                    deal.status.to_string(),
                    deal.setter_id,
                    deal.closer_id,
                    format_date(deal.won_since),
                    deal.consultation_at.map(|dt| dt.to_rfc3339()),
                    deal.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| DomainError::Database(format!("Failed to add deal: {e}")))?;
        Ok(())
    }

    fn get_deal(&self, id: &str) -> Result<Option<Deal>, DomainError> {
        let conn = self.conn()?;
        let deal = conn
            .query_row(
                &format!("SELECT {DEAL_COLS} FROM deals WHERE id = ?1"),
                params![id],
                Self::row_to_deal,
            )
            .optional()?;
        Ok(deal)
    }

    fn update_deal(&self, deal: &Deal) -> Result<(), DomainError> {
        let rows = self.conn()?.execute(
            "UPDATE deals SET title = ?1, status = ?2, setter_id = ?3, closer_id = ?4,
                won_since = ?5, consultation_at = ?6 WHERE id = ?7",
            params![
                deal.title,
                deal.status.to_string(),
                deal.setter_id,
                deal.closer_id,
                format_date(deal.won_since),
                deal.consultation_at.map(|dt| dt.to_rfc3339()),
                deal.id,
            ],
        )?;
        if rows == 0 {
            return Err(DomainError::NotFound(format!("Deal not found: {}", deal.id)));
        }
        Ok(())
    }

    fn list_deals(&self, page: Page) -> Result<Vec<Deal>, DomainError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {DEAL_COLS} FROM deals ORDER BY created_at, id LIMIT ?1 OFFSET ?2"
        ))?;
        let deals = stmt
            .query_map(params![page.limit as i64, page.offset as i64], Self::row_to_deal)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(deals)
    }
}
