pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::assignment::AssignmentUseCase;
use crate::application::dashboard_stats::DashboardStatsUseCase;
use crate::application::deals::DealUseCase;
use crate::application::lead_intake::LeadIntakeUseCase;
use crate::application::team::TeamUseCase;
use crate::config::AppConfig;
use crate::domain::entities::assignment::Assignment;
use crate::domain::entities::deal::Deal;
use crate::domain::entities::lead::Lead;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::entities::user::User;
use crate::domain::error::DomainError;
use crate::domain::ports::assignment_repository::AssignmentRepository;
use crate::domain::ports::clock::Clock;
use crate::domain::ports::deal_repository::DealRepository;
use crate::domain::ports::lead_repository::LeadRepository;
use crate::domain::ports::stats_source::StatsRequest;
use crate::domain::ports::user_repository::UserRepository;
use crate::domain::values::role::Role;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::sqlite::crm_store::SqliteCrmStore;
use crate::infrastructure::sqlite::migrations::run_migrations;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rusqlite::Connection;
use std::sync::Arc;

pub struct LeadBoard {
    stats_uc: Arc<DashboardStatsUseCase>,
    team_uc: TeamUseCase,
    intake_uc: LeadIntakeUseCase,
    assignment_uc: AssignmentUseCase,
    deal_uc: DealUseCase,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl LeadBoard {
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        Self::open(&config.db_path, Arc::new(SystemClock), config.tz)
    }

    /// Open (and migrate) a SQLite database. `":memory:"` works for tests.
    pub fn open(db_path: &str, clock: Arc<dyn Clock>, tz: Tz) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
        run_migrations(&conn)?;

        let store = Arc::new(SqliteCrmStore::new(conn));
        Ok(Self::with_repositories(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            clock,
            tz,
        ))
    }

    pub fn with_repositories(
        users: Arc<dyn UserRepository>,
        leads: Arc<dyn LeadRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        deals: Arc<dyn DealRepository>,
        clock: Arc<dyn Clock>,
        tz: Tz,
    ) -> Self {
        Self {
            stats_uc: Arc::new(DashboardStatsUseCase::new(
                users.clone(),
                leads.clone(),
                assignments.clone(),
                deals.clone(),
                clock.clone(),
                tz,
            )),
            team_uc: TeamUseCase::new(users.clone()),
            intake_uc: LeadIntakeUseCase::new(leads.clone()),
            assignment_uc: AssignmentUseCase::new(assignments, leads, users.clone()),
            deal_uc: DealUseCase::new(deals, users),
            clock,
            tz,
        }
    }

    /// The aggregation, shareable with the HTTP server and the snapshot cache.
    pub fn stats(&self) -> Arc<DashboardStatsUseCase> {
        self.stats_uc.clone()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.tz).date_naive()
    }

    // Delegating methods
    pub fn dashboard_stats(&self, request: &StatsRequest) -> Result<Snapshot, DomainError> {
        self.stats_uc.execute(request)
    }

    pub fn add_user(&self, name: String, email: Option<String>, roles: Vec<Role>) -> Result<User, DomainError> {
        self.team_uc.add(name, email, roles)
    }

    pub fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.team_uc.list()
    }

    pub fn add_lead(
        &self,
        name: String,
        email: Option<String>,
        phone: Option<String>,
        source: Option<String>,
    ) -> Result<Lead, DomainError> {
        self.intake_uc.add(name, email, phone, source)
    }

    /// Record a contact; the date defaults to today in the configured zone.
    pub fn record_contact(
        &self,
        lead_id: &str,
        outcome: Option<&str>,
        contact_date: Option<NaiveDate>,
    ) -> Result<Lead, DomainError> {
        let date = contact_date.unwrap_or_else(|| self.today());
        self.intake_uc.record_contact(lead_id, outcome, date)
    }

    pub fn assign(&self, lead_id: &str, user_id: &str) -> Result<Assignment, DomainError> {
        self.assignment_uc.assign(lead_id, user_id)
    }

    pub fn unassign(&self, lead_id: &str, user_id: &str) -> Result<(), DomainError> {
        self.assignment_uc.unassign(lead_id, user_id)
    }

    pub fn add_deal(
        &self,
        title: String,
        setter_id: Option<String>,
        closer_id: Option<String>,
        consultation_at: Option<DateTime<Utc>>,
    ) -> Result<Deal, DomainError> {
        self.deal_uc.add(title, setter_id, closer_id, consultation_at)
    }

    pub fn mark_deal_won(&self, id: &str, won_since: Option<NaiveDate>) -> Result<Deal, DomainError> {
        let date = won_since.unwrap_or_else(|| self.today());
        self.deal_uc.mark_won(id, date)
    }

    pub fn list_deals(&self, limit: usize) -> Result<Vec<Deal>, DomainError> {
        self.deal_uc.list(limit)
    }
}
