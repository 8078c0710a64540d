//! Shared test helpers: an in-memory CRM with failure switches, a counting
//! stats source and a few builders.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use leadboard::application::dashboard_stats::DashboardStatsUseCase;
use leadboard::domain::entities::assignment::Assignment;
use leadboard::domain::entities::deal::Deal;
use leadboard::domain::entities::lead::Lead;
use leadboard::domain::entities::snapshot::Snapshot;
use leadboard::domain::entities::user::User;
use leadboard::domain::error::DomainError;
use leadboard::domain::ports::assignment_repository::AssignmentRepository;
use leadboard::domain::ports::deal_repository::DealRepository;
use leadboard::domain::ports::lead_repository::LeadRepository;
use leadboard::domain::ports::stats_source::{StatsRequest, StatsSource};
use leadboard::domain::ports::user_repository::UserRepository;
use leadboard::domain::ports::Page;
use leadboard::domain::values::role::Role;
use leadboard::infrastructure::clock::ManualClock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Thursday, 2026-10-15 10:00 UTC.
pub fn thursday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 10, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn clock_at(now: DateTime<Utc>) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(now))
}

pub fn user(name: &str) -> User {
    User::new(name.to_string(), None, vec![Role::Setter])
}

pub fn lead(contacted: bool, outcome: Option<&str>, contact_date: Option<NaiveDate>) -> Lead {
    let mut lead = Lead::new("Prospect".into(), None, None, None);
    lead.contacted = contacted;
    lead.outcome = outcome.map(String::from);
    lead.contact_date = contact_date;
    lead
}

#[derive(Default)]
pub struct FakeCrm {
    pub users: Mutex<Vec<User>>,
    pub leads: Mutex<Vec<Lead>>,
    pub assignments: Mutex<Vec<Assignment>>,
    pub deals: Mutex<Vec<Deal>>,
    pub fail_users: AtomicBool,
    pub fail_leads: AtomicBool,
    pub fail_assignments: AtomicBool,
    pub fail_deals: AtomicBool,
    pub lead_page_reads: AtomicUsize,
}

impl FakeCrm {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_user(&self, name: &str) -> String {
        let u = user(name);
        let id = u.id.clone();
        self.users.lock().unwrap().push(u);
        id
    }

    pub fn with_lead(&self, lead: Lead) -> String {
        let id = lead.id.clone();
        self.leads.lock().unwrap().push(lead);
        id
    }

    pub fn with_assignment(&self, lead_id: &str, user_id: &str) {
        self.assignments
            .lock()
            .unwrap()
            .push(Assignment::new(lead_id.to_string(), user_id.to_string()));
    }

    pub fn with_deal(&self, deal: Deal) {
        self.deals.lock().unwrap().push(deal);
    }

    pub fn stats(self: &Arc<Self>, clock: Arc<ManualClock>) -> DashboardStatsUseCase {
        DashboardStatsUseCase::new(
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            clock,
            chrono_tz::UTC,
        )
    }
}

fn page_of<T: Clone>(rows: &[T], page: Page) -> Vec<T> {
    rows.iter().skip(page.offset).take(page.limit).cloned().collect()
}

fn failing(flag: &AtomicBool, what: &str) -> Result<(), DomainError> {
    if flag.load(Ordering::SeqCst) {
        return Err(DomainError::Database(format!("{what} backend offline")));
    }
    Ok(())
}

impl UserRepository for FakeCrm {
    fn add_user(&self, user: &User) -> Result<(), DomainError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    fn get_user(&self, id: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    fn list_users(&self) -> Result<Vec<User>, DomainError> {
        failing(&self.fail_users, "users")?;
        Ok(self.users.lock().unwrap().clone())
    }
}

impl LeadRepository for FakeCrm {
    fn add_lead(&self, lead: &Lead) -> Result<(), DomainError> {
        self.leads.lock().unwrap().push(lead.clone());
        Ok(())
    }

    fn get_lead(&self, id: &str) -> Result<Option<Lead>, DomainError> {
        Ok(self.leads.lock().unwrap().iter().find(|l| l.id == id).cloned())
    }

    fn update_contact(&self, lead: &Lead) -> Result<(), DomainError> {
        let mut leads = self.leads.lock().unwrap();
        let stored = leads
            .iter_mut()
            .find(|l| l.id == lead.id)
            .ok_or_else(|| DomainError::NotFound(lead.id.clone()))?;
        *stored = lead.clone();
        Ok(())
    }

    fn list_leads(&self, page: Page) -> Result<Vec<Lead>, DomainError> {
        failing(&self.fail_leads, "leads")?;
        self.lead_page_reads.fetch_add(1, Ordering::SeqCst);
        Ok(page_of(&self.leads.lock().unwrap(), page))
    }
}

impl AssignmentRepository for FakeCrm {
    fn assign(&self, assignment: &Assignment) -> Result<bool, DomainError> {
        let mut all = self.assignments.lock().unwrap();
        if all
            .iter()
            .any(|a| a.lead_id == assignment.lead_id && a.user_id == assignment.user_id)
        {
            return Ok(false);
        }
        all.push(assignment.clone());
        Ok(true)
    }

    fn unassign(&self, lead_id: &str, user_id: &str) -> Result<bool, DomainError> {
        let mut all = self.assignments.lock().unwrap();
        let before = all.len();
        all.retain(|a| !(a.lead_id == lead_id && a.user_id == user_id));
        Ok(all.len() < before)
    }

    fn list_assignments(&self, page: Page) -> Result<Vec<Assignment>, DomainError> {
        failing(&self.fail_assignments, "assignments")?;
        Ok(page_of(&self.assignments.lock().unwrap(), page))
    }
}

impl DealRepository for FakeCrm {
    fn add_deal(&self, deal: &Deal) -> Result<(), DomainError> {
        self.deals.lock().unwrap().push(deal.clone());
        Ok(())
    }

    fn get_deal(&self, id: &str) -> Result<Option<Deal>, DomainError> {
        Ok(self.deals.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    fn update_deal(&self, deal: &Deal) -> Result<(), DomainError> {
        let mut deals = self.deals.lock().unwrap();
        let stored = deals
            .iter_mut()
            .find(|d| d.id == deal.id)
            .ok_or_else(|| DomainError::NotFound(deal.id.clone()))?;
        *stored = deal.clone();
        Ok(())
    }

    fn list_deals(&self, page: Page) -> Result<Vec<Deal>, DomainError> {
        failing(&self.fail_deals, "deals")?;
        Ok(page_of(&self.deals.lock().unwrap(), page))
    }
}

/// Stats source that hands out numbered snapshots and counts its calls.
#[derive(Default)]
pub struct CountingSource {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl CountingSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StatsSource for CountingSource {
    async fn fetch(&self, _request: &StatsRequest) -> Result<Snapshot, DomainError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::Network("stats endpoint unreachable".into()));
        }
        Ok(Snapshot {
            total: n,
            ..Snapshot::default()
        })
    }
}
