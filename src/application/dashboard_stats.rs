//! Dashboard statistics aggregation.
//!
//! Reads users, leads, assignments and deals in full, joins them in memory and
//! produces one [`Snapshot`]. Users and leads are required; assignments and
//! deals are best effort and only shrink the owner and deal figures when they
//! cannot be read.

use crate::domain::entities::deal::Deal;
use crate::domain::entities::snapshot::{OwnerStats, Snapshot};
use crate::domain::entities::user::{names_match, User};
use crate::domain::error::DomainError;
use crate::domain::ports::assignment_repository::AssignmentRepository;
use crate::domain::ports::clock::Clock;
use crate::domain::ports::deal_repository::DealRepository;
use crate::domain::ports::lead_repository::LeadRepository;
use crate::domain::ports::stats_source::{StatsRequest, StatsSource};
use crate::domain::ports::user_repository::UserRepository;
use crate::domain::ports::Page;
use crate::domain::values::outcome::Outcome;
use crate::domain::values::windows::ReportingWindows;
use async_trait::async_trait;
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Clone)]
pub struct DashboardStatsUseCase {
    users: Arc<dyn UserRepository>,
    leads: Arc<dyn LeadRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    deals: Arc<dyn DealRepository>,
    clock: Arc<dyn Clock>,
    tz: Tz,
    page_size: usize,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct DealFigures {
    won_this_month: usize,
    consultations_this_week: usize,
    assigned: usize,
}

impl DashboardStatsUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        leads: Arc<dyn LeadRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        deals: Arc<dyn DealRepository>,
        clock: Arc<dyn Clock>,
        tz: Tz,
    ) -> Self {
        Self {
            users,
            leads,
            assignments,
            deals,
            clock,
            tz,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn execute(&self, request: &StatsRequest) -> Result<Snapshot, DomainError> {
        let users = self
            .users
            .list_users()
            .map_err(|e| DomainError::DataUnavailable(format!("users: {e}")))?;
        let users_by_id: HashMap<&str, &User> = users.iter().map(|u| (u.id.as_str(), u)).collect();

        let leads = read_all(self.page_size, |page| self.leads.list_leads(page))
            .map_err(|e| DomainError::DataUnavailable(format!("leads: {e}")))?;

        let assignments = match read_all(self.page_size, |page| self.assignments.list_assignments(page)) {
            Ok(assignments) => assignments,
            Err(e) => {
                warn!(error = %e, "assignments unavailable, owner figures will be empty");
                Vec::new()
            }
        };
        let mut owner_ids_by_lead: HashMap<&str, Vec<&str>> = HashMap::new();
        for a in &assignments {
            owner_ids_by_lead
                .entry(a.lead_id.as_str())
                .or_default()
                .push(a.user_id.as_str());
        }

        let windows = ReportingWindows::at(self.clock.now(), self.tz);
        let requester = request.requester_name.as_deref();

        let mut snapshot = Snapshot::default();
        let mut owners: HashMap<String, OwnerStats> = HashMap::new();
        let mut requester_consultations_this_week = 0;

        for lead in &leads {
            let owner_names: Vec<&str> = owner_ids_by_lead
                .get(lead.id.as_str())
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| match users_by_id.get(id) {
                            Some(user) => Some(user.name.as_str()),
                            None => {
                                debug!(lead_id = %lead.id, owner_id = %id, "owner not among users, skipped");
                                None
                            }
                        })
                        .collect()
                })
                .unwrap_or_default();
            let in_scope = match requester {
                Some(name) => owner_names.iter().any(|owner| names_match(owner, name)),
                None => true,
            };

            snapshot.total += 1;
            let consultation = lead.contacted && lead.is_consultation();

            if lead.contacted {
                snapshot.contacted += 1;
                match lead.classified_outcome() {
                    Some(outcome) => snapshot.outcomes.increment(outcome),
                    None => debug!(lead_id = %lead.id, outcome = ?lead.outcome, "outcome outside vocabulary, not counted"),
                }

                if let (true, Some(date)) = (in_scope, lead.contact_date) {
                    if windows.in_week(date) {
                        snapshot.this_week += 1;
                        if consultation {
                            requester_consultations_this_week += 1;
                        }
                    }
                    if windows.in_month(date) {
                        snapshot.this_month += 1;
                    }
                    if windows.is_today(date) {
                        snapshot.today += 1;
                    }
                }
            } else {
                snapshot.not_contacted += 1;
            }

            for name in owner_names {
                let stats = owners.entry(name.to_string()).or_insert_with(|| OwnerStats {
                    name: name.to_string(),
                    ..OwnerStats::default()
                });
                stats.total += 1;
                if lead.contacted {
                    stats.contacted += 1;
                }
                if consultation {
                    stats.consultations += 1;
                }
            }
        }

        snapshot.conversion_rate =
            conversion_rate(snapshot.outcomes.get(Outcome::Consultation), snapshot.contacted);

        let mut owners: Vec<OwnerStats> = owners.into_values().collect();
        owners.sort_by(|a, b| b.contacted.cmp(&a.contacted).then_with(|| a.name.cmp(&b.name)));
        snapshot.owners = owners;

        let pipeline = match read_all(self.page_size, |page| self.deals.list_deals(page)) {
            Ok(deals) => deal_figures(&deals, &users, requester, &windows),
            Err(e) => {
                warn!(error = %e, "deals unavailable, pipeline figures will be zero");
                DealFigures::default()
            }
        };
        snapshot.deals_won_this_month = pipeline.won_this_month;
        snapshot.assigned_deals = pipeline.assigned;
        snapshot.consultations_this_week = if pipeline.consultations_this_week > 0 {
            pipeline.consultations_this_week
        } else {
            requester_consultations_this_week
        };

        debug!(
            leads = snapshot.total,
            contacted = snapshot.contacted,
            owners = snapshot.owners.len(),
            "dashboard snapshot computed"
        );
        Ok(snapshot)
    }
}

/// Runs [`DashboardStatsUseCase::execute`] on the blocking pool; the
/// repositories behind it do synchronous I/O.
#[async_trait]
impl StatsSource for DashboardStatsUseCase {
    async fn fetch(&self, request: &StatsRequest) -> Result<Snapshot, DomainError> {
        let stats = self.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || stats.execute(&request))
            .await
            .map_err(|e| DomainError::DataUnavailable(format!("statistics task failed: {e}")))?
    }
}

/// Consultations per contacted lead in percent, one decimal. Zero when
/// nobody was contacted.
pub fn conversion_rate(consultations: usize, contacted: usize) -> f64 {
    if contacted == 0 {
        return 0.0;
    }
    (consultations as f64 / contacted as f64 * 1000.0).round() / 10.0
}

/// Pull every page until a short one comes back.
fn read_all<T>(
    page_size: usize,
    mut fetch: impl FnMut(Page) -> Result<Vec<T>, DomainError>,
) -> Result<Vec<T>, DomainError> {
    let mut all = Vec::new();
    let mut page = Page::first(page_size);
    loop {
        let batch = fetch(page)?;
        let last = batch.len() < page.limit;
        all.extend(batch);
        if last {
            return Ok(all);
        }
        page = page.next();
    }
}

fn deal_figures(
    deals: &[Deal],
    users: &[User],
    requester: Option<&str>,
    windows: &ReportingWindows,
) -> DealFigures {
    let requester_ids: Option<Vec<&str>> = requester.map(|name| {
        users
            .iter()
            .filter(|u| u.is_named(name))
            .map(|u| u.id.as_str())
            .collect()
    });
    let mine = |deal: &Deal| match &requester_ids {
        Some(ids) => deal.involves_any(ids),
        None => true,
    };

    let mut figures = DealFigures::default();
    for deal in deals.iter().filter(|&d| mine(d)) {
        figures.assigned += 1;
        if deal.is_won() && deal.won_since.is_some_and(|d| windows.in_month(d)) {
            figures.won_this_month += 1;
        }
        if deal
            .consultation_at
            .is_some_and(|at| windows.in_consultation_horizon(at))
        {
            figures.consultations_this_week += 1;
        }
    }
    figures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_rate_rounds_to_one_decimal() {
        assert_eq!(conversion_rate(1, 2), 50.0);
        assert_eq!(conversion_rate(1, 3), 33.3);
        assert_eq!(conversion_rate(2, 3), 66.7);
    }

    #[test]
    fn test_conversion_rate_zero_without_contacts() {
        assert_eq!(conversion_rate(0, 0), 0.0);
        assert_eq!(conversion_rate(5, 0), 0.0);
    }

    #[test]
    fn test_read_all_stops_on_short_page() {
        let rows: Vec<usize> = (0..7).collect();
        let mut calls = Vec::new();
        let all = read_all(3, |page| {
            calls.push(page.offset);
            Ok(rows.iter().skip(page.offset).take(page.limit).copied().collect())
        })
        .unwrap();
        assert_eq!(all, rows);
        assert_eq!(calls, vec![0, 3, 6]);
    }

    #[test]
    fn test_read_all_exact_multiple_needs_empty_page() {
        let rows: Vec<usize> = (0..6).collect();
        let mut calls = 0;
        let all = read_all(3, |page| {
            calls += 1;
            Ok(rows.iter().skip(page.offset).take(page.limit).copied().collect())
        })
        .unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(calls, 3);
    }
}
