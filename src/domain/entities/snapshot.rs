//! The dashboard statistics payload and its cached form.
//!
//! Field names on the wire are the ones the front end has always consumed,
//! so the serde renames here are part of the HTTP contract.

use crate::domain::values::outcome::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Histogram over the fixed outcome vocabulary. Every key is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeHistogram {
    #[serde(rename = "Nicht erreicht")]
    pub not_reached: usize,
    #[serde(rename = "Kein Interesse")]
    pub not_interested: usize,
    #[serde(rename = "Beratungsgespräch")]
    pub consultation: usize,
    #[serde(rename = "Unterlagen angefordert")]
    pub documents_requested: usize,
    #[serde(rename = "Wiedervorlage")]
    pub follow_up: usize,
    #[serde(rename = "Ungültiger Lead")]
    pub invalid_lead: usize,
    #[serde(rename = "Kein Ergebnis")]
    pub no_outcome: usize,
}

impl OutcomeHistogram {
    fn slot(&mut self, outcome: Outcome) -> &mut usize {
        match outcome {
            Outcome::NotReached => &mut self.not_reached,
            Outcome::NotInterested => &mut self.not_interested,
            Outcome::Consultation => &mut self.consultation,
            Outcome::DocumentsRequested => &mut self.documents_requested,
            Outcome::FollowUp => &mut self.follow_up,
            Outcome::InvalidLead => &mut self.invalid_lead,
            Outcome::NoOutcome => &mut self.no_outcome,
        }
    }

    pub fn increment(&mut self, outcome: Outcome) {
        *self.slot(outcome) += 1;
    }

    pub fn get(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::NotReached => self.not_reached,
            Outcome::NotInterested => self.not_interested,
            Outcome::Consultation => self.consultation,
            Outcome::DocumentsRequested => self.documents_requested,
            Outcome::FollowUp => self.follow_up,
            Outcome::InvalidLead => self.invalid_lead,
            Outcome::NoOutcome => self.no_outcome,
        }
    }

    pub fn total(&self) -> usize {
        self.not_reached
            + self.not_interested
            + self.consultation
            + self.documents_requested
            + self.follow_up
            + self.invalid_lead
            + self.no_outcome
    }
}

/// Per-rep breakdown, keyed by resolved display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerStats {
    pub name: String,
    #[serde(rename = "gesamt")]
    pub total: usize,
    #[serde(rename = "kontaktiert")]
    pub contacted: usize,
    #[serde(rename = "beratungsgespraeche")]
    pub consultations: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "gesamt")]
    pub total: usize,
    #[serde(rename = "kontaktiert")]
    pub contacted: usize,
    #[serde(rename = "nichtKontaktiert")]
    pub not_contacted: usize,
    #[serde(rename = "dieseWoche")]
    pub this_week: usize,
    #[serde(rename = "diesenMonat")]
    pub this_month: usize,
    #[serde(rename = "heute")]
    pub today: usize,
    #[serde(rename = "termineWoche")]
    pub consultations_this_week: usize,
    #[serde(rename = "abschluesseMonat")]
    pub deals_won_this_month: usize,
    #[serde(rename = "zugewieseneHotLeads")]
    pub assigned_deals: usize,
    #[serde(rename = "ergebnisse")]
    pub outcomes: OutcomeHistogram,
    #[serde(rename = "vertriebler")]
    pub owners: Vec<OwnerStats>,
    #[serde(rename = "conversionRate")]
    pub conversion_rate: f64,
}

/// Persisted cache blob: the snapshot fields plus the capture time in epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSnapshot {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub timestamp: i64,
}

impl CachedSnapshot {
    pub fn new(snapshot: Snapshot, captured_at: DateTime<Utc>) -> Self {
        Self {
            snapshot,
            timestamp: captured_at.timestamp_millis(),
        }
    }

    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Younger than `ttl` at `now`. A capture time after `now` means the
    /// clock moved backwards, so the age is unknown and the blob is stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        match self.captured_at() {
            Some(at) => {
                let age = now - at;
                age >= chrono::Duration::zero() && age < ttl
            }
            None => false,
        }
    }
}
