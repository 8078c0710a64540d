use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of a contact attempt. The labels are the ones sales reps pick in the
/// front end and are also the keys of the dashboard outcome histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "Nicht erreicht")]
    NotReached,
    #[serde(rename = "Kein Interesse")]
    NotInterested,
    #[serde(rename = "Beratungsgespräch")]
    Consultation,
    #[serde(rename = "Unterlagen angefordert")]
    DocumentsRequested,
    #[serde(rename = "Wiedervorlage")]
    FollowUp,
    #[serde(rename = "Ungültiger Lead")]
    InvalidLead,
    /// Contacted, but nobody recorded a result.
    #[serde(rename = "Kein Ergebnis")]
    NoOutcome,
}

impl Outcome {
    /// Outcomes a rep can record. `NoOutcome` is only ever derived.
    pub const RECORDABLE: [Outcome; 6] = [
        Outcome::NotReached,
        Outcome::NotInterested,
        Outcome::Consultation,
        Outcome::DocumentsRequested,
        Outcome::FollowUp,
        Outcome::InvalidLead,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::NotReached => "Nicht erreicht",
            Outcome::NotInterested => "Kein Interesse",
            Outcome::Consultation => "Beratungsgespräch",
            Outcome::DocumentsRequested => "Unterlagen angefordert",
            Outcome::FollowUp => "Wiedervorlage",
            Outcome::InvalidLead => "Ungültiger Lead",
            Outcome::NoOutcome => "Kein Ergebnis",
        }
    }

    /// Classify a raw stored outcome string.
    ///
    /// Missing or blank maps to `Some(NoOutcome)`; a label outside the fixed
    /// vocabulary maps to `None` and is left out of the histogram.
    pub fn classify(raw: Option<&str>) -> Option<Outcome> {
        match raw.map(str::trim) {
            None | Some("") => Some(Outcome::NoOutcome),
            Some(label) => label.parse().ok(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Outcome::RECORDABLE
            .iter()
            .chain(std::iter::once(&Outcome::NoOutcome))
            .find(|o| o.label().to_lowercase() == wanted)
            .copied()
            .ok_or_else(|| format!("Unknown outcome: {s}"))
    }
}
