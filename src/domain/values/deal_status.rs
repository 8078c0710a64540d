use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealStatus::InProgress => write!(f, "in_progress"),
            DealStatus::Won => write!(f, "won"),
            DealStatus::Lost => write!(f, "lost"),
        }
    }
}

impl FromStr for DealStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in_progress" | "in progress" | "in bearbeitung" => Ok(DealStatus::InProgress),
            "won" | "gewonnen" => Ok(DealStatus::Won),
            "lost" | "verloren" => Ok(DealStatus::Lost),
            _ => Err(format!("Unknown deal status: {s}")),
        }
    }
}
