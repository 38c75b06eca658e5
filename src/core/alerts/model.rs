// Alert model types.
//
// Wire names (snake_case enum values, `type` field) match the exported alert
// records so downstream consumers can read them unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::model::LocationId;

/// Sequentially assigned alert identifier, displayed as `alert-<n>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(pub u64);

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alert-{}", self.0)
    }
}

impl FromStr for AlertId {
    type Err = std::num::ParseIntError;

    /// Accepts both `alert-7` and `7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix("alert-").unwrap_or(s.trim());
        digits.parse().map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// Location reached critical occupancy
    Congestion,
    /// Reserved; no trigger raises it yet
    Emergency,
    /// Reserved; no trigger raises it yet
    Weather,
}

impl AlertType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Congestion => "Congestion",
            Self::Emergency => "Emergency",
            Self::Weather => "Weather",
        }
    }

    pub fn all() -> &'static [AlertType] {
        &[Self::Congestion, Self::Emergency, Self::Weather]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

/// A raised alert. Only `resolved` ever changes, and only from false to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub location_id: LocationId,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub resolved: bool,
}

impl Alert {
    pub fn is_active(&self) -> bool {
        !self.resolved
    }
}
