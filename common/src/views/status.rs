use serde::{Deserialize, Serialize};

/// Colour the dashboard attaches to a health or location status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum StatusColor {
    #[serde(rename = "danger")]
    Unhealthy,

    #[serde(rename = "yellow")]
    Warning,

    #[serde(rename = "gray")]
    Unknown,

    #[serde(rename = "success")]
    Healthy,
}

/// Where a community member is currently allowed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    Campus,
    Remote,
    Quarantined,
}

impl LocationStatus {
    /// Remote and quarantined members may not enter campus.
    pub fn blocks_entry(&self) -> bool {
        matches!(self, Self::Remote | Self::Quarantined)
    }
}

/// A member's health assessment as derived from their latest reports.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthItem {
    #[serde(default)]
    pub color: Option<StatusColor>,

    /// Human-readable reasons behind the colour, e.g. "Positive Test".
    #[serde(default)]
    pub criteria: Vec<String>,

    #[serde(default)]
    pub vaccinated: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

impl HealthItem {
    pub fn format_criteria(&self) -> String {
        self.criteria.join(" & ")
    }

    pub fn at_risk(&self, include_warning: bool) -> bool {
        match self.color {
            Some(StatusColor::Unhealthy) => true,
            Some(StatusColor::Warning) => include_warning,
            _ => false,
        }
    }

    /// No report was submitted for the day.
    pub fn is_incomplete(&self) -> bool {
        self.color == Some(StatusColor::Unknown)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocationItem {
    #[serde(default)]
    pub color: Option<StatusColor>,

    #[serde(default)]
    pub location: Option<LocationStatus>,
}

impl LocationItem {
    pub fn entry_blocked(&self) -> bool {
        self.location.is_some_and(|l| l.blocks_entry())
            || self.color == Some(StatusColor::Unhealthy)
    }
}

/// Row of the home screen's status table: today's health and location for
/// one member.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatusSummary {
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub health: HealthItem,
    pub location: LocationItem,
}
