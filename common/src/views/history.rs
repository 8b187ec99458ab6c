use serde::{Deserialize, Serialize};

use super::HealthItem;

/// A recorded contact between the viewed member and someone else.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Interaction {
    /// The other party.
    pub email: String,
    pub timestamp: String,
}

/// One entry of a member's report history.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatedHealthReport {
    pub timestamp: String,
    pub dated_report: HealthItem,
}
