use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PlanApproved,
    PlanRejected,
    /// Rows written by other producers of the shared table.
    Other,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::PlanApproved => "plan_approved",
            NotificationKind::PlanRejected => "plan_rejected",
            NotificationKind::Other => "other",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "plan_approved" => NotificationKind::PlanApproved,
            "plan_rejected" => NotificationKind::PlanRejected,
            _ => NotificationKind::Other,
        }
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
