use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// `Pending` is the only non-terminal state.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionRequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SubscriptionRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionRequestStatus::Pending => "pending",
            SubscriptionRequestStatus::Approved => "approved",
            SubscriptionRequestStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(SubscriptionRequestStatus::Pending),
            "approved" => Some(SubscriptionRequestStatus::Approved),
            "rejected" => Some(SubscriptionRequestStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubscriptionRequestStatus::Pending)
    }

    pub fn from_decision(approve: bool) -> Self {
        if approve {
            SubscriptionRequestStatus::Approved
        } else {
            SubscriptionRequestStatus::Rejected
        }
    }
}

impl Display for SubscriptionRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
