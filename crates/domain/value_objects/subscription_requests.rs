use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::subscription_requests::SubscriptionRequestEntity,
    value_objects::{enums::subscription_request_statuses::SubscriptionRequestStatus, plans::PlanKey},
};

pub const MAX_MESSAGE_CHARS: usize = 500;
pub const MAX_REFERENCE_CHARS: usize = 64;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SubmitSubscriptionRequestModel {
    pub requested_plan: String,
    pub amount_minor: i32,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub payment_phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReviewSubscriptionRequestModel {
    pub approve: bool,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSubscriptionRequestsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionRequestDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub requested_plan: PlanKey,
    pub amount_minor: i32,
    pub payment_reference: Option<String>,
    pub payment_phone: Option<String>,
    pub message: Option<String>,
    pub status: SubscriptionRequestStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionRequestEntity> for SubscriptionRequestDto {
    fn from(value: SubscriptionRequestEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            requested_plan: PlanKey::from_stored(&value.requested_plan),
            amount_minor: value.amount_minor,
            payment_reference: value.payment_reference,
            payment_phone: value.payment_phone,
            message: value.message,
            // Unknown stored states are never reviewable again.
            status: SubscriptionRequestStatus::from_str(&value.status)
                .unwrap_or(SubscriptionRequestStatus::Rejected),
            reviewed_by: value.reviewed_by,
            reviewed_at: value.reviewed_at,
            admin_note: value.admin_note,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Trims `value` and maps blank strings to `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
