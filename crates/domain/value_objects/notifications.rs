use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::notifications::{InsertNotificationEntity, NotificationEntity},
    value_objects::{enums::notification_kinds::NotificationKind, plans::PlanKey},
};

pub const DEFAULT_NOTIFICATION_LIMIT: i64 = 30;
pub const MAX_NOTIFICATION_LIMIT: i64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotificationsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationDto {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for NotificationDto {
    fn from(value: NotificationEntity) -> Self {
        Self {
            id: value.id,
            kind: NotificationKind::from_str(&value.kind),
            title: value.title,
            body: value.body,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UnreadCountDto {
    pub unread: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarkAllReadDto {
    pub updated: usize,
}

/// Builds the message a seller sees after an admin decides on their plan request.
pub fn plan_decision_notification(
    user_id: Uuid,
    plan: PlanKey,
    approved: bool,
    note: Option<&str>,
) -> InsertNotificationEntity {
    let plan_name = plan.definition().name;
    let (kind, title, mut body) = if approved {
        (
            NotificationKind::PlanApproved,
            "Plan upgrade approved".to_string(),
            format!("Your {plan_name} plan is now active. Monthly limits have been reset."),
        )
    } else {
        (
            NotificationKind::PlanRejected,
            "Plan request rejected".to_string(),
            format!("Your request for the {plan_name} plan was not approved."),
        )
    };

    if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
        body.push_str("\nNote from admin: ");
        body.push_str(note.trim());
    }

    InsertNotificationEntity {
        user_id,
        kind: kind.to_string(),
        title,
        body,
    }
}
