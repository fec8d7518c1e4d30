use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::profiles;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = profiles)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub role: String,
    pub plan_key: String,
    pub posts_this_month: i32,
    pub updates_this_month: i32,
    pub edits_this_month: i32,
    pub activity_reset_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Written when a request is approved: new plan plus zeroed counters.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = profiles)]
pub struct ApplyPlanChangeset {
    pub plan_key: String,
    pub posts_this_month: i32,
    pub updates_this_month: i32,
    pub edits_this_month: i32,
    pub activity_reset_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplyPlanChangeset {
    pub fn new(plan_key: String, now: DateTime<Utc>) -> Self {
        Self {
            plan_key,
            posts_this_month: 0,
            updates_this_month: 0,
            edits_this_month: 0,
            activity_reset_at: now,
            updated_at: now,
        }
    }
}
