use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::subscription_requests;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscription_requests)]
pub struct SubscriptionRequestEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub requested_plan: String,
    pub amount_minor: i32,
    pub payment_reference: Option<String>,
    pub payment_phone: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = subscription_requests)]
pub struct InsertSubscriptionRequestEntity {
    pub user_id: Uuid,
    pub requested_plan: String,
    pub amount_minor: i32,
    pub payment_reference: Option<String>,
    pub payment_phone: Option<String>,
    pub message: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = subscription_requests)]
pub struct ReviewSubscriptionRequestEntity {
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub admin_note: Option<String>,
    pub updated_at: DateTime<Utc>,
}
