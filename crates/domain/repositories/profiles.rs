use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::profiles::ProfileEntity,
    value_objects::enums::activity_kinds::ActivityKind,
};

#[async_trait]
#[automock]
pub trait ProfileRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<ProfileEntity>>;

    /// Zeroes the counters when `activity_reset_at` is before `month_start`.
    /// Returns whether a reset happened.
    async fn roll_over_counters(
        &self,
        user_id: Uuid,
        month_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool>;

    /// Increments the counter for `kind` only while it is below `limit`
    /// (`-1` = no cap). `None` means the quota was already used up.
    async fn try_increment_activity(
        &self,
        user_id: Uuid,
        kind: ActivityKind,
        limit: i32,
    ) -> Result<Option<ProfileEntity>>;

    async fn count_stale_profiles(&self, month_start: DateTime<Utc>) -> Result<i64>;

    async fn reset_stale_profiles(
        &self,
        month_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<usize>;
}
