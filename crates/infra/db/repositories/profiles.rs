use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::profiles},
};
use domain::{
    entities::profiles::ProfileEntity,
    repositories::profiles::ProfileRepository,
    value_objects::{enums::activity_kinds::ActivityKind, plans::UNLIMITED},
};

/// `UNLIMITED` becomes `i32::MAX` so the same `col < cap` guard applies.
pub(crate) fn increment_cap(limit: i32) -> i32 {
    if limit == UNLIMITED { i32::MAX } else { limit }
}

// The limit check lives in the WHERE clause so concurrent writers cannot overshoot.
macro_rules! guarded_increment {
    ($column:expr, $user_id:expr, $cap:expr, $now:expr) => {
        update(profiles::table)
            .filter(profiles::id.eq($user_id))
            .filter($column.lt($cap))
            .set(($column.eq($column + 1), profiles::updated_at.eq($now)))
            .returning(ProfileEntity::as_returning())
    };
}

/// Binds the increment statement for `kind` to `$statement` and evaluates `$body`.
macro_rules! with_guarded_increment {
    ($kind:expr, $user_id:expr, $cap:expr, $now:expr, |$statement:ident| $body:expr) => {
        match $kind {
            ActivityKind::Post => {
                let $statement =
                    guarded_increment!(profiles::posts_this_month, $user_id, $cap, $now);
                $body
            }
            ActivityKind::Update => {
                let $statement =
                    guarded_increment!(profiles::updates_this_month, $user_id, $cap, $now);
                $body
            }
            ActivityKind::Edit => {
                let $statement =
                    guarded_increment!(profiles::edits_this_month, $user_id, $cap, $now);
                $body
            }
        }
    };
}

pub struct ProfilePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ProfilePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProfileRepository for ProfilePostgres {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<ProfileEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = profiles::table
            .filter(profiles::id.eq(user_id))
            .select(ProfileEntity::as_select())
            .first::<ProfileEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn roll_over_counters(
        &self,
        user_id: Uuid,
        month_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(profiles::table)
            .filter(profiles::id.eq(user_id))
            .filter(profiles::activity_reset_at.lt(month_start))
            .set((
                profiles::posts_this_month.eq(0),
                profiles::updates_this_month.eq(0),
                profiles::edits_this_month.eq(0),
                profiles::activity_reset_at.eq(now),
                profiles::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn try_increment_activity(
        &self,
        user_id: Uuid,
        kind: ActivityKind,
        limit: i32,
    ) -> Result<Option<ProfileEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();
        let cap = increment_cap(limit);

        let result = with_guarded_increment!(kind, user_id, cap, now, |statement| statement
            .get_result::<ProfileEntity>(&mut conn)
            .optional()?);

        Ok(result)
    }

    async fn count_stale_profiles(&self, month_start: DateTime<Utc>) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = profiles::table
            .filter(profiles::activity_reset_at.lt(month_start))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn reset_stale_profiles(
        &self,
        month_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(profiles::table)
            .filter(profiles::activity_reset_at.lt(month_start))
            .set((
                profiles::posts_this_month.eq(0),
                profiles::updates_this_month.eq(0),
                profiles::edits_this_month.eq(0),
                profiles::activity_reset_at.eq(now),
                profiles::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
