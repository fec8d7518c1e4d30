use anyhow::{Result, bail};
use async_trait::async_trait;
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{profiles, subscription_requests},
    },
};
use domain::{
    entities::{
        profiles::ApplyPlanChangeset,
        subscription_requests::{
            InsertSubscriptionRequestEntity, ReviewSubscriptionRequestEntity,
            SubscriptionRequestEntity,
        },
    },
    repositories::subscription_requests::SubscriptionRequestRepository,
    value_objects::enums::subscription_request_statuses::SubscriptionRequestStatus,
};

// Filtering on `pending` makes the status write-once even under concurrent reviews.
macro_rules! pending_review_update {
    ($request_id:expr, $review:expr) => {
        update(subscription_requests::table)
            .filter(subscription_requests::id.eq($request_id))
            .filter(
                subscription_requests::status.eq(SubscriptionRequestStatus::Pending.to_string()),
            )
            .set($review)
            .returning(SubscriptionRequestEntity::as_returning())
    };
}

macro_rules! plan_change_update {
    ($user_id:expr, $plan_change:expr) => {
        update(profiles::table)
            .filter(profiles::id.eq($user_id))
            .set($plan_change)
    };
}

pub struct SubscriptionRequestPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionRequestPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRequestRepository for SubscriptionRequestPostgres {
    async fn insert(
        &self,
        insert_entity: InsertSubscriptionRequestEntity,
    ) -> Result<SubscriptionRequestEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(subscription_requests::table)
            .values(&insert_entity)
            .returning(SubscriptionRequestEntity::as_returning())
            .get_result::<SubscriptionRequestEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, request_id: Uuid) -> Result<Option<SubscriptionRequestEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscription_requests::table
            .filter(subscription_requests::id.eq(request_id))
            .select(SubscriptionRequestEntity::as_select())
            .first::<SubscriptionRequestEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_pending_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<SubscriptionRequestEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscription_requests::table
            .filter(subscription_requests::user_id.eq(user_id))
            .filter(
                subscription_requests::status.eq(SubscriptionRequestStatus::Pending.to_string()),
            )
            .select(SubscriptionRequestEntity::as_select())
            .first::<SubscriptionRequestEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(
        &self,
        status: Option<SubscriptionRequestStatus>,
    ) -> Result<Vec<SubscriptionRequestEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = subscription_requests::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(subscription_requests::status.eq(status.to_string()));
        }

        let results = query
            .order((
                subscription_requests::created_at.desc(),
                subscription_requests::id.desc(),
            ))
            .select(SubscriptionRequestEntity::as_select())
            .load::<SubscriptionRequestEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionRequestEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subscription_requests::table
            .filter(subscription_requests::user_id.eq(user_id))
            .order((
                subscription_requests::created_at.desc(),
                subscription_requests::id.desc(),
            ))
            .select(SubscriptionRequestEntity::as_select())
            .load::<SubscriptionRequestEntity>(&mut conn)?;

        Ok(results)
    }

    async fn apply_review(
        &self,
        request_id: Uuid,
        review: ReviewSubscriptionRequestEntity,
        plan_change: Option<ApplyPlanChangeset>,
    ) -> Result<Option<SubscriptionRequestEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<_, anyhow::Error, _>(|conn| {
            let reviewed = pending_review_update!(request_id, &review)
                .get_result::<SubscriptionRequestEntity>(conn)
                .optional()?;

            let Some(reviewed) = reviewed else {
                return Ok(None);
            };

            if let Some(plan_change) = plan_change {
                let affected = plan_change_update!(reviewed.user_id, &plan_change).execute(conn)?;

                if affected == 0 {
                    bail!(
                        "profile {} missing while approving request {}",
                        reviewed.user_id,
                        request_id
                    );
                }
            }

            Ok(Some(reviewed))
        })
    }
}
