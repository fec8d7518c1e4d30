use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        profiles::ApplyPlanChangeset,
        subscription_requests::{
            InsertSubscriptionRequestEntity, ReviewSubscriptionRequestEntity,
            SubscriptionRequestEntity,
        },
    },
    value_objects::enums::subscription_request_statuses::SubscriptionRequestStatus,
};

#[async_trait]
#[automock]
pub trait SubscriptionRequestRepository {
    async fn insert(
        &self,
        insert_entity: InsertSubscriptionRequestEntity,
    ) -> Result<SubscriptionRequestEntity>;

    async fn find_by_id(&self, request_id: Uuid) -> Result<Option<SubscriptionRequestEntity>>;

    async fn find_pending_by_user(&self, user_id: Uuid)
    -> Result<Option<SubscriptionRequestEntity>>;

    /// Newest first.
    async fn list(
        &self,
        status: Option<SubscriptionRequestStatus>,
    ) -> Result<Vec<SubscriptionRequestEntity>>;

    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionRequestEntity>>;

    /// Writes the review onto a still-pending request and, when `plan_change`
    /// is given, applies it to the requester's profile in the same
    /// transaction. `None` means the request was no longer pending.
    async fn apply_review(
        &self,
        request_id: Uuid,
        review: ReviewSubscriptionRequestEntity,
        plan_change: Option<ApplyPlanChangeset>,
    ) -> Result<Option<SubscriptionRequestEntity>>;
}
