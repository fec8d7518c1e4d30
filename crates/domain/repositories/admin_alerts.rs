use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::subscription_requests::SubscriptionRequestEntity;

/// Out-of-band channel telling admins that a request waits for review.
#[async_trait]
#[automock]
pub trait AdminAlertGateway {
    async fn new_subscription_request(&self, request: SubscriptionRequestEntity) -> Result<()>;
}
