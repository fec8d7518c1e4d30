use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::notifications::{InsertNotificationEntity, NotificationEntity};

#[async_trait]
#[automock]
pub trait NotificationRepository {
    async fn insert(&self, insert_entity: InsertNotificationEntity) -> Result<Uuid>;

    async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<NotificationEntity>>;

    async fn count_unread(&self, user_id: Uuid) -> Result<i64>;

    /// `false` when no notification with that id belongs to the user.
    async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<bool>;

    async fn mark_all_read(&self, user_id: Uuid) -> Result<usize>;
}
