use std::sync::Arc;

use axum::http::StatusCode;
use crates::domain::{
    repositories::notifications::NotificationRepository,
    value_objects::notifications::{
        DEFAULT_NOTIFICATION_LIMIT, MAX_NOTIFICATION_LIMIT, MarkAllReadDto, NotificationDto,
        UnreadCountDto,
    },
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("limit must be between 1 and 100")]
    BadLimit,
    #[error("notification not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl NotificationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            NotificationError::BadLimit => StatusCode::BAD_REQUEST,
            NotificationError::NotFound => StatusCode::NOT_FOUND,
            NotificationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, NotificationError>;

pub struct NotificationUseCase<N>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    notification_repo: Arc<N>,
}

impl<N> NotificationUseCase<N>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    pub fn new(notification_repo: Arc<N>) -> Self {
        Self { notification_repo }
    }

    /// Newest first.
    pub async fn list(&self, user_id: Uuid, limit: Option<i64>) -> UseCaseResult<Vec<NotificationDto>> {
        let limit = limit.unwrap_or(DEFAULT_NOTIFICATION_LIMIT);
        if !(1..=MAX_NOTIFICATION_LIMIT).contains(&limit) {
            return Err(NotificationError::BadLimit);
        }

        let rows = self
            .notification_repo
            .list_by_user(user_id, limit)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "notifications: failed to list");
                NotificationError::Internal(err)
            })?;

        Ok(rows.into_iter().map(NotificationDto::from).collect())
    }

    pub async fn unread_count(&self, user_id: Uuid) -> UseCaseResult<UnreadCountDto> {
        let unread = self
            .notification_repo
            .count_unread(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "notifications: failed to count unread");
                NotificationError::Internal(err)
            })?;

        Ok(UnreadCountDto { unread })
    }

    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> UseCaseResult<()> {
        let updated = self
            .notification_repo
            .mark_read(user_id, notification_id)
            .await
            .map_err(|err| {
                error!(%user_id, %notification_id, db_error = ?err, "notifications: failed to mark read");
                NotificationError::Internal(err)
            })?;

        if !updated {
            warn!(%user_id, %notification_id, "notifications: not found for user");
            return Err(NotificationError::NotFound);
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> UseCaseResult<MarkAllReadDto> {
        let updated = self
            .notification_repo
            .mark_all_read(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "notifications: failed to mark all read");
                NotificationError::Internal(err)
            })?;

        info!(%user_id, updated, "notifications: marked all read");
        Ok(MarkAllReadDto { updated })
    }
}
