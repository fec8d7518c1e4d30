use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::notifications::NotificationRepository,
        value_objects::notifications::ListNotificationsQuery,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::notifications::NotificationPostgres,
    },
};
use uuid::Uuid;

use crate::{auth::AuthUser, usecases::notifications::NotificationUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let notification_repository = NotificationPostgres::new(Arc::clone(&db_pool));
    let notification_usecase = NotificationUseCase::new(Arc::new(notification_repository));

    router(Arc::new(notification_usecase))
}

pub fn router<N>(notification_usecase: Arc<NotificationUseCase<N>>) -> Router
where
    N: NotificationRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list))
        .route("/unread-count", get(unread_count))
        .route("/read-all", post(mark_all_read))
        .route("/:id/read", post(mark_read))
        .with_state(notification_usecase)
}

pub async fn list<N>(
    State(notification_usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> impl IntoResponse
where
    N: NotificationRepository + Send + Sync + 'static,
{
    match notification_usecase.list(auth.user_id, query.limit).await {
        Ok(notifications) => Json(notifications).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn unread_count<N>(
    State(notification_usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    N: NotificationRepository + Send + Sync + 'static,
{
    match notification_usecase.unread_count(auth.user_id).await {
        Ok(count) => Json(count).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn mark_read<N>(
    State(notification_usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> impl IntoResponse
where
    N: NotificationRepository + Send + Sync + 'static,
{
    match notification_usecase
        .mark_read(auth.user_id, notification_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn mark_all_read<N>(
    State(notification_usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    N: NotificationRepository + Send + Sync + 'static,
{
    match notification_usecase.mark_all_read(auth.user_id).await {
        Ok(updated) => Json(updated).into_response(),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axum_http::routers::test_support::{
        authed_get, authed_post_json, json_body, with_config,
    };
    use crates::domain::repositories::notifications::MockNotificationRepository;
    use mockall::predicate::eq;
    use serde_json::json;
    use tower::ServiceExt;

    fn app(repo: MockNotificationRepository) -> Router {
        with_config(router(Arc::new(NotificationUseCase::new(Arc::new(repo)))))
    }

    #[tokio::test]
    async fn unread_count_is_scoped_to_caller() {
        let user_id = Uuid::new_v4();
        let mut repo = MockNotificationRepository::new();
        repo.expect_count_unread()
            .with(eq(user_id))
            .returning(|_| Box::pin(async { Ok(2) }));

        let response = app(repo)
            .oneshot(authed_get("/unread-count", user_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["unread"], 2);
    }

    #[tokio::test]
    async fn oversized_limit_is_bad_request() {
        let response = app(MockNotificationRepository::new())
            .oneshot(authed_get("/?limit=500", Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mark_read_returns_no_content() {
        let user_id = Uuid::new_v4();
        let notification_id = Uuid::new_v4();
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read()
            .with(eq(user_id), eq(notification_id))
            .returning(|_, _| Box::pin(async { Ok(true) }));

        let response = app(repo)
            .oneshot(authed_post_json(
                &format!("/{notification_id}/read"),
                user_id,
                json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
