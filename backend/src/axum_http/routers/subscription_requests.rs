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
        repositories::{
            admin_alerts::AdminAlertGateway, notifications::NotificationRepository,
            profiles::ProfileRepository, subscription_requests::SubscriptionRequestRepository,
        },
        value_objects::subscription_requests::{
            ListSubscriptionRequestsQuery, ReviewSubscriptionRequestModel,
            SubmitSubscriptionRequestModel,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            notifications::NotificationPostgres, profiles::ProfilePostgres,
            subscription_requests::SubscriptionRequestPostgres,
        },
    },
};
use uuid::Uuid;

use crate::{auth::AuthUser, usecases::subscription_requests::SubscriptionRequestUseCase};

type PostgresSubscriptionRequestUseCase =
    SubscriptionRequestUseCase<SubscriptionRequestPostgres, ProfilePostgres, NotificationPostgres>;

fn build_usecase(
    db_pool: Arc<PgPoolSquad>,
    admin_alerts: Arc<dyn AdminAlertGateway + Send + Sync>,
) -> Arc<PostgresSubscriptionRequestUseCase> {
    let request_repository = SubscriptionRequestPostgres::new(Arc::clone(&db_pool));
    let profile_repository = ProfilePostgres::new(Arc::clone(&db_pool));
    let notification_repository = NotificationPostgres::new(Arc::clone(&db_pool));

    Arc::new(SubscriptionRequestUseCase::new(
        Arc::new(request_repository),
        Arc::new(profile_repository),
        Arc::new(notification_repository),
        admin_alerts,
    ))
}

/// Seller side, nested under `/api/v1/subscription-requests`.
pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    admin_alerts: Arc<dyn AdminAlertGateway + Send + Sync>,
) -> Router {
    seller_router(build_usecase(db_pool, admin_alerts))
}

/// Admin side, nested under `/api/v1/admin/subscription-requests`.
pub fn admin_routes(
    db_pool: Arc<PgPoolSquad>,
    admin_alerts: Arc<dyn AdminAlertGateway + Send + Sync>,
) -> Router {
    admin_router(build_usecase(db_pool, admin_alerts))
}

pub fn seller_router<R, P, N>(usecase: Arc<SubscriptionRequestUseCase<R, P, N>>) -> Router
where
    R: SubscriptionRequestRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(submit_request))
        .route("/mine", get(list_my_requests))
        .with_state(usecase)
}

pub fn admin_router<R, P, N>(usecase: Arc<SubscriptionRequestUseCase<R, P, N>>) -> Router
where
    R: SubscriptionRequestRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_requests))
        .route("/:id/review", post(review_request))
        .with_state(usecase)
}

pub async fn submit_request<R, P, N>(
    State(usecase): State<Arc<SubscriptionRequestUseCase<R, P, N>>>,
    auth: AuthUser,
    Json(submit_model): Json<SubmitSubscriptionRequestModel>,
) -> impl IntoResponse
where
    R: SubscriptionRequestRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
{
    match usecase.submit_request(auth.user_id, submit_model).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_my_requests<R, P, N>(
    State(usecase): State<Arc<SubscriptionRequestUseCase<R, P, N>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    R: SubscriptionRequestRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
{
    match usecase.list_my_requests(auth.user_id).await {
        Ok(requests) => Json(requests).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_requests<R, P, N>(
    State(usecase): State<Arc<SubscriptionRequestUseCase<R, P, N>>>,
    auth: AuthUser,
    Query(query): Query<ListSubscriptionRequestsQuery>,
) -> impl IntoResponse
where
    R: SubscriptionRequestRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
{
    match usecase.list_requests(auth.user_id, query.status).await {
        Ok(requests) => Json(requests).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn review_request<R, P, N>(
    State(usecase): State<Arc<SubscriptionRequestUseCase<R, P, N>>>,
    auth: AuthUser,
    Path(request_id): Path<Uuid>,
    Json(review_model): Json<ReviewSubscriptionRequestModel>,
) -> impl IntoResponse
where
    R: SubscriptionRequestRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
{
    match usecase
        .review_request(
            request_id,
            auth.user_id,
            review_model.approve,
            review_model.note,
        )
        .await
    {
        Ok(reviewed) => Json(reviewed).into_response(),
        Err(err) => err.into_response(),
    }
}
