use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::profiles::ProfileRepository,
        value_objects::activity::RecordActivityModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::profiles::ProfilePostgres,
    },
};

use crate::{auth::AuthUser, usecases::seller_activity::SellerActivityUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let profile_repository = ProfilePostgres::new(Arc::clone(&db_pool));
    let seller_activity_usecase = SellerActivityUseCase::new(Arc::new(profile_repository));

    router(Arc::new(seller_activity_usecase))
}

pub fn router<P>(seller_activity_usecase: Arc<SellerActivityUseCase<P>>) -> Router
where
    P: ProfileRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/usage", get(usage_summary))
        .route("/activity", post(record_activity))
        .with_state(seller_activity_usecase)
}

pub async fn usage_summary<P>(
    State(seller_activity_usecase): State<Arc<SellerActivityUseCase<P>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    P: ProfileRepository + Send + Sync + 'static,
{
    match seller_activity_usecase.usage_summary(auth.user_id).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn record_activity<P>(
    State(seller_activity_usecase): State<Arc<SellerActivityUseCase<P>>>,
    auth: AuthUser,
    Json(record_activity_model): Json<RecordActivityModel>,
) -> impl IntoResponse
where
    P: ProfileRepository + Send + Sync + 'static,
{
    match seller_activity_usecase
        .record_activity(auth.user_id, record_activity_model.kind)
        .await
    {
        Ok(recorded) => Json(recorded).into_response(),
        Err(err) => err.into_response(),
    }
}
