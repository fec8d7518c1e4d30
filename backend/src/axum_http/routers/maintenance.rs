use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use crates::{
    domain::repositories::profiles::ProfileRepository,
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::profiles::ProfilePostgres,
    },
};
use serde::Deserialize;
use tracing::warn;

use crate::{
    axum_http::error_responses::AppError, config::config_model::DotEnvyConfig,
    usecases::monthly_reset::MonthlyResetUseCase,
};

// Run example
//   curl -X POST "http://localhost:$SERVER_PORT_BACKEND/internal/v1/maintenance/monthly-reset" \
//     -H "Authorization: Bearer $INTERNAL_MAINTENANCE_TOKEN" \
//     -H "Content-Type: application/json" \
//     -d '{"dry_run":true}'

pub struct MaintenanceRouteState<P>
where
    P: ProfileRepository + Send + Sync + 'static,
{
    config: Arc<DotEnvyConfig>,
    usecase: Arc<MonthlyResetUseCase<P>>,
}

impl<P> Clone for MaintenanceRouteState<P>
where
    P: ProfileRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            usecase: Arc::clone(&self.usecase),
        }
    }
}

pub fn routes(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Router {
    let profile_repository = ProfilePostgres::new(Arc::clone(&db_pool));
    let usecase = MonthlyResetUseCase::new(Arc::new(profile_repository));

    router(config, Arc::new(usecase))
}

pub fn router<P>(config: Arc<DotEnvyConfig>, usecase: Arc<MonthlyResetUseCase<P>>) -> Router
where
    P: ProfileRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/monthly-reset", post(monthly_reset))
        .with_state(MaintenanceRouteState { config, usecase })
}

/// The body is required; `{}` runs a real reset.
#[derive(Debug, Default, Deserialize)]
pub struct MonthlyResetRequest {
    #[serde(default)]
    pub dry_run: bool,
}

pub async fn monthly_reset<P>(
    State(state): State<MaintenanceRouteState<P>>,
    headers: HeaderMap,
    payload: Result<Json<MonthlyResetRequest>, JsonRejection>,
) -> Response
where
    P: ProfileRepository + Send + Sync + 'static,
{
    let Some(expected_token) = state.config.maintenance.internal_token.as_deref() else {
        return AppError::ServiceUnavailable("maintenance token is not configured".to_string())
            .into_response();
    };

    if let Err(err) = authorize_bearer(&headers, expected_token) {
        warn!("maintenance: rejected monthly reset call");
        return err.into_response();
    }

    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "maintenance: invalid monthly reset body");
            return AppError::BadRequest(rejection.body_text()).into_response();
        }
    };

    match state
        .usecase
        .reset_stale_counters(Utc::now(), request.dry_run)
        .await
    {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => err.into_response(),
    }
}

fn authorize_bearer(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let unauthorized = || AppError::Unauthorized("invalid maintenance token".to_string());

    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(unauthorized)?;

    let token = auth.strip_prefix("Bearer ").ok_or_else(unauthorized)?;

    if token == expected_token {
        Ok(())
    } else {
        Err(unauthorized())
    }
}
