use axum::{Json, Router, response::IntoResponse, routing::get};

use crate::usecases::plans;

pub fn routes() -> Router {
    Router::new().route("/", get(list_plans))
}

pub async fn list_plans() -> impl IntoResponse {
    Json(plans::list_plans())
}
