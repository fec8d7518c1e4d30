use axum::{http::StatusCode, response::IntoResponse};
use tracing::{debug, info};

use super::error_responses::AppError;

pub async fn not_found() -> impl IntoResponse {
    info!("backend router: not_found handler invoked");
    AppError::NotFound.into_response()
}

pub async fn health_check() -> impl IntoResponse {
    debug!("backend router: health_check handler invoked");
    (StatusCode::OK, "OK").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axum_http::routers::test_support::json_body;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/api/v1/health-check", get(health_check))
            .fallback(not_found)
    }

    #[tokio::test]
    async fn health_check_is_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/api/v1/health-check").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let response = app()
            .oneshot(Request::builder().uri("/api/v2/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["code"], 404);
        assert_eq!(body["message"], "Not found");
    }
}
