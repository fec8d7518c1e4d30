use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
};
use anyhow::Result;
use axum::{
    Extension, Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::{
    domain::repositories::admin_alerts::AdminAlertGateway,
    infra::{
        alerts::webhook::{NoopAdminAlerts, WebhookAdminAlerts},
        db::postgres::postgres_connection::PgPoolSquad,
    },
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

fn admin_alerts(config: &DotEnvyConfig) -> Result<Arc<dyn AdminAlertGateway + Send + Sync>> {
    match config.admin_alerts.webhook_url.clone() {
        Some(url) => Ok(Arc::new(WebhookAdminAlerts::new(url)?)),
        None => {
            warn!("http_serve: ADMIN_ALERT_WEBHOOK_URL not set, admin alerts disabled");
            Ok(Arc::new(NoopAdminAlerts))
        }
    }
}

pub fn app(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<Router> {
    let admin_alerts = admin_alerts(&config)?;

    let router = Router::new()
        .fallback(default_routers::not_found)
        .nest("/api/v1/plans", routers::plans::routes())
        .nest(
            "/api/v1/seller",
            routers::seller_activity::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/v1/subscription-requests",
            routers::subscription_requests::routes(
                Arc::clone(&db_pool),
                Arc::clone(&admin_alerts),
            ),
        )
        .nest(
            "/api/v1/admin/subscription-requests",
            routers::subscription_requests::admin_routes(
                Arc::clone(&db_pool),
                Arc::clone(&admin_alerts),
            ),
        )
        .nest(
            "/api/v1/notifications",
            routers::notifications::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/internal/v1/maintenance",
            routers::maintenance::routes(Arc::clone(&config), Arc::clone(&db_pool)),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(Extension(Arc::clone(&config)))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let app = app(Arc::clone(&config), db_pool)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(
        port = config.backend_server.port,
        stage = %config.stage,
        "http_serve: server is running"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "http_serve: failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "http_serve: failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("http_serve: received Ctrl+C signal"),
        _ = terminate => info!("http_serve: received terminate signal"),
    }
}
