mod config;
mod error_layer;
mod sink;

use anyhow::Result;
use config::ObservabilityConfig;
use error_layer::ErrorAlertLayer;
use sink::AlertSink;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global subscriber: `RUST_LOG` filter (default `info`), local-time
/// fmt output, and the optional error webhook.
pub fn init_observability(component: &str) -> Result<()> {
    let config = ObservabilityConfig::from_env(component);

    let alert_layer = match config.error_webhook.as_ref() {
        Some(webhook) => {
            let sink = AlertSink::spawn(webhook.webhook_url.clone())?;
            Some(
                ErrorAlertLayer::new(sink, config.service_context.clone(), webhook.min_level)
                    .with_filter(LevelFilter::from_level(webhook.min_level)),
            )
        }
        None => None,
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(alert_layer)
        .with(env_filter)
        .try_init()?;

    let ctx = &config.service_context;
    for warning in &config.warnings {
        warn!(
            service = %ctx.service_name,
            environment = %ctx.environment,
            component = %ctx.component,
            warning = %warning,
            "observability: config warning"
        );
    }

    info!(
        service = %ctx.service_name,
        environment = %ctx.environment,
        component = %ctx.component,
        error_webhook = config.error_webhook.is_some(),
        "observability: tracing initialized"
    );

    Ok(())
}
