use anyhow::{Context, Result};
use std::str::FromStr;
use url::Url;

use super::{
    config_model::{AdminAlerts, BackendServer, Database, DotEnvyConfig, Maintenance, Supabase},
    stage::Stage,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();
    load_from(|key| std::env::var(key).ok())
}

pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<DotEnvyConfig> {
    let required = |key: &str| -> Result<String> {
        lookup(key)
            .filter(|v| !v.trim().is_empty())
            .with_context(|| format!("{key} is missing"))
    };
    let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let backend_server = BackendServer {
        port: parse(&required("SERVER_PORT_BACKEND")?, "SERVER_PORT_BACKEND")?,
        body_limit: parse(&required("SERVER_BODY_LIMIT")?, "SERVER_BODY_LIMIT")?,
        timeout: parse(&required("SERVER_TIMEOUT")?, "SERVER_TIMEOUT")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: match optional("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => parse(&raw, "DATABASE_MAX_CONNECTIONS")?,
            None => 10,
        },
    };

    let supabase = Supabase {
        jwt_secret: required("SUPABASE_JWT_SECRET")?,
    };

    let maintenance = Maintenance {
        internal_token: optional("INTERNAL_MAINTENANCE_TOKEN"),
    };

    let admin_alerts = AdminAlerts {
        webhook_url: optional("ADMIN_ALERT_WEBHOOK_URL")
            .map(|raw| Url::parse(raw.trim()))
            .transpose()
            .context("ADMIN_ALERT_WEBHOOK_URL is invalid")?,
    };

    let stage = optional("STAGE")
        .map(|raw| Stage::try_from(raw.as_str()))
        .transpose()?
        .unwrap_or_default();

    Ok(DotEnvyConfig {
        stage,
        backend_server,
        database,
        supabase,
        maintenance,
        admin_alerts,
    })
}

fn parse<T>(raw: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} is invalid"))
}

#[cfg(test)]
pub(crate) fn test_config() -> DotEnvyConfig {
    load_from(|key| {
        let value = match key {
            "SERVER_PORT_BACKEND" => Some("8080"),
            "SERVER_BODY_LIMIT" => Some("10"),
            "SERVER_TIMEOUT" => Some("30"),
            "DATABASE_URL" => Some("postgres://localhost:5432/market"),
            "SUPABASE_JWT_SECRET" => Some("supersecretjwtsecretforunittesting123"),
            "INTERNAL_MAINTENANCE_TOKEN" => Some("maint-token"),
            _ => None,
        };
        value.map(str::to_string)
    })
    .expect("test config must load")
}
