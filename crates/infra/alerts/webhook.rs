use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use url::Url;

use crate::domain::{
    entities::subscription_requests::SubscriptionRequestEntity,
    repositories::admin_alerts::AdminAlertGateway,
    value_objects::plans::{PLAN_CURRENCY, PlanKey},
};

/// Posts plain-text alerts to a Discord-compatible webhook (`{"content": ...}`).
pub struct WebhookAdminAlerts {
    webhook_url: Url,
    client: Client,
}

impl WebhookAdminAlerts {
    pub fn new(webhook_url: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .context("failed to build admin alert http client")?;

        Ok(Self {
            webhook_url,
            client,
        })
    }
}

/// Used when no webhook is configured.
pub struct NoopAdminAlerts;

#[async_trait]
impl AdminAlertGateway for NoopAdminAlerts {
    async fn new_subscription_request(&self, _request: SubscriptionRequestEntity) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl AdminAlertGateway for WebhookAdminAlerts {
    async fn new_subscription_request(&self, request: SubscriptionRequestEntity) -> Result<()> {
        let content = format_request_alert(&request);

        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(sanitize_reqwest_error)?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(anyhow!(
            "admin alert webhook returned non-success status: {}",
            response.status()
        ))
    }
}

pub(crate) fn format_request_alert(request: &SubscriptionRequestEntity) -> String {
    let plan = PlanKey::from_stored(&request.requested_plan);
    let mut lines = vec![
        format!("**New plan request** `{}`", request.id),
        format!(
            "user `{}` wants **{}**, claims {}.{:02} {}",
            request.user_id,
            plan.definition().name,
            request.amount_minor / 100,
            request.amount_minor % 100,
            PLAN_CURRENCY
        ),
    ];

    if let Some(reference) = request.payment_reference.as_deref() {
        lines.push(format!("reference: `{}`", reference));
    }
    if let Some(phone) = request.payment_phone.as_deref() {
        lines.push(format!("phone: `{}`", mask_phone(phone)));
    }
    if let Some(message) = request.message.as_deref() {
        lines.push(format!("> {}", message));
    }

    truncate_for_webhook(lines.join("\n"))
}

fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("****{tail}")
}

// Webhook URLs embed their secret; never let reqwest print them.
fn sanitize_reqwest_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("admin alert webhook request timed out");
    }
    if error.is_connect() {
        return anyhow!("admin alert webhook connection failed");
    }
    anyhow!("admin alert webhook request failed")
}

fn truncate_for_webhook(content: String) -> String {
    const LIMIT: usize = 2000;
    const SUFFIX: &str = "\n… (truncated)";

    if content.chars().count() <= LIMIT {
        return content;
    }

    let allowed = LIMIT.saturating_sub(SUFFIX.chars().count());
    let mut truncated: String = content.chars().take(allowed).collect();
    truncated.push_str(SUFFIX);
    truncated
}
