use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use super::config::ServiceContext;
use super::sink::AlertSink;

/// Forwards events at or above `min_level` to the alert sink as one text message.
pub(crate) struct ErrorAlertLayer {
    sink: AlertSink,
    service_context: ServiceContext,
    min_level: Level,
}

impl ErrorAlertLayer {
    pub(crate) fn new(sink: AlertSink, service_context: ServiceContext, min_level: Level) -> Self {
        Self {
            sink,
            service_context,
            min_level,
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: BTreeMap<String, String>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields
                .insert(field.name().to_string(), redact(field.name(), value));
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }
}

impl<S> Layer<S> for ErrorAlertLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // `Level` orders by verbosity: ERROR is the smallest.
        if *metadata.level() > self.min_level {
            return;
        }

        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        let ctx = &self.service_context;
        let mut lines = vec![
            format!(
                "**{}** `{}` `{}` `{}`",
                ctx.service_name,
                ctx.environment,
                ctx.component,
                metadata.level()
            ),
            format!(
                "`{}` `{}`",
                Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                metadata.target()
            ),
        ];
        if let Some(message) = collector.message.filter(|m| !m.trim().is_empty()) {
            lines.push(format!("> {}", message.trim()));
        }
        for (key, value) in &collector.fields {
            lines.push(format!("- `{key}` = `{value}`"));
        }

        self.sink.try_send(lines.join("\n"));
    }
}

fn redact(field_name: &str, value: String) -> String {
    let name = field_name.to_ascii_lowercase();
    let sensitive = ["webhook", "secret", "password", "token", "authorization", "phone"]
        .iter()
        .any(|needle| name.contains(needle));

    if sensitive {
        "[REDACTED]".to_string()
    } else {
        value
    }
}
