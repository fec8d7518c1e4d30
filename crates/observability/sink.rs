use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

const QUEUE_CAPACITY: usize = 256;
const CONTENT_LIMIT: usize = 2000;

/// Bounded queue in front of the error webhook; the tracing layer never blocks on HTTP.
#[derive(Clone)]
pub(crate) struct AlertSink {
    tx: mpsc::Sender<String>,
}

impl AlertSink {
    /// Must be called from inside a tokio runtime.
    pub(crate) fn spawn(webhook_url: Url) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(3)).build()?;
        let (tx, mut rx) = mpsc::channel::<String>(QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(content) = rx.recv().await {
                let content: String = content.chars().take(CONTENT_LIMIT).collect();
                let result = client
                    .post(webhook_url.clone())
                    .json(&json!({ "content": content }))
                    .send()
                    .await;

                // Logging here would feed back into the error layer.
                match result {
                    Ok(response) if !response.status().is_success() => {
                        eprintln!("error webhook returned status {}", response.status());
                    }
                    Ok(_) => {}
                    Err(_) => eprintln!("error webhook request failed"),
                }
            }
        });

        Ok(Self { tx })
    }

    pub(crate) fn try_send(&self, content: String) {
        match self.tx.try_send(content) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                eprintln!("error webhook queue full; dropping alert");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                eprintln!("error webhook queue closed; dropping alert");
            }
        }
    }
}
