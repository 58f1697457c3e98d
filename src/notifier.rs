//! Outbound alert boundary.
//!
//! Alerts are fire-and-forget: delivery failures are logged and never
//! propagated back into the paths that raised them.

use async_trait::async_trait;
use tracing::{debug, warn};

/// Receives alerts raised by poll topics and the watchdog.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, message: &str);
}

/// Writes alerts to the log; the default when no webhook is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, subject: &str, message: &str) {
        warn!(subject, message, "Alert");
    }
}

/// Posts alerts as JSON to a configured webhook.
pub struct HttpNotifier {
    client: reqwest::Client,
    url: String,
}

impl HttpNotifier {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        HttpNotifier { client, url }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, subject: &str, message: &str) {
        let payload = serde_json::json!({
            "subject": subject,
            "message": message,
        });

        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(subject, "Alert delivered");
            }
            Ok(response) => {
                warn!(subject, code = response.status().as_u16(), "Alert webhook rejected");
            }
            Err(e) => {
                warn!(subject, error = %e, "Alert webhook unreachable");
            }
        }
    }
}
