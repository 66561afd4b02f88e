//! Upload notifications
//!
//! Posts a short message to an incoming webhook (Slack format) whenever a
//! document is created. Delivery runs on a spawned task, is bounded by a
//! timeout, is not retried, and its failures are only logged.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;

#[derive(Error, Debug)]
pub enum NotifyError {
    /// The webhook could not be reached or timed out
    #[error("webhook transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The webhook answered with something other than 200
    #[error("webhook answered with status {0}")]
    Status(u16),
}

/// What the notification says about a freshly created document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadNotice {
    pub name: String,
    /// Display path of the containing folder
    pub folder: String,
    /// Topic name, if any
    pub topic: Option<String>,
}

impl UploadNotice {
    pub fn message(&self) -> String {
        format!(
            "New document uploaded:\n\nName: {}\nFolder: {}\nTopic: {}\n",
            self.name,
            self.folder,
            self.topic.as_deref().unwrap_or("None")
        )
    }
}

#[derive(Debug)]
struct Webhook {
    client: reqwest::Client,
    url: String,
}

/// Handle for dispatching upload notifications. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct UploadNotifier {
    webhook: Option<Arc<Webhook>>,
}

impl UploadNotifier {
    /// A notifier that drops every notice.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Builds a notifier for `url` whose calls give up after `timeout`.
    pub fn webhook(url: impl Into<String>, timeout: Duration) -> Self {
        match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => Self {
                webhook: Some(Arc::new(Webhook {
                    client,
                    url: url.into(),
                })),
            },
            Err(e) => {
                warn!(error = %e, "failed to build webhook client, notifications disabled");
                Self::disabled()
            }
        }
    }

    pub fn from_config(config: &Config) -> Self {
        match &config.slack_webhook_url {
            Some(url) => {
                info!("Upload notifications enabled");
                Self::webhook(url.clone(), Duration::from_millis(config.notify_timeout_ms))
            }
            None => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook.is_some()
    }

    /// Sends `notice` in the background. Returns the task handle, or None
    /// when notifications are disabled.
    pub fn dispatch(&self, notice: UploadNotice) -> Option<JoinHandle<()>> {
        let Some(webhook) = self.webhook.clone() else {
            debug!(document = %notice.name, "notifications disabled, skipping");
            return None;
        };

        Some(tokio::spawn(async move {
            match send(&webhook, &notice).await {
                Ok(()) => debug!(document = %notice.name, "upload notification delivered"),
                Err(e) => warn!(document = %notice.name, error = %e, "upload notification failed"),
            }
        }))
    }
}

async fn send(webhook: &Webhook, notice: &UploadNotice) -> Result<(), NotifyError> {
    let response = webhook
        .client
        .post(&webhook.url)
        .json(&json!({ "text": notice.message() }))
        .send()
        .await?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(NotifyError::Status(status.as_u16()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(topic: Option<&str>) -> UploadNotice {
        UploadNotice {
            name: "Report".to_string(),
            folder: "Parent/Child".to_string(),
            topic: topic.map(str::to_string),
        }
    }

    #[test]
    fn test_message_format() {
        assert_eq!(
            notice(Some("Finance")).message(),
            "New document uploaded:\n\nName: Report\nFolder: Parent/Child\nTopic: Finance\n"
        );
    }

    #[test]
    fn test_message_without_topic() {
        assert!(notice(None).message().ends_with("Topic: None\n"));
    }

    #[test]
    fn test_from_config_without_url_is_disabled() {
        let notifier = UploadNotifier::from_config(&Config::default());
        assert!(!notifier.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_dispatch_is_noop() {
        assert!(UploadNotifier::disabled().dispatch(notice(None)).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_webhook_does_not_panic() {
        let notifier =
            UploadNotifier::webhook("http://127.0.0.1:9/hook", Duration::from_millis(500));

        let handle = notifier.dispatch(notice(None)).unwrap();
        assert!(handle.await.is_ok());
    }
}
