// src/utils/http.rs

//! Failure notifications over HTTP.
//!
//! The endpoint is a Bark-style push URL: the message is appended as a single
//! percent-encoded path segment and delivered with a plain GET.

use std::time::Duration;

use crate::error::Result;
use crate::models::NotifyConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &NotifyConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Sends failure messages to a push endpoint.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl Notifier {
    /// A notifier for `endpoint`; `None` or an empty string disables it.
    pub fn new(config: &NotifyConfig, endpoint: Option<String>) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            endpoint: endpoint.filter(|e| !e.trim().is_empty()),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Deliver `message`. Returns whether the endpoint answered 200.
    pub async fn notify(&self, message: &str) -> Result<bool> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(false);
        };

        log::info!("Sending notification: {}", message.lines().next().unwrap_or_default());
        let response = self.client.get(message_url(endpoint, message)).send().await?;
        let ok = response.status() == reqwest::StatusCode::OK;
        if !ok {
            log::warn!("Notification endpoint answered {}", response.status());
        }
        Ok(ok)
    }
}

/// URL delivering `message` to `endpoint`.
///
/// Slashes in the message would split the path, so they become backslashes.
pub fn message_url(endpoint: &str, message: &str) -> String {
    let message = message.replace('/', "\\");
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        urlencoding::encode(&message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_url_encodes_message() {
        assert_eq!(
            message_url("https://api.day.app/KEY/", "Exception\nat /vault/a.md"),
            "https://api.day.app/KEY/Exception%0Aat%20%5Cvault%5Ca.md"
        );
    }

    #[test]
    fn test_empty_endpoint_disables() {
        let config = NotifyConfig::default();
        assert!(!Notifier::new(&config, None).unwrap().is_enabled());
        assert!(!Notifier::new(&config, Some("  ".into())).unwrap().is_enabled());
        assert!(Notifier::new(&config, Some("https://api.day.app/KEY".into()))
            .unwrap()
            .is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_notifier_sends_nothing() {
        let notifier = Notifier::new(&NotifyConfig::default(), None).unwrap();
        assert!(!notifier.notify("Exception\nboom").await.unwrap());
    }
}
