//! Outbound webhook POST over reqwest

use crate::ports::{IntegrationError, WebhookPoster};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct HttpWebhookPoster {
    client: Client,
}

impl HttpWebhookPoster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookPoster for HttpWebhookPoster {
    async fn post_json(
        &self,
        url: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<(), IntegrationError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IntegrationError::Timeout(timeout)
                } else {
                    IntegrationError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(IntegrationError::Status { status, body });
        }
        Ok(())
    }
}
