//! Stripe integration via REST API (no SDK dependency)

use crate::core::Config;
use crate::ports::{IntegrationError, StripeTransferClient};
use async_trait::async_trait;
use reqwest::Client;
use shared::models::{TransferIntent, TransferIntentRequest};

/// Creates `customer_balance` bank-transfer payment intents
#[derive(Debug, Clone)]
pub struct StripeApiClient {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeApiClient {
    pub fn new(client: Client, api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(client, &config.stripe_api_base, &config.stripe_secret_key)
    }
}

/// Form body for a confirmed MX bank-transfer intent
fn transfer_intent_form(request: &TransferIntentRequest) -> Vec<(&'static str, String)> {
    vec![
        ("amount", request.amount_cents.to_string()),
        ("currency", request.currency.to_lowercase()),
        ("customer", request.customer_id.clone()),
        ("description", request.description.clone()),
        ("payment_method_types[]", "customer_balance".to_string()),
        ("payment_method_data[type]", "customer_balance".to_string()),
        (
            "payment_method_options[customer_balance][funding_type]",
            "bank_transfer".to_string(),
        ),
        (
            "payment_method_options[customer_balance][bank_transfer][type]",
            "mx_bank_transfer".to_string(),
        ),
        ("metadata[orden_id]", request.orden_id.to_string()),
        ("confirm", "true".to_string()),
    ]
}

#[async_trait]
impl StripeTransferClient for StripeApiClient {
    async fn create_transfer_payment_intent(
        &self,
        request: &TransferIntentRequest,
    ) -> Result<TransferIntent, IntegrationError> {
        let resp: serde_json::Value = self
            .client
            .post(format!("{}/payment_intents", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&transfer_intent_form(request))
            .send()
            .await?
            .json()
            .await?;

        if let Some(message) = resp["error"]["message"].as_str() {
            return Err(IntegrationError::Stripe(message.to_string()));
        }
        let id = resp["id"]
            .as_str()
            .ok_or_else(|| IntegrationError::Stripe(format!("create payment intent failed: {resp}")))?;

        Ok(TransferIntent {
            id: id.to_string(),
            status: resp["status"].as_str().unwrap_or("unknown").to_string(),
            amount_cents: resp["amount"].as_i64().unwrap_or(request.amount_cents),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_transfer_intent_form() {
        let orden_id = Uuid::new_v4();
        let form = transfer_intent_form(&TransferIntentRequest {
            customer_id: "cus_123".into(),
            amount_cents: 15_050,
            currency: "MXN".into(),
            orden_id,
            description: "Pedido 7".into(),
        });
        let get = |k: &str| form.iter().find(|(key, _)| *key == k).map(|(_, v)| v.as_str());

        assert_eq!(get("amount"), Some("15050"));
        assert_eq!(get("currency"), Some("mxn"));
        assert_eq!(get("confirm"), Some("true"));
        assert_eq!(
            get("payment_method_options[customer_balance][bank_transfer][type]"),
            Some("mx_bank_transfer")
        );
        assert_eq!(get("metadata[orden_id]"), Some(orden_id.to_string().as_str()));
    }

    #[test]
    fn test_api_base_trailing_slash() {
        let client = StripeApiClient::new(Client::new(), "http://localhost:12111/v1/", "sk_test");
        assert_eq!(client.api_base, "http://localhost:12111/v1");
    }
}
