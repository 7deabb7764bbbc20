//! HTTP payment gateway.
//!
//! Talks to the external processor's payment-intent API over HTTPS. Every
//! request carries a bounded timeout, and retries are capped at one:
//! authorization creation is retried only when the request demonstrably
//! never reached the processor (connect error), because a blind retry of
//! a request that may have landed risks a duplicate authorization.

use async_trait::async_trait;
use serde::Deserialize;

use reg_core::constants::{CURRENCY, GATEWAY_MAX_RETRIES, GATEWAY_TIMEOUT_SECS};
use reg_core::payment::{
    AuthorizationStatus, CreateAuthorization, PaymentAuthorization, PaymentError, PaymentProcessor,
    PaymentResult,
};
use reg_core::types::PaymentRef;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the processor API.
    pub base_url: String,
    /// Secret API key, sent as a bearer token. Never persisted.
    pub secret_key: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.stripe.com".to_string(),
            secret_key: String::new(),
            timeout_secs: GATEWAY_TIMEOUT_SECS,
            max_retries: GATEWAY_MAX_RETRIES,
        }
    }
}

/// HTTP implementation of [`PaymentProcessor`].
pub struct HttpPaymentGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    status: String,
}

impl HttpPaymentGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config: GatewayConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
            client,
        }
    }

    fn parse_status(raw: &str) -> PaymentResult<AuthorizationStatus> {
        match raw {
            "requires_payment_method" | "requires_confirmation" | "requires_capture" => {
                Ok(AuthorizationStatus::RequiresPayment)
            }
            "requires_action" => Ok(AuthorizationStatus::RequiresAction),
            "processing" => Ok(AuthorizationStatus::Processing),
            "succeeded" => Ok(AuthorizationStatus::Succeeded),
            "canceled" => Ok(AuthorizationStatus::Canceled),
            other => Err(PaymentError::InvalidResponse(format!(
                "unrecognized intent status '{}'",
                other
            ))),
        }
    }

    async fn post_intent(&self, request: &CreateAuthorization) -> PaymentResult<IntentResponse> {
        let url = format!("{}/v1/payment_intents", self.config.base_url);
        let amount = request.amount_cents.to_string();
        let form: Vec<(&str, &str)> = vec![
            ("amount", amount.as_str()),
            ("currency", &request.currency),
            ("metadata[correlation_id]", request.metadata.correlation_id.as_str()),
            ("metadata[event]", request.metadata.event.as_str()),
            ("metadata[email]", &request.metadata.email),
            ("metadata[participant]", &request.metadata.participant),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    PaymentError::Unavailable(format!("connect failed: {}", e))
                } else {
                    PaymentError::Unavailable(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::PAYMENT_REQUIRED {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Declined(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Unavailable(format!(
                "processor returned {}: {}",
                status, body
            )));
        }

        response
            .json::<IntentResponse>()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }

    async fn get_intent(&self, payment_ref: &PaymentRef) -> PaymentResult<RetrieveResponse> {
        let url = format!(
            "{}/v1/payment_intents/{}",
            self.config.base_url, payment_ref.0
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.secret_key)
            .send()
            .await
            .map_err(|e| PaymentError::Unavailable(format!("request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PaymentError::UnknownReference(payment_ref.0.clone()));
        }
        if !response.status().is_success() {
            return Err(PaymentError::Unavailable(format!(
                "processor returned {}",
                response.status()
            )));
        }

        response
            .json::<RetrieveResponse>()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PaymentProcessor for HttpPaymentGateway {
    async fn create_authorization(
        &self,
        request: &CreateAuthorization,
    ) -> PaymentResult<PaymentAuthorization> {
        debug_assert_eq!(request.currency, CURRENCY);

        let mut attempt = 0u32;
        let response = loop {
            match self.post_intent(request).await {
                Ok(response) => break response,
                // Retry only a connect failure: the request never reached
                // the processor, so no authorization can exist for it.
                Err(PaymentError::Unavailable(ref detail))
                    if detail.starts_with("connect failed")
                        && attempt < self.config.max_retries =>
                {
                    attempt += 1;
                    tracing::warn!(
                        correlation_id = %request.metadata.correlation_id,
                        attempt,
                        "authorization create retrying after connect failure"
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                }
                Err(e) => return Err(e),
            }
        };

        let status = Self::parse_status(&response.status)?;
        Ok(PaymentAuthorization {
            payment_ref: PaymentRef(response.id),
            client_secret: response.client_secret,
            status,
        })
    }

    async fn retrieve_status(
        &self,
        payment_ref: &PaymentRef,
    ) -> PaymentResult<AuthorizationStatus> {
        let mut attempt = 0u32;
        let response = loop {
            match self.get_intent(payment_ref).await {
                Ok(response) => break response,
                Err(PaymentError::Unavailable(_)) if attempt < self.config.max_retries => {
                    attempt += 1;
                    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                }
                Err(e) => return Err(e),
            }
        };
        Self::parse_status(&response.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            HttpPaymentGateway::parse_status("succeeded").unwrap(),
            AuthorizationStatus::Succeeded
        );
        assert_eq!(
            HttpPaymentGateway::parse_status("requires_payment_method").unwrap(),
            AuthorizationStatus::RequiresPayment
        );
        assert_eq!(
            HttpPaymentGateway::parse_status("processing").unwrap(),
            AuthorizationStatus::Processing
        );
        assert!(HttpPaymentGateway::parse_status("minted").is_err());
    }

    #[test]
    fn test_base_url_is_normalized() {
        let gateway = HttpPaymentGateway::new(GatewayConfig {
            base_url: "https://api.example.com/".to_string(),
            ..GatewayConfig::default()
        });
        assert_eq!(gateway.config.base_url, "https://api.example.com");
    }
}
