//! Payment gateway collaborator: Razorpay order creation and Stripe
//! PaymentIntent creation. Webhook signature verification is not wired up
//! yet; the webhook route accepts events permissively.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;
use uuid::Uuid;

use crate::config;

use super::UpstreamError;

/// Provider-assigned handle for a Razorpay order.
#[derive(Debug, Clone)]
pub struct RazorpayOrder {
    pub order_id: String,
}

/// Provider-assigned handle for a Stripe PaymentIntent.
#[derive(Debug, Clone)]
pub struct StripeIntent {
    pub intent_id: String,
    pub client_secret: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a Razorpay order. Amount is in the currency's minor unit.
    async fn create_razorpay_order(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<RazorpayOrder, UpstreamError>;

    /// Open a Stripe PaymentIntent. Amount is in the currency's minor unit.
    async fn create_stripe_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<StripeIntent, UpstreamError>;
}

pub struct HttpPaymentGateway {
    client: reqwest::Client,
}

impl HttpPaymentGateway {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_razorpay_order(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<RazorpayOrder, UpstreamError> {
        let payments = &config::config().payments;
        let auth = BASE64.encode(format!(
            "{}:{}",
            payments.razorpay_key_id, payments.razorpay_key_secret
        ));

        let response = self
            .client
            .post("https://api.razorpay.com/v1/orders")
            .header("authorization", format!("Basic {}", auth))
            .json(&json!({
                "amount": amount_minor,
                "currency": currency,
                "receipt": format!("receipt_{}", chrono::Utc::now().timestamp_millis()),
            }))
            .send()
            .await
            .map_err(|e| UpstreamError::Http("razorpay", e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpstreamError::BadResponse(
                "razorpay",
                format!("status {}", response.status()),
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::BadResponse("razorpay", e.to_string()))?;
        let order_id = body["id"]
            .as_str()
            .ok_or_else(|| UpstreamError::BadResponse("razorpay", "missing order id".into()))?
            .to_string();

        Ok(RazorpayOrder { order_id })
    }

    async fn create_stripe_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<StripeIntent, UpstreamError> {
        let payments = &config::config().payments;

        let response = self
            .client
            .post("https://api.stripe.com/v1/payment_intents")
            .bearer_auth(&payments.stripe_secret_key)
            .form(&[
                ("amount", amount_minor.to_string()),
                ("currency", currency.to_lowercase()),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::Http("stripe", e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpstreamError::BadResponse(
                "stripe",
                format!("status {}", response.status()),
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::BadResponse("stripe", e.to_string()))?;
        let intent_id = body["id"]
            .as_str()
            .ok_or_else(|| UpstreamError::BadResponse("stripe", "missing intent id".into()))?
            .to_string();
        let client_secret = body["client_secret"]
            .as_str()
            .ok_or_else(|| UpstreamError::BadResponse("stripe", "missing client secret".into()))?
            .to_string();

        Ok(StripeIntent {
            intent_id,
            client_secret,
        })
    }
}

/// Offline gateway issuing unique provider-shaped handles without network
/// calls. Used in development sandboxes and by the integration tests.
pub struct StubPaymentGateway;

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn create_razorpay_order(
        &self,
        _amount_minor: i64,
        _currency: &str,
    ) -> Result<RazorpayOrder, UpstreamError> {
        Ok(RazorpayOrder {
            order_id: format!("order_{}", Uuid::new_v4().simple()),
        })
    }

    async fn create_stripe_intent(
        &self,
        _amount_minor: i64,
        _currency: &str,
    ) -> Result<StripeIntent, UpstreamError> {
        let id = Uuid::new_v4().simple();
        Ok(StripeIntent {
            intent_id: format!("pi_{}", id),
            client_secret: format!("pi_{}_secret", id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_gateway_issues_distinct_order_ids() {
        let gateway = StubPaymentGateway;
        let first = gateway.create_razorpay_order(100, "INR").await.unwrap();
        let second = gateway.create_razorpay_order(100, "INR").await.unwrap();
        assert_ne!(first.order_id, second.order_id);
    }
}
