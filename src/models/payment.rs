use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentProvider {
    Razorpay,
    Stripe,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::Razorpay => "RAZORPAY",
            PaymentProvider::Stripe => "STRIPE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RAZORPAY" => Some(PaymentProvider::Razorpay),
            "STRIPE" => Some(PaymentProvider::Stripe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(PaymentStatus::Pending),
            "SUCCESS" => Some(PaymentStatus::Success),
            "FAILED" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// Payment initiation record. Created PENDING when an order or intent is
/// opened with a gateway; flipped to SUCCESS/FAILED only by the webhook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: PaymentProvider,
    pub amount: Decimal,
    pub currency: String,
    pub provider_order_id: Option<String>,
    pub provider_payment_id: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Initiation payload. Amount is in major units of the given ISO currency.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPayment {
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl NewPayment {
    /// Gateway APIs take the amount in the currency's minor unit.
    pub fn amount_minor(&self) -> Option<i64> {
        (self.amount * Decimal::from(100)).round().to_i64()
    }
}
