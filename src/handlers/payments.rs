//! Payment initiation and the gateway webhook.
//!
//! Initiation opens an order or intent with the configured gateway, then
//! persists a PENDING payment row. The webhook is the only path that moves
//! a payment out of PENDING; it accepts events permissively (signature
//! verification is not wired up) and always answers 200 so providers do
//! not retry forever.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::middleware::CurrentUser;
use crate::models::{NewPayment, Payment, PaymentProvider, PaymentStatus};
use crate::state::AppState;

fn validated_amount_minor(payload: &NewPayment) -> Result<i64, ApiError> {
    let minor = payload
        .amount_minor()
        .ok_or_else(|| ApiError::validation("amount is out of range"))?;
    if minor <= 0 {
        return Err(ApiError::validation("amount must be positive"));
    }
    Ok(minor)
}

/// POST /api/payments/razorpay/initiate
pub async fn razorpay_initiate(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    AppJson(payload): AppJson<NewPayment>,
) -> Result<impl IntoResponse, ApiError> {
    let amount_minor = validated_amount_minor(&payload)?;

    let order = state
        .gateway
        .create_razorpay_order(amount_minor, &payload.currency)
        .await?;

    let now = Utc::now();
    let payment = Payment {
        id: Uuid::new_v4(),
        user_id: current.user().id,
        provider: PaymentProvider::Razorpay,
        amount: payload.amount,
        currency: payload.currency,
        provider_order_id: Some(order.order_id.clone()),
        provider_payment_id: None,
        status: PaymentStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    let payment = state.store.create_payment(payment).await?;

    Ok(Json(json!({
        "paymentId": payment.id,
        "orderId": order.order_id,
        "amount": payment.amount,
        "currency": payment.currency,
    })))
}

/// POST /api/payments/stripe/create-payment-intent
pub async fn stripe_intent(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    AppJson(payload): AppJson<NewPayment>,
) -> Result<impl IntoResponse, ApiError> {
    let amount_minor = validated_amount_minor(&payload)?;

    let intent = state
        .gateway
        .create_stripe_intent(amount_minor, &payload.currency)
        .await?;

    let now = Utc::now();
    let payment = Payment {
        id: Uuid::new_v4(),
        user_id: current.user().id,
        provider: PaymentProvider::Stripe,
        amount: payload.amount,
        currency: payload.currency,
        provider_order_id: Some(intent.intent_id.clone()),
        provider_payment_id: None,
        status: PaymentStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    let payment = state.store.create_payment(payment).await?;

    Ok(Json(json!({
        "paymentId": payment.id,
        "clientSecret": intent.client_secret,
        "amount": payment.amount,
        "currency": payment.currency,
    })))
}

/// POST /api/payments/webhook - raw body, always 200 `{received: true}`.
/// A `payment.success` event flips the matching PENDING row and notifies
/// the paying user; anything unparseable is logged and dropped.
pub async fn webhook(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(event) => {
            if event["event"].as_str() == Some("payment.success") {
                if let Err(err) = settle_payment(&state, &event).await {
                    tracing::warn!("webhook settlement failed: {}", err);
                }
            }
        }
        Err(err) => tracing::warn!("unparseable webhook body: {}", err),
    }
    Json(json!({ "received": true }))
}

async fn settle_payment(state: &AppState, event: &serde_json::Value) -> Result<(), ApiError> {
    let order_id = event["orderId"]
        .as_str()
        .ok_or_else(|| ApiError::validation("webhook event missing orderId"))?;

    let mut payment = state
        .store
        .payment_by_provider_order(order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Payment not found"))?;

    payment.status = PaymentStatus::Success;
    payment.provider_payment_id = event["paymentId"].as_str().map(str::to_string);
    payment.updated_at = Utc::now();
    let payment = state.store.update_payment(payment).await?;

    state
        .fanout
        .publish(
            "payment:success",
            serde_json::to_value(&payment).unwrap_or_default(),
            &[payment.user_id],
        )
        .await;

    Ok(())
}
