//! Router assembly. Auth routes and the health probe are public; every
//! other `/api` route sits behind the bearer-token guard. The websocket
//! endpoint is public and scopes itself through its join frame.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config;
use crate::handlers::{ai, auth, cases, drafts, payments, users, ws};
use crate::middleware::{authenticate, require_role};
use crate::models::Role;
use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/ws", get(ws::upgrade))
        .merge(auth_routes())
        .merge(protected_routes(state.clone()))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
}

fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/me", get(users::me_get).patch(users::me_update))
        .route("/api/cases", post(cases::create).get(cases::list))
        .route(
            "/api/cases/:id",
            get(cases::get_by_id).patch(cases::update),
        )
        .route("/api/drafts", post(drafts::create))
        .route(
            "/api/drafts/:id",
            get(drafts::get_by_id).patch(drafts::update),
        )
        .route(
            "/api/ai/draft",
            post(ai::generate).route_layer(from_fn(require_role(&[Role::Lawyer]))),
        )
        .route("/api/payments/razorpay/initiate", post(payments::razorpay_initiate))
        .route(
            "/api/payments/stripe/create-payment-intent",
            post(payments::stripe_intent),
        )
        .route("/api/payments/webhook", post(payments::webhook))
        .route_layer(from_fn_with_state(state, authenticate))
}

fn cors_layer() -> CorsLayer {
    let origins = &config::config().server.cors_origins;
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(parsed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339(),
    }))
}
