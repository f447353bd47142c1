//! Shared helpers for the integration tests. The router is driven
//! in-process via `tower::ServiceExt::oneshot`, backed by the in-memory
//! store and the offline collaborators, so the suite needs no database or
//! network.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use lexcase_api::services::{LocalBlobStore, StubDraftGenerator, StubPaymentGateway};
use lexcase_api::store::MemoryStore;
use lexcase_api::{app, AppState};

pub fn test_app() -> Router {
    let state = Arc::new(AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(LocalBlobStore),
        Arc::new(StubPaymentGateway),
        Arc::new(StubDraftGenerator),
    ));
    app(state)
}

/// Fire one request at the router. `token` becomes a bearer header when
/// present; `body` is sent as JSON.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<Response<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))?,
        None => builder.body(Body::empty())?,
    };
    Ok(app.clone().oneshot(request).await?)
}

pub async fn json_body(response: Response<Body>) -> Result<Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

/// Register a user and return `(user, access_token)`. Lawyers get a bar
/// number so registration always passes validation.
pub async fn register(app: &Router, role: &str, email: &str) -> Result<(Value, String)> {
    let mut payload = json!({
        "name": format!("{} user", role.to_lowercase()),
        "email": email,
        "password": "secret1",
        "role": role,
        "country": "INDIA",
    });
    if role == "LAWYER" {
        payload["barNumber"] = json!("BAR-1234");
    }

    let response = request(app, "POST", "/api/auth/register", None, Some(payload)).await?;
    anyhow::ensure!(
        response.status() == 201,
        "registration failed: {}",
        response.status()
    );
    let body = json_body(response).await?;
    let token = body["accessToken"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no access token in response"))?
        .to_string();
    Ok((body["user"].clone(), token))
}

/// Create a case as the given principal and return its JSON document.
pub async fn create_case(
    app: &Router,
    token: &str,
    title: &str,
    extra: Value,
) -> Result<Value> {
    let mut payload = json!({ "title": title });
    if let Some(object) = extra.as_object() {
        for (key, value) in object {
            payload[key] = value.clone();
        }
    }
    let response = request(app, "POST", "/api/cases", Some(token), Some(payload)).await?;
    anyhow::ensure!(
        response.status() == 201,
        "case creation failed: {}",
        response.status()
    );
    json_body(response).await
}
