//! Authentication endpoints.
//!
//! - POST /api/auth/register
//! - POST /api/auth/login
//! - POST /api/auth/refresh
//! - POST /api/auth/logout
//!
//! Access tokens are returned in the JSON body; refresh tokens travel only
//! in an HTTP-only SameSite=Strict cookie.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{issue_token, verify_token, TokenKind};
use crate::config;
use crate::error::ApiError;
use crate::extract::{AppJson, JsonOrMultipart};
use crate::models::{NewUser, Role, Subscription, User};
use crate::state::AppState;

const REFRESH_COOKIE: &str = "refresh_token";

fn refresh_cookie(token: &str) -> String {
    let security = &config::config().security;
    let max_age = security.refresh_token_days * 24 * 60 * 60;
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        REFRESH_COOKIE, token, max_age
    );
    if security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_refresh_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", REFRESH_COOKIE)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|part| {
        part.trim()
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
            .map(|v| v.to_string())
    })
}

/// POST /api/auth/register - create an account and log it in.
///
/// Lawyers must supply a bar identifier; a firm logo may ride along as a
/// multipart file part. 409 when the email is already registered.
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: JsonOrMultipart<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let JsonOrMultipart { payload, files } = body;

    if payload.role == Role::Lawyer && payload.bar_number.as_deref().unwrap_or("").is_empty() {
        return Err(ApiError::validation("barNumber is required for lawyers"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("password is required"));
    }

    // Firm logo is uploaded before the user record is persisted; an upload
    // failure aborts registration with nothing stored.
    let mut firm_logo_url = payload.firm_logo_url.clone();
    if let Some(file) = files.first() {
        firm_logo_url = Some(state.blob.upload(file).await?.url);
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email.to_lowercase(),
        password_hash: hash_password(&payload.password)?,
        role: payload.role,
        country: payload.country,
        bar_number: payload.bar_number,
        is_firm: payload.is_firm,
        firm_name: payload.firm_name,
        firm_logo_url,
        phone: payload.phone,
        address: payload.address,
        subscription: Subscription::default(),
        created_at: now,
        updated_at: now,
    };

    let user = state.store.create_user(user).await?;

    let access_token = issue_token(user.id, user.role, TokenKind::Access)?;
    let refresh_token = issue_token(user.id, user.role, TokenKind::Refresh)?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, refresh_cookie(&refresh_token))],
        Json(json!({ "user": user, "accessToken": access_token })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login - 401 on unknown email or bad password, with the
/// same message for both so the two are indistinguishable.
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .user_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let access_token = issue_token(user.id, user.role, TokenKind::Access)?;
    let refresh_token = issue_token(user.id, user.role, TokenKind::Refresh)?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, refresh_cookie(&refresh_token))],
        Json(json!({ "user": user, "accessToken": access_token })),
    ))
}

/// POST /api/auth/refresh - mint a new access token from the refresh
/// cookie. 401 when the cookie is absent, 403 when it does not verify.
pub async fn refresh(headers: HeaderMap) -> Result<impl IntoResponse, ApiError> {
    let token = cookie_value(&headers, REFRESH_COOKIE)
        .ok_or_else(|| ApiError::unauthorized("No refresh token provided"))?;

    let claims = verify_token(&token, TokenKind::Refresh)
        .map_err(|_| ApiError::forbidden("Invalid refresh token"))?;

    let access_token = issue_token(claims.sub, claims.role, TokenKind::Access)?;
    Ok(Json(json!({ "accessToken": access_token })))
}

/// POST /api/auth/logout - clears the refresh cookie. No server-side state
/// to revoke.
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_refresh_cookie())],
        Json(json!({ "message": "Logged out" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_parsing_handles_multiple_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; refresh_token=abc.def; lang=en".parse().unwrap(),
        );
        assert_eq!(cookie_value(&headers, REFRESH_COOKIE).unwrap(), "abc.def");
        assert!(cookie_value(&headers, "session").is_none());
    }

    #[test]
    fn refresh_cookie_is_http_only_and_strict() {
        let cookie = refresh_cookie("tok");
        assert!(cookie.starts_with("refresh_token=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
    }
}
