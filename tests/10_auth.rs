mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};
use common::{json_body, request, test_app};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = test_app();
    let response = request(&app, "GET", "/api/health", None, None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["status"], "ok");
    assert!(body["time"].is_string());
    Ok(())
}

#[tokio::test]
async fn lawyer_registration_requires_bar_number() -> Result<()> {
    let app = test_app();
    let response = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "No Bar",
            "email": "nobar@x.com",
            "password": "secret1",
            "role": "LAWYER",
            "country": "INDIA",
        })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await?;
    assert!(body["error"].as_str().unwrap().contains("barNumber"));

    // Same payload with a bar number succeeds.
    let response = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "With Bar",
            "email": "withbar@x.com",
            "password": "secret1",
            "role": "LAWYER",
            "country": "INDIA",
            "barNumber": "BAR-9",
        })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn registration_sets_refresh_cookie_and_omits_secret() -> Result<()> {
    let app = test_app();
    let response = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Ann",
            "email": "ann@x.com",
            "password": "secret1",
            "role": "CLIENT",
            "country": "US",
        })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()?
        .to_string();
    assert!(cookie.starts_with("refresh_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));

    let body = json_body(response).await?;
    assert!(body["accessToken"].is_string());
    assert_eq!(body["user"]["email"], "ann@x.com");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts_case_insensitively() -> Result<()> {
    let app = test_app();
    common::register(&app, "CLIENT", "dupe@x.com").await?;

    let response = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Other",
            "email": "DUPE@X.COM",
            "password": "secret1",
            "role": "CLIENT",
            "country": "INDIA",
        })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await?;
    assert_eq!(body["error"], "Email already registered");
    Ok(())
}

#[tokio::test]
async fn login_issues_token_and_rejects_bad_credentials() -> Result<()> {
    let app = test_app();
    common::register(&app, "CLIENT", "login@x.com").await?;

    let response = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "login@x.com", "password": "secret1" })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert!(body["accessToken"].is_string());

    // Wrong password and unknown email are indistinguishable.
    let bad_password = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "login@x.com", "password": "wrong" })),
    )
    .await?;
    assert_eq!(bad_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(bad_password).await?["error"], "Invalid credentials");

    let unknown = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@x.com", "password": "secret1" })),
    )
    .await?;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(unknown).await?["error"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn refresh_flow_mints_new_access_tokens() -> Result<()> {
    let app = test_app();
    let response = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "R",
            "email": "refresh@x.com",
            "password": "secret1",
            "role": "CLIENT",
            "country": "INDIA",
        })),
    )
    .await?;
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()?
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let refreshed = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/auth/refresh")
                .header(header::COOKIE, cookie)
                .body(axum::body::Body::empty())?,
        )
        .await?;
    assert_eq!(refreshed.status(), StatusCode::OK);
    let body = json_body(refreshed).await?;
    let access = body["accessToken"].as_str().unwrap();

    // The minted token authenticates protected routes.
    let me = request(&app, "GET", "/api/users/me", Some(access), None).await?;
    assert_eq!(me.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn refresh_distinguishes_absent_from_invalid() -> Result<()> {
    let app = test_app();

    let absent = request(&app, "POST", "/api/auth/refresh", None, None).await?;
    assert_eq!(absent.status(), StatusCode::UNAUTHORIZED);

    let invalid = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/auth/refresh")
                .header(header::COOKIE, "refresh_token=not.a.token")
                .body(axum::body::Body::empty())?,
        )
        .await?;
    assert_eq!(invalid.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn access_token_does_not_work_as_refresh_token() -> Result<()> {
    let app = test_app();
    let (_, access) = common::register(&app, "CLIENT", "crosskey@x.com").await?;

    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/auth/refresh")
                .header(header::COOKIE, format!("refresh_token={}", access))
                .body(axum::body::Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn logout_clears_the_refresh_cookie() -> Result<()> {
    let app = test_app();
    let response = request(&app, "POST", "/api/auth/logout", None, None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()?;
    assert!(cookie.starts_with("refresh_token=;"));
    assert!(cookie.contains("Max-Age=0"));
    Ok(())
}
