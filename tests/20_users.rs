mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{json_body, register, request, test_app};
use serde_json::json;

#[tokio::test]
async fn me_requires_authentication() -> Result<()> {
    let app = test_app();
    let response = request(&app, "GET", "/api/users/me", None, None).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let garbage = request(&app, "GET", "/api/users/me", Some("not.a.token"), None).await?;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn me_returns_the_profile_without_the_secret() -> Result<()> {
    let app = test_app();
    let (_, token) = register(&app, "LAWYER", "me@x.com").await?;

    let response = request(&app, "GET", "/api/users/me", Some(&token), None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["email"], "me@x.com");
    assert_eq!(body["role"], "LAWYER");
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn profile_patch_touches_only_named_fields() -> Result<()> {
    let app = test_app();
    let (user, token) = register(&app, "LAWYER", "patch@x.com").await?;

    let response = request(
        &app,
        "PATCH",
        "/api/users/me",
        Some(&token),
        Some(json!({ "phone": "+91-555", "firmName": "Patch & Co" })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["phone"], "+91-555");
    assert_eq!(body["firmName"], "Patch & Co");
    // Untouched fields survive.
    assert_eq!(body["name"], user["name"]);
    assert_eq!(body["barNumber"], user["barNumber"]);
    Ok(())
}

#[tokio::test]
async fn profile_patch_rejects_unknown_fields() -> Result<()> {
    let app = test_app();
    let (_, token) = register(&app, "CLIENT", "strict@x.com").await?;

    // Role is not on the allow-list, so the whole patch is rejected.
    let response = request(
        &app,
        "PATCH",
        "/api/users/me",
        Some(&token),
        Some(json!({ "role": "LAWYER" })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn password_change_requires_a_non_empty_value() -> Result<()> {
    let app = test_app();
    let (_, token) = register(&app, "CLIENT", "pw@x.com").await?;

    let empty = request(
        &app,
        "PATCH",
        "/api/users/me",
        Some(&token),
        Some(json!({ "password": "" })),
    )
    .await?;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let changed = request(
        &app,
        "PATCH",
        "/api/users/me",
        Some(&token),
        Some(json!({ "password": "newsecret" })),
    )
    .await?;
    assert_eq!(changed.status(), StatusCode::OK);

    // The new password logs in, the old one does not.
    let login = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "pw@x.com", "password": "newsecret" })),
    )
    .await?;
    assert_eq!(login.status(), StatusCode::OK);

    let stale = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "pw@x.com", "password": "secret1" })),
    )
    .await?;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
