mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{create_case, json_body, register, request, test_app};
use serde_json::json;

#[tokio::test]
async fn draft_creation_is_authored_by_the_caller() -> Result<()> {
    let app = test_app();
    let (lawyer, token) = register(&app, "LAWYER", "author@x.com").await?;
    let case = create_case(&app, &token, "Writ matter", json!({})).await?;

    let response = request(
        &app,
        "POST",
        "/api/drafts",
        Some(&token),
        Some(json!({
            "caseId": case["id"],
            "petitionType": "WRIT",
            "content": { "body": "facts go here" },
        })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let draft = json_body(response).await?;
    assert_eq!(draft["lawyerId"], lawyer["id"]);
    assert_eq!(draft["status"], "DRAFT");
    assert_eq!(draft["content"]["body"], "facts go here");
    Ok(())
}

#[tokio::test]
async fn draft_creation_requires_an_existing_case() -> Result<()> {
    let app = test_app();
    let (_, token) = register(&app, "LAWYER", "nocase@x.com").await?;

    let response = request(
        &app,
        "POST",
        "/api/drafts",
        Some(&token),
        Some(json!({
            "caseId": uuid::Uuid::new_v4(),
            "petitionType": "WRIT",
            "content": {},
        })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn drafts_are_visible_only_to_their_author() -> Result<()> {
    let app = test_app();
    let (_, author_token) = register(&app, "LAWYER", "scoped-author@x.com").await?;
    let (_, other_token) = register(&app, "LAWYER", "scoped-other@x.com").await?;
    let case = create_case(&app, &author_token, "Scoped", json!({})).await?;

    let created = request(
        &app,
        "POST",
        "/api/drafts",
        Some(&author_token),
        Some(json!({ "caseId": case["id"], "petitionType": "APPEAL", "content": {} })),
    )
    .await?;
    let draft_id = json_body(created).await?["id"].as_str().unwrap().to_string();

    let forbidden = request(
        &app,
        "GET",
        &format!("/api/drafts/{}", draft_id),
        Some(&other_token),
        None,
    )
    .await?;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let missing = request(
        &app,
        "GET",
        &format!("/api/drafts/{}", uuid::Uuid::new_v4()),
        Some(&other_token),
        None,
    )
    .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let allowed = request(
        &app,
        "GET",
        &format!("/api/drafts/{}", draft_id),
        Some(&author_token),
        None,
    )
    .await?;
    assert_eq!(allowed.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn status_patch_leaves_authorship_and_content_untouched() -> Result<()> {
    let app = test_app();
    let (lawyer, token) = register(&app, "LAWYER", "statuspatch@x.com").await?;
    let case = create_case(&app, &token, "Status only", json!({})).await?;

    let created = request(
        &app,
        "POST",
        "/api/drafts",
        Some(&token),
        Some(json!({
            "caseId": case["id"],
            "petitionType": "WRIT",
            "content": { "body": "original" },
        })),
    )
    .await?;
    let draft_id = json_body(created).await?["id"].as_str().unwrap().to_string();

    let patched = request(
        &app,
        "PATCH",
        &format!("/api/drafts/{}", draft_id),
        Some(&token),
        Some(json!({ "status": "SUBMITTED" })),
    )
    .await?;
    assert_eq!(patched.status(), StatusCode::OK);
    let draft = json_body(patched).await?;
    assert_eq!(draft["status"], "SUBMITTED");
    assert_eq!(draft["lawyerId"], lawyer["id"]);
    assert_eq!(draft["content"]["body"], "original");

    // Authorship is not patchable at all.
    let rejected = request(
        &app,
        "PATCH",
        &format!("/api/drafts/{}", draft_id),
        Some(&token),
        Some(json!({ "lawyerId": uuid::Uuid::new_v4() })),
    )
    .await?;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn ai_draft_is_lawyer_only() -> Result<()> {
    let app = test_app();
    let (_, client_token) = register(&app, "CLIENT", "ai-client@x.com").await?;
    let case = create_case(&app, &client_token, "AI case", json!({})).await?;

    let response = request(
        &app,
        "POST",
        "/api/ai/draft",
        Some(&client_token),
        Some(json!({
            "caseId": case["id"],
            "petitionType": "WRIT",
            "facts": "some facts",
        })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn ai_draft_generates_with_provenance_metadata() -> Result<()> {
    let app = test_app();
    let (lawyer, token) = register(&app, "LAWYER", "ai-lawyer@x.com").await?;
    let case = create_case(&app, &token, "AI generated", json!({})).await?;

    let response = request(
        &app,
        "POST",
        "/api/ai/draft",
        Some(&token),
        Some(json!({
            "caseId": case["id"],
            "petitionType": "BAIL",
            "facts": "arrested on Tuesday",
        })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let draft = json_body(response).await?;
    assert_eq!(draft["lawyerId"], lawyer["id"]);
    assert_eq!(draft["aiMetadata"]["model"], "stub-model");
    assert_eq!(draft["aiMetadata"]["tokensUsed"], 42);
    assert!(draft["content"]["body"].as_str().unwrap().contains("BAIL"));
    Ok(())
}

#[tokio::test]
async fn ai_draft_rate_limit_returns_429_past_the_allowance() -> Result<()> {
    let app = test_app();
    let (_, token) = register(&app, "LAWYER", "ai-limit@x.com").await?;
    let case = create_case(&app, &token, "Rate limited", json!({})).await?;

    let payload = json!({
        "caseId": case["id"],
        "petitionType": "WRIT",
        "facts": "again and again",
    });

    for _ in 0..5 {
        let ok = request(&app, "POST", "/api/ai/draft", Some(&token), Some(payload.clone()))
            .await?;
        assert_eq!(ok.status(), StatusCode::CREATED);
    }

    let limited = request(&app, "POST", "/api/ai/draft", Some(&token), Some(payload)).await?;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);

    // Another lawyer is unaffected.
    let (_, fresh_token) = register(&app, "LAWYER", "ai-fresh@x.com").await?;
    let fresh_case = create_case(&app, &fresh_token, "Fresh allowance", json!({})).await?;
    let fresh = request(
        &app,
        "POST",
        "/api/ai/draft",
        Some(&fresh_token),
        Some(json!({
            "caseId": fresh_case["id"],
            "petitionType": "WRIT",
            "facts": "unrelated",
        })),
    )
    .await?;
    assert_eq!(fresh.status(), StatusCode::CREATED);
    Ok(())
}
