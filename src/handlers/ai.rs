//! AI-assisted draft generation. The endpoint is lawyer-only (enforced at
//! the route layer) and sits behind a per-user rate limit because each call
//! is assumed to be expensive once the real generator lands.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::middleware::CurrentUser;
use crate::models::{Draft, DraftStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDraftRequest {
    pub case_id: Uuid,
    pub petition_type: String,
    pub facts: String,
}

/// POST /api/ai/draft - generate a draft and persist it as the caller's.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    AppJson(req): AppJson<AiDraftRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = current.user();
    state.ai_limiter.check(user.id).await?;

    if req.petition_type.trim().is_empty() {
        return Err(ApiError::validation("petitionType is required"));
    }
    state
        .store
        .case_by_id(req.case_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Case not found"))?;

    let generated = state
        .draft_ai
        .generate(req.case_id, user.id, &req.petition_type, &req.facts)
        .await?;

    let now = Utc::now();
    let draft = Draft {
        id: Uuid::new_v4(),
        case_id: req.case_id,
        lawyer_id: user.id,
        petition_type: req.petition_type,
        content: generated.content,
        status: DraftStatus::Draft,
        ai_metadata: Some(generated.metadata),
        created_at: now,
        updated_at: now,
    };

    let draft = state.store.create_draft(draft).await?;

    state
        .fanout
        .publish(
            "draft:created",
            serde_json::to_value(&draft).unwrap_or_default(),
            &[draft.lawyer_id],
        )
        .await;

    Ok((StatusCode::CREATED, Json(draft)))
}
