//! Draft endpoints. Drafts are lawyer-scoped: the authoring lawyer is the
//! only principal that may read or mutate one, and authorship is fixed at
//! creation.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::middleware::CurrentUser;
use crate::models::{Draft, DraftPatch, DraftStatus, NewDraft};
use crate::state::AppState;

/// POST /api/drafts - the creator becomes the draft's lawyer.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    AppJson(payload): AppJson<NewDraft>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.petition_type.trim().is_empty() {
        return Err(ApiError::validation("petitionType is required"));
    }
    // The referenced case must exist, though draft access itself is not
    // gated on case membership.
    state
        .store
        .case_by_id(payload.case_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Case not found"))?;

    let now = Utc::now();
    let draft = Draft {
        id: Uuid::new_v4(),
        case_id: payload.case_id,
        lawyer_id: current.user().id,
        petition_type: payload.petition_type,
        content: payload.content,
        status: DraftStatus::Draft,
        ai_metadata: None,
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

/// GET /api/drafts/:id - 404 if absent, 403 for anyone but the author.
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = state
        .store
        .draft_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Draft not found"))?;

    if !draft.is_author(current.user()) {
        return Err(ApiError::forbidden("Forbidden"));
    }

    Ok(Json(draft))
}

/// PATCH /api/drafts/:id - allow-listed fields only; authorship and the
/// case reference cannot be changed here.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    AppJson(patch): AppJson<DraftPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let mut draft = state
        .store
        .draft_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Draft not found"))?;

    if !draft.is_author(current.user()) {
        return Err(ApiError::forbidden("Forbidden"));
    }

    draft.apply_patch(&patch);
    let draft = state.store.update_draft(draft).await?;

    state
        .fanout
        .publish(
            "draft:updated",
            serde_json::to_value(&draft).unwrap_or_default(),
            &[draft.lawyer_id],
        )
        .await;

    Ok(Json(draft))
}
