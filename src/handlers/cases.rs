//! Case endpoints: the ownership-scoped CRUD flow.
//!
//! - POST /api/cases (up to 5 attachment files)
//! - GET /api/cases (role-filtered list)
//! - GET /api/cases/:id
//! - PATCH /api/cases/:id (optional attachment files, appended)
//!
//! Existence is confirmed before authorization, so a caller can tell 404
//! from 403. Successful mutations fan out to the recorded lawyer and
//! client.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::JsonOrMultipart;
use crate::middleware::CurrentUser;
use crate::models::{Attachment, Case, CasePatch, CaseStatus, NewCase, Role, User};
use crate::services::UploadFile;
use crate::state::AppState;
use crate::store::CaseScope;

const MAX_ATTACHMENTS: usize = 5;

/// Upload every file before touching the store; one failure aborts the
/// whole operation with nothing persisted.
async fn upload_all(
    state: &AppState,
    files: &[UploadFile],
) -> Result<Vec<Attachment>, ApiError> {
    if files.len() > MAX_ATTACHMENTS {
        return Err(ApiError::validation(format!(
            "at most {} attachments per request",
            MAX_ATTACHMENTS
        )));
    }
    let mut attachments = Vec::with_capacity(files.len());
    for file in files {
        attachments.push(state.blob.upload(file).await?);
    }
    Ok(attachments)
}

/// When the creator leaves their own party slot empty, they fill it: a
/// client creating a case becomes its client, a lawyer its lawyer.
fn fill_own_slot(payload: &mut NewCase, user: &User) {
    match user.role {
        Role::Lawyer => {
            if payload.lawyer.is_none() {
                payload.lawyer = Some(user.id);
            }
        }
        Role::Client => {
            if payload.client.is_none() {
                payload.client = Some(user.id);
            }
        }
    }
}

/// POST /api/cases - create a case. Either role may create.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    body: JsonOrMultipart<NewCase>,
) -> Result<impl IntoResponse, ApiError> {
    let JsonOrMultipart { mut payload, files } = body;

    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("title is required"));
    }
    fill_own_slot(&mut payload, current.user());

    let attachments = upload_all(&state, &files).await?;

    let now = Utc::now();
    let case = Case {
        id: Uuid::new_v4(),
        title: payload.title,
        description: payload.description,
        status: CaseStatus::Open,
        jurisdiction: payload.jurisdiction,
        court_name: payload.court_name,
        lawyer: payload.lawyer,
        client: payload.client,
        attachments,
        created_at: now,
        updated_at: now,
    };

    let case = state.store.create_case(case).await?;

    state
        .fanout
        .publish(
            "case:created",
            serde_json::to_value(&case).unwrap_or_default(),
            &case.involved_users(),
        )
        .await;

    Ok((StatusCode::CREATED, Json(case)))
}

/// GET /api/cases - cases visible to the principal under the role filter.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let cases = state
        .store
        .cases_in_scope(CaseScope::for_user(current.user()))
        .await?;
    Ok(Json(cases))
}

/// GET /api/cases/:id - 404 if absent, 403 if the principal is not a party.
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let case = state
        .store
        .case_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Case not found"))?;

    if !case.is_party(current.user()) {
        return Err(ApiError::forbidden("Forbidden"));
    }

    Ok(Json(case))
}

/// PATCH /api/cases/:id - authorization runs against the stored document,
/// so ownership cannot be reassigned to slip past the check. New files are
/// appended to the attachment sequence, never replacing it.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    body: JsonOrMultipart<CasePatch>,
) -> Result<impl IntoResponse, ApiError> {
    let mut case = state
        .store
        .case_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Case not found"))?;

    if !case.is_party(current.user()) {
        return Err(ApiError::forbidden("Forbidden"));
    }

    let JsonOrMultipart { payload, files } = body;
    let new_attachments = upload_all(&state, &files).await?;

    case.apply_patch(&payload);
    case.attachments.extend(new_attachments);

    let case = state.store.update_case(case).await?;

    state
        .fanout
        .publish(
            "case:updated",
            serde_json::to_value(&case).unwrap_or_default(),
            &case.involved_users(),
        )
        .await;

    Ok(Json(case))
}
