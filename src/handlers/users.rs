//! Current-user profile endpoints.
//!
//! - GET /api/users/me
//! - PATCH /api/users/me (optional firm logo file)

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use crate::auth::password::hash_password;
use crate::error::ApiError;
use crate::extract::JsonOrMultipart;
use crate::middleware::CurrentUser;
use crate::models::UserPatch;
use crate::state::AppState;

/// GET /api/users/me - the authenticated principal, secret omitted.
pub async fn me_get(Extension(current): Extension<CurrentUser>) -> impl IntoResponse {
    Json(current.user().clone())
}

/// PATCH /api/users/me - allow-listed profile update. A multipart file part
/// becomes the new firm logo; the password field, when present, is rehashed.
pub async fn me_update(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    body: JsonOrMultipart<UserPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let JsonOrMultipart { mut payload, files } = body;

    if let Some(file) = files.first() {
        payload.firm_logo_url = Some(state.blob.upload(file).await?.url);
    }

    let mut user = current.user().clone();
    if let Some(password) = &payload.password {
        if password.is_empty() {
            return Err(ApiError::validation("password must not be empty"));
        }
        user.password_hash = hash_password(password)?;
    }
    user.apply_patch(&payload);

    let user = state.store.update_user(user).await?;
    Ok(Json(user))
}
