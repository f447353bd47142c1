//! Access guard: bearer-token authentication and role authorization.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::{verify_token, TokenKind};
use crate::error::ApiError;
use crate::models::{Role, User};
use crate::state::AppState;

/// The authenticated principal, resolved from the Identity Store and
/// attached to the request for downstream handlers.
#[derive(Clone)]
pub struct CurrentUser(pub Arc<User>);

impl CurrentUser {
    pub fn user(&self) -> &User {
        &self.0
    }
}

/// Authentication middleware: extract the bearer credential, verify it with
/// the access key, resolve the live identity record, and attach it to the
/// request. Rejects with 401 before any resource operation runs. Does not
/// refresh or rotate tokens.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let claims =
        verify_token(&token, TokenKind::Access).map_err(|_| ApiError::unauthorized("Token invalid or expired"))?;

    let user = state
        .store
        .user_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    request.extensions_mut().insert(CurrentUser(Arc::new(user)));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        _ => Err(ApiError::unauthorized("Not authenticated")),
    }
}

/// Composable role guard, run after `authenticate`: 403 when the principal's
/// role is not in the allowed set.
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, ApiError>> + Send>> + Clone {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let current = request
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;
            if !allowed.contains(&current.user().role) {
                return Err(ApiError::forbidden("Forbidden: insufficient permissions"));
            }
            Ok(next.run(request).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_extraction_requires_scheme_and_token() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert("authorization", "Basic abc".parse().unwrap());
        assert!(bearer_token(&headers).is_err());

        headers.insert("authorization", "Bearer ".parse().unwrap());
        assert!(bearer_token(&headers).is_err());

        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
