//! Request body extractors.
//!
//! `AppJson` is `axum::Json` with rejections converted into the service's
//! 400 error shape. `JsonOrMultipart` additionally accepts a multipart
//! form, mapping its text fields onto the payload type and collecting file
//! parts, so endpoints that take optional file attachments keep a single
//! handler.

use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::services::UploadFile;

pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(AppJson(value))
    }
}

/// A JSON body, or a multipart form whose text fields form the payload and
/// whose file parts (any part carrying a filename) become uploads.
pub struct JsonOrMultipart<T> {
    pub payload: T,
    pub files: Vec<UploadFile>,
}

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrMultipart<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::validation(rejection.to_string()))?;
            from_multipart(multipart).await
        } else {
            let AppJson(payload) = AppJson::<T>::from_request(req, state).await?;
            Ok(Self {
                payload,
                files: Vec::new(),
            })
        }
    }
}

async fn from_multipart<T: DeserializeOwned>(
    mut multipart: Multipart,
) -> Result<JsonOrMultipart<T>, ApiError> {
    let mut fields = Map::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name() {
            let file_name = file_name.to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("failed to read file part: {}", e)))?;
            files.push(UploadFile {
                name: file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::validation(format!("failed to read field {}: {}", name, e)))?;
            fields.insert(name, coerce_field(text));
        }
    }

    let payload: T = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::validation(format!("invalid form fields: {}", e)))?;

    Ok(JsonOrMultipart { payload, files })
}

/// Form fields arrive as strings; booleans and null are the only values
/// the payload types expect in non-string positions.
fn coerce_field(text: String) -> Value {
    match text.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => Value::String(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_and_null_are_coerced() {
        assert_eq!(coerce_field("true".into()), Value::Bool(true));
        assert_eq!(coerce_field("null".into()), Value::Null);
        assert_eq!(coerce_field("Divorce".into()), Value::String("Divorce".into()));
    }
}
