use crate::response::error_response;
use crate::services::media::{MediaError, MediaUpload};
use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use db::models::{profile, user};
use sea_orm::{DbConn, DbErr};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;

/// A user together with their profile, as returned by `/auth/me` and `/profile`.
#[derive(Debug, Serialize)]
pub struct UserWithProfile {
    #[serde(flatten)]
    pub user: user::Model,
    pub profile: Option<profile::Model>,
}

impl UserWithProfile {
    pub async fn load(db: &DbConn, user: user::Model) -> Result<Self, DbErr> {
        let profile = profile::Model::find_by_user(db, user.id).await?;
        Ok(Self { user, profile })
    }
}

/// JSON body extractor whose rejections use the response envelope.
///
/// Malformed JSON, a missing field, or a wrong content type all become
/// `400 Bad Request` with `success: false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(error_response(
                StatusCode::BAD_REQUEST,
                json_rejection_message(&rejection),
            )),
        }
    }
}

fn json_rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid request body: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON".to_owned(),
        JsonRejection::MissingJsonContentType(_) => {
            "Expected Content-Type: application/json".to_owned()
        }
        _ => "Invalid request body".to_owned(),
    }
}

/// Logs a database failure and maps it to the generic `500` envelope.
pub fn database_error(context: &str, err: DbErr) -> Response {
    tracing::error!(error = %err, "{context}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
}

/// Maps a failed upload to `502 Bad Gateway`.
pub fn media_error(err: MediaError) -> Response {
    tracing::error!(error = %err, "Media upload failed");
    error_response(StatusCode::BAD_GATEWAY, "Failed to upload file")
}

/// Whether a database error is a unique constraint violation.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}

/// Text fields and files of a multipart form, keyed by field name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, MediaUpload>,
}

impl MultipartForm {
    /// Drains a multipart body. Parts with a file name are collected as files.
    pub async fn read(mut multipart: Multipart) -> Result<Self, Response> {
        let mut form = MultipartForm::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Malformed multipart body");
                    return Err(error_response(
                        StatusCode::BAD_REQUEST,
                        "Malformed multipart body",
                    ));
                }
            };

            let name = field.name().unwrap_or_default().to_owned();
            if name.is_empty() {
                continue;
            }

            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_owned);
                    let bytes = field.bytes().await.map_err(|_| {
                        error_response(StatusCode::BAD_REQUEST, "Failed to read uploaded file")
                    })?;
                    if bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        MediaUpload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field.text().await.map_err(|_| {
                        error_response(StatusCode::BAD_REQUEST, "Invalid form field")
                    })?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// A trimmed, non-empty text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn required(&self, name: &str) -> Result<&str, Response> {
        self.text(name).ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                format!("Missing required field: {name}"),
            )
        })
    }

    /// Parses an optional field, rejecting values that do not parse.
    pub fn parsed<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, Response> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
                error_response(StatusCode::BAD_REQUEST, format!("Invalid value for {name}"))
            }),
        }
    }

    /// Parses an optional field holding a JSON array of strings.
    pub fn string_list(&self, name: &str) -> Result<Option<Vec<String>>, Response> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => serde_json::from_str::<Vec<String>>(raw).map(Some).map_err(|_| {
                error_response(
                    StatusCode::BAD_REQUEST,
                    format!("{name} must be a JSON array of strings"),
                )
            }),
        }
    }

    pub fn take_file(&mut self, name: &str) -> Option<MediaUpload> {
        self.files.remove(name)
    }
}
