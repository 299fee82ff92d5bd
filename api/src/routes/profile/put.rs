use crate::auth::CurrentUser;
use crate::response::{error_response, success_response};
use crate::routes::common::{ApiJson, MultipartForm, UserWithProfile, database_error, media_error};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Response,
};
use chrono::NaiveDate;
use common::format_validation_errors;
use db::models::{
    profile::{self, ProfileChanges},
    user,
};
use serde::Deserialize;
use validator::{Validate, ValidationError};

fn validate_date_of_birth(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| {
            let mut err = ValidationError::new("date_of_birth");
            err.message = Some("Date of birth must be formatted as YYYY-MM-DD".into());
            err
        })
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "First name cannot be empty"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,

    #[validate(length(max = 20, message = "Gender is too long"))]
    pub gender: Option<String>,

    #[validate(custom(function = "validate_date_of_birth"))]
    pub date_of_birth: Option<String>,

    #[validate(length(max = 500, message = "About must be at most 500 characters"))]
    pub about: Option<String>,

    #[validate(length(min = 7, max = 15, message = "Contact number must be 7 to 15 characters"))]
    pub contact_number: Option<String>,
}

/// PUT /profile
///
/// Updates any subset of the caller's names and profile details.
///
/// ### Request Body
/// ```json
/// {
///   "first_name": "Ada",
///   "gender": "female",
///   "date_of_birth": "1815-12-10",
///   "about": "Writes notes on engines",
///   "contact_number": "5550100"
/// }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated user and profile
/// - `400 Bad Request` validation failure
pub async fn update_profile(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }
    let db = app_state.db();

    let updated = if req.first_name.is_some() || req.last_name.is_some() {
        match user::Model::update_names(
            db,
            user.id,
            req.first_name.as_deref(),
            req.last_name.as_deref(),
        )
        .await
        {
            Ok(updated) => updated,
            Err(e) => return database_error("Failed to update user", e),
        }
    } else {
        user
    };

    let changes = ProfileChanges {
        gender: req.gender,
        date_of_birth: req.date_of_birth,
        about: req.about,
        contact_number: req.contact_number,
    };
    if let Err(e) = profile::Model::update_for_user(db, updated.id, changes).await {
        return database_error("Failed to update profile", e);
    }

    match UserWithProfile::load(db, updated).await {
        Ok(data) => success_response(StatusCode::OK, data, "Profile updated successfully"),
        Err(e) => database_error("Failed to load profile", e),
    }
}

/// PUT /profile/display-picture
///
/// Replaces the caller's avatar.
///
/// ### Multipart Body (form-data)
/// - `display_picture` (required): an image file
///
/// ### Responses
/// - `200 OK` with the updated user
/// - `400 Bad Request` missing file or not an image
/// - `502 Bad Gateway` the media host rejected the upload
pub async fn update_display_picture(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Response {
    let mut form = match MultipartForm::read(multipart).await {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let Some(upload) = form.take_file("display_picture") else {
        return error_response(StatusCode::BAD_REQUEST, "Missing file: display_picture");
    };
    if !upload.is_image() {
        return error_response(StatusCode::BAD_REQUEST, "Display picture must be an image");
    }

    let stored = match app_state.media().store("avatars", upload).await {
        Ok(stored) => stored,
        Err(e) => return media_error(e),
    };

    match user::Model::update_image(app_state.db(), user.id, &stored.url).await {
        Ok(updated) => success_response(
            StatusCode::OK,
            updated,
            "Display picture updated successfully",
        ),
        Err(e) => database_error("Failed to update display picture", e),
    }
}
