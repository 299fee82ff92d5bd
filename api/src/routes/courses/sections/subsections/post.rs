use crate::response::{error_response, success_response};
use crate::routes::common::{MultipartForm, database_error, media_error};
use crate::routes::courses::sections::subsections::ensure_section;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
};
use db::models::sub_section::{self, NewSubSection};
use util::duration::parse_seconds;

/// Optional `time_duration` field in seconds; fractional values are rounded.
pub(crate) fn duration_field(form: &MultipartForm) -> Result<Option<i32>, Response> {
    match form.text("time_duration") {
        None => Ok(None),
        Some(raw) => parse_seconds(raw).map(Some).ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                "time_duration must be a number of seconds",
            )
        }),
    }
}

/// POST /courses/{course_id}/sections/{section_id}/subsections
///
/// Uploads a lecture video and adds it to the section.
///
/// ### Multipart Body (form-data)
/// - `title` (required)
/// - `description` (required)
/// - `video` (required): video file
/// - `time_duration` (optional): length in seconds; overrides the duration
///   reported by the media host
///
/// ### Responses
/// - `201 Created`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": 12,
///     "section_id": 5,
///     "title": "Installing the toolchain",
///     "description": "rustup, cargo and friends",
///     "video_url": "http://127.0.0.1:4000/media/videos/9c2e-install.mp4",
///     "duration_seconds": 312
///   },
///   "message": "Subsection created successfully"
/// }
/// ```
/// - `400 Bad Request` missing field or non-video upload
/// - `404 Not Found` the section does not belong to this course
/// - `502 Bad Gateway` the media host rejected the upload
pub async fn create_sub_section(
    State(app_state): State<AppState>,
    Path((course_id, section_id)): Path<(i64, i64)>,
    multipart: Multipart,
) -> Response {
    let db = app_state.db();
    if let Err(resp) = ensure_section(db, course_id, section_id).await {
        return resp;
    }

    let mut form = match MultipartForm::read(multipart).await {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let title = match form.required("title") {
        Ok(title) => title.to_owned(),
        Err(resp) => return resp,
    };
    let description = match form.required("description") {
        Ok(description) => description.to_owned(),
        Err(resp) => return resp,
    };
    let declared_duration = match duration_field(&form) {
        Ok(duration) => duration,
        Err(resp) => return resp,
    };

    let Some(video) = form.take_file("video") else {
        return error_response(StatusCode::BAD_REQUEST, "Missing file: video");
    };
    if !video.is_video() {
        return error_response(StatusCode::BAD_REQUEST, "Lecture upload must be a video");
    }

    let stored = match app_state.media().store("videos", video).await {
        Ok(stored) => stored,
        Err(e) => return media_error(e),
    };

    let new = NewSubSection {
        title,
        description,
        video_url: stored.url,
        duration_seconds: declared_duration
            .or(stored.duration_seconds)
            .unwrap_or_default(),
    };

    match sub_section::Model::create(db, section_id, new).await {
        Ok(created) => success_response(
            StatusCode::CREATED,
            created,
            "Subsection created successfully",
        ),
        Err(e) => database_error("Failed to create subsection", e),
    }
}
