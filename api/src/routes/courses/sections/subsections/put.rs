use crate::response::{error_response, success_response};
use crate::routes::common::{MultipartForm, database_error, media_error};
use crate::routes::courses::sections::subsections::{ensure_section, post::duration_field};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
};
use db::models::sub_section::{self, SubSectionChanges};

/// PUT /courses/{course_id}/sections/{section_id}/subsections/{sub_section_id}
///
/// Edits any subset of `title`, `description` and `time_duration`, and
/// optionally replaces the `video`.
///
/// ### Responses
/// - `200 OK` with the lecture
/// - `400 Bad Request` malformed field or non-video upload
/// - `404 Not Found` the section or lecture is not part of this course
pub async fn edit_sub_section(
    State(app_state): State<AppState>,
    Path((course_id, section_id, sub_section_id)): Path<(i64, i64, i64)>,
    multipart: Multipart,
) -> Response {
    let db = app_state.db();
    if let Err(resp) = ensure_section(db, course_id, section_id).await {
        return resp;
    }
    match sub_section::Model::find_in_section(db, section_id, sub_section_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Subsection not found"),
        Err(e) => return database_error("Failed to load subsection", e),
    }

    let mut form = match MultipartForm::read(multipart).await {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let mut changes = SubSectionChanges {
        title: form.text("title").map(str::to_owned),
        description: form.text("description").map(str::to_owned),
        video_url: None,
        duration_seconds: match duration_field(&form) {
            Ok(duration) => duration,
            Err(resp) => return resp,
        },
    };

    if let Some(video) = form.take_file("video") {
        if !video.is_video() {
            return error_response(StatusCode::BAD_REQUEST, "Lecture upload must be a video");
        }
        match app_state.media().store("videos", video).await {
            Ok(stored) => {
                changes.video_url = Some(stored.url);
                if changes.duration_seconds.is_none() {
                    changes.duration_seconds = stored.duration_seconds;
                }
            }
            Err(e) => return media_error(e),
        }
    }

    match sub_section::Model::update(db, sub_section_id, changes).await {
        Ok(updated) => success_response(StatusCode::OK, updated, "Subsection updated successfully"),
        Err(e) => database_error("Failed to update subsection", e),
    }
}
