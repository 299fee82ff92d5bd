use crate::response::{error_response, success_response};
use crate::routes::common::{MultipartForm, database_error, media_error};
use crate::routes::courses::post::parse_price;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
};
use db::models::{
    category,
    course::{self, CourseChanges, CourseStatus},
};

/// PUT /courses/{course_id}
///
/// Edits any subset of a course's fields. Accepts the same multipart fields
/// as course creation, all optional, plus an optional new `thumbnail_image`.
///
/// ### Responses
/// - `200 OK` with the updated course
/// - `400 Bad Request` malformed field or unknown category
/// - `403 Forbidden` not the instructor or an admin
/// - `404 Not Found` unknown course
pub async fn edit_course(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
    multipart: Multipart,
) -> Response {
    let mut form = match MultipartForm::read(multipart).await {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let mut changes = match changes_from_form(&form) {
        Ok(changes) => changes,
        Err(resp) => return resp,
    };

    let db = app_state.db();
    if let Some(category_id) = changes.category_id {
        match category::Model::find_by_id(db, category_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return error_response(StatusCode::BAD_REQUEST, "Category not found"),
            Err(e) => return database_error("Failed to load category", e),
        }
    }

    if let Some(thumbnail) = form.take_file("thumbnail_image") {
        if !thumbnail.is_image() {
            return error_response(StatusCode::BAD_REQUEST, "Thumbnail must be an image");
        }
        match app_state.media().store("thumbnails", thumbnail).await {
            Ok(stored) => changes.thumbnail = Some(stored.url),
            Err(e) => return media_error(e),
        }
    }

    match course::Model::update(db, course_id, changes).await {
        Ok(updated) => success_response(StatusCode::OK, updated, "Course updated successfully"),
        Err(e) => database_error("Failed to update course", e),
    }
}

fn changes_from_form(form: &MultipartForm) -> Result<CourseChanges, Response> {
    Ok(CourseChanges {
        course_name: form.text("course_name").map(str::to_owned),
        course_description: form.text("course_description").map(str::to_owned),
        what_you_will_learn: form.text("what_you_will_learn").map(str::to_owned),
        price: parse_price(form)?,
        thumbnail: None,
        category_id: form.parsed::<i64>("category_id")?,
        tags: form.string_list("tag")?,
        instructions: form.string_list("instructions")?,
        status: form.parsed::<CourseStatus>("status")?,
    })
}
