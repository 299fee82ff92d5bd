use crate::auth::CurrentUser;
use crate::response::{error_response, success_response};
use crate::routes::common::{ApiJson, MultipartForm, database_error, media_error};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
};
use db::models::{
    category,
    course::{self, CourseStatus, MAX_PRICE, NewCourse},
};
use db::progress::{self, ProgressError};
use serde::Deserialize;

/// POST /courses
///
/// Creates a course owned by the calling teacher.
///
/// ### Multipart Body (form-data)
/// - `course_name` (required)
/// - `course_description` (required)
/// - `what_you_will_learn` (required)
/// - `price` (required): whole currency units, from 0 to 10,000,000
/// - `category_id` (required): an existing category
/// - `tag` (required): JSON array of strings, e.g. `["rust","web"]`
/// - `instructions` (optional): JSON array of strings
/// - `status` (optional): `draft` (default) or `published`
/// - `thumbnail_image` (required): image file
///
/// ### Responses
/// - `201 Created` with the course
/// - `400 Bad Request` missing or malformed field, unknown category, non-image thumbnail
/// - `403 Forbidden` the caller is not a teacher
/// - `502 Bad Gateway` the media host rejected the thumbnail
pub async fn create_course(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Response {
    let mut form = match MultipartForm::read(multipart).await {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let new_course = match course_from_form(&form, user.id) {
        Ok(new_course) => new_course,
        Err(resp) => return resp,
    };

    let Some(thumbnail) = form.take_file("thumbnail_image") else {
        return error_response(StatusCode::BAD_REQUEST, "Missing file: thumbnail_image");
    };
    if !thumbnail.is_image() {
        return error_response(StatusCode::BAD_REQUEST, "Thumbnail must be an image");
    }

    let db = app_state.db();
    match category::Model::find_by_id(db, new_course.category_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, "Category not found"),
        Err(e) => return database_error("Failed to load category", e),
    }

    let stored = match app_state.media().store("thumbnails", thumbnail).await {
        Ok(stored) => stored,
        Err(e) => return media_error(e),
    };

    let new_course = NewCourse {
        thumbnail: stored.url,
        ..new_course
    };
    match course::Model::create(db, new_course).await {
        Ok(created) => {
            tracing::info!(course_id = created.id, instructor_id = user.id, "Course created");
            success_response(StatusCode::CREATED, created, "Course created successfully")
        }
        Err(e) => database_error("Failed to create course", e),
    }
}

/// Validates the text fields of a course form. The thumbnail is filled in later.
fn course_from_form(form: &MultipartForm, instructor_id: i64) -> Result<NewCourse, Response> {
    let course_name = form.required("course_name")?.to_owned();
    let course_description = form.required("course_description")?.to_owned();
    let what_you_will_learn = form.required("what_you_will_learn")?.to_owned();
    form.required("price")?;
    let price = parse_price(form)?.unwrap_or_default();
    form.required("category_id")?;
    let category_id = form.parsed::<i64>("category_id")?.unwrap_or_default();
    form.required("tag")?;
    let tags = form.string_list("tag")?.unwrap_or_default();
    let instructions = form.string_list("instructions")?.unwrap_or_default();
    let status = form.parsed::<CourseStatus>("status")?.unwrap_or_default();

    Ok(NewCourse {
        course_name,
        course_description,
        instructor_id,
        what_you_will_learn,
        price,
        thumbnail: String::new(),
        category_id,
        tags,
        instructions,
        status,
    })
}

/// Optional `price` field, between zero and [`MAX_PRICE`].
pub(crate) fn parse_price(form: &MultipartForm) -> Result<Option<i64>, Response> {
    match form.parsed::<i64>("price")? {
        Some(price) if price < 0 => Err(error_response(
            StatusCode::BAD_REQUEST,
            "Price cannot be negative",
        )),
        Some(price) if price > MAX_PRICE => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Price cannot exceed {MAX_PRICE}"),
        )),
        other => Ok(other),
    }
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub sub_section_id: i64,
}

/// POST /courses/{course_id}/progress
///
/// Marks a lecture of the course as completed by the calling student.
///
/// ### Request Body
/// ```json
/// { "sub_section_id": 12 }
/// ```
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": { "progress_id": 4, "sub_section_id": 12, "completed_at": "2025-05-23T18:00:00Z" },
///   "message": "Course progress updated"
/// }
/// ```
/// - `400 Bad Request` the lecture is already completed
/// - `403 Forbidden` the student is not enrolled
/// - `404 Not Found` the lecture does not belong to this course
pub async fn mark_progress(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<ProgressRequest>,
) -> Response {
    match progress::mark_complete(app_state.db(), user.id, course_id, req.sub_section_id).await {
        Ok(done) => success_response(StatusCode::OK, done, "Course progress updated"),
        Err(ProgressError::SubSectionNotFound) => {
            error_response(StatusCode::NOT_FOUND, "Subsection not found in this course")
        }
        Err(ProgressError::NotEnrolled) => {
            error_response(StatusCode::FORBIDDEN, "You are not enrolled in this course")
        }
        Err(ProgressError::AlreadyCompleted) => {
            error_response(StatusCode::BAD_REQUEST, "Subsection already completed")
        }
        Err(ProgressError::Database(e)) => database_error("Failed to update progress", e),
    }
}
