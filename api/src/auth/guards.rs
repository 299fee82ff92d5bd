use crate::auth::claims::{AuthUser, CurrentUser};
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::{
    course,
    course_enrollment,
    user::{self, AccountType},
};
use std::collections::HashMap;

type GuardError = (StatusCode, Json<ApiResponse<Empty>>);

fn reject(status: StatusCode, message: &str) -> GuardError {
    (status, Json(ApiResponse::error(message)))
}

/// Decodes the caller's token, re-loads the account it names and stores it in
/// the request extensions.
///
/// A token whose user no longer exists is rejected, so deleted accounts and
/// role changes take effect immediately.
async fn authenticate(
    db: &sea_orm::DatabaseConnection,
    req: Request<Body>,
) -> Result<(Request<Body>, user::Model), GuardError> {
    let (mut parts, body) = req.into_parts();
    let AuthUser(claims) = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| reject(StatusCode::UNAUTHORIZED, "Authentication required"))?;

    let account = match user::Model::find_by_id(db, claims.sub).await {
        Ok(Some(account)) => account,
        Ok(None) => return Err(reject(StatusCode::UNAUTHORIZED, "User no longer exists")),
        Err(e) => {
            tracing::error!(error = %e, user_id = claims.sub, "Failed to load authenticated user");
            return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, "Database error"));
        }
    };

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(AuthUser(claims));
    req.extensions_mut().insert(CurrentUser(account.clone()));
    Ok((req, account))
}

/// Reads and parses `course_id` from the matched path.
fn course_id_param(params: &HashMap<String, String>) -> Result<i64, GuardError> {
    params
        .get("course_id")
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "Missing or invalid course_id"))
}

/// Basic guard to ensure the request carries a valid token for a live account.
pub async fn allow_authenticated(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let (req, _user) = authenticate(app_state.db(), req).await?;
    Ok(next.run(req).await)
}

async fn allow_account_type(
    app_state: &AppState,
    req: Request<Body>,
    next: Next,
    required: AccountType,
    failure_msg: &str,
) -> Result<Response, GuardError> {
    let (req, user) = authenticate(app_state.db(), req).await?;

    if user.account_type != required {
        return Err(reject(StatusCode::FORBIDDEN, failure_msg));
    }

    Ok(next.run(req).await)
}

pub async fn allow_student(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    allow_account_type(
        &app_state,
        req,
        next,
        AccountType::Student,
        "This route is restricted to students",
    )
    .await
}

pub async fn allow_teacher(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    allow_account_type(
        &app_state,
        req,
        next,
        AccountType::Teacher,
        "This route is restricted to teachers",
    )
    .await
}

/// Admin-only guard.
pub async fn allow_admin(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    allow_account_type(
        &app_state,
        req,
        next,
        AccountType::Admin,
        "Admin access required",
    )
    .await
}

/// Allows the instructor of the course in the path, or an admin.
///
/// Responds `404` when the course does not exist.
pub async fn allow_course_instructor(
    State(app_state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let db = app_state.db();
    let (req, user) = authenticate(db, req).await?;
    let course_id = course_id_param(&params)?;

    let course = match course::Model::find_by_id(db, course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return Err(reject(StatusCode::NOT_FOUND, "Course not found")),
        Err(e) => {
            tracing::error!(error = %e, course_id, "Failed to load course");
            return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, "Database error"));
        }
    };

    if user.is_admin() || course.instructor_id == user.id {
        return Ok(next.run(req).await);
    }

    Err(reject(
        StatusCode::FORBIDDEN,
        "Only the course instructor can modify this course",
    ))
}

/// Allows students enrolled in the course in the path, its instructor, or an admin.
pub async fn allow_enrolled(
    State(app_state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let db = app_state.db();
    let (req, user) = authenticate(db, req).await?;
    let course_id = course_id_param(&params)?;

    if user.is_admin() {
        return Ok(next.run(req).await);
    }

    let course = match course::Model::find_by_id(db, course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return Err(reject(StatusCode::NOT_FOUND, "Course not found")),
        Err(e) => {
            tracing::error!(error = %e, course_id, "Failed to load course");
            return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, "Database error"));
        }
    };

    if course.instructor_id == user.id {
        return Ok(next.run(req).await);
    }

    match course_enrollment::Model::is_enrolled(db, user.id, course_id).await {
        Ok(true) => Ok(next.run(req).await),
        Ok(false) => Err(reject(
            StatusCode::FORBIDDEN,
            "You are not enrolled in this course",
        )),
        Err(e) => {
            tracing::warn!(error = %e, user_id = user.id, course_id, "DB error while checking enrolment; denying access");
            Err(reject(StatusCode::FORBIDDEN, "You are not enrolled in this course"))
        }
    }
}
