use crate::auth::{CurrentUser, TOKEN_COOKIE, generate_jwt};
use crate::response::{Empty, error_response, success_response};
use crate::routes::common::{ApiJson, UserWithProfile, database_error, is_unique_violation};
use crate::services::email::{
    otp_email, password_reset_email, password_updated_email, send_logged,
};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::format_validation_errors;
use db::models::{
    otp::{self, OtpCheck},
    password_reset_token, profile,
    user::{self, AccountType},
};
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use serde::{Deserialize, Serialize};
use util::config::AppConfig;
use validator::Validate;

fn validation_failed(errors: &validator::ValidationErrors) -> Response {
    error_response(StatusCode::BAD_REQUEST, format_validation_errors(errors))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// POST /auth/send-otp
///
/// Emails a fresh 6-digit code to an address that has no account yet.
///
/// ### Request Body
/// ```json
/// { "email": "ada@example.com" }
/// ```
///
/// ### Responses
/// - `200 OK` code sent
/// - `400 Bad Request` invalid email
/// - `409 Conflict` a user with this email already exists
/// - `502 Bad Gateway` the email could not be delivered
pub async fn send_otp(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<SendOtpRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_failed(&e);
    }
    let db = app_state.db();

    match user::Model::find_by_email(db, &req.email).await {
        Ok(Some(_)) => {
            return error_response(StatusCode::CONFLICT, "User is already registered");
        }
        Ok(None) => {}
        Err(e) => return database_error("Failed to look up user", e),
    }

    let expiry_minutes = AppConfig::global().otp_expiry_minutes;
    let issued = match otp::Model::issue(db, &req.email, expiry_minutes as i64).await {
        Ok(issued) => issued,
        Err(e) => return database_error("Failed to store OTP", e),
    };

    if let Err(e) = app_state
        .mailer()
        .send(otp_email(&issued.email, &issued.code, expiry_minutes))
        .await
    {
        tracing::error!(error = %e, email = %issued.email, "Failed to send OTP email");
        return error_response(StatusCode::BAD_GATEWAY, "Failed to send verification email");
    }

    success_response(StatusCode::OK, Empty, "OTP sent successfully")
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 50, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub confirm_password: String,

    pub account_type: AccountType,

    #[validate(length(min = 7, max = 15, message = "Contact number must be 7 to 15 characters"))]
    pub contact_number: Option<String>,

    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

/// POST /auth/signup
///
/// Creates a student or teacher account after checking the emailed OTP.
///
/// ### Request Body
/// ```json
/// {
///   "first_name": "Ada",
///   "last_name": "Lovelace",
///   "email": "ada@example.com",
///   "password": "strongpassword",
///   "confirm_password": "strongpassword",
///   "account_type": "student",
///   "contact_number": "5550100",
///   "otp": "042317"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the new user and their profile
/// - `400 Bad Request` validation failure, password mismatch, admin signup,
///   or a missing, expired or wrong OTP
/// - `409 Conflict` a user with this email already exists
pub async fn signup(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_failed(&e);
    }
    if req.password != req.confirm_password {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Password and confirm password do not match",
        );
    }
    if req.account_type == AccountType::Admin {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Admin accounts cannot be created through signup",
        );
    }

    let db = app_state.db();

    match user::Model::find_by_email(db, &req.email).await {
        Ok(Some(_)) => {
            return error_response(
                StatusCode::CONFLICT,
                "A user with this email already exists",
            );
        }
        Ok(None) => {}
        Err(e) => return database_error("Failed to look up user", e),
    }

    match otp::Model::check(db, &req.email, &req.otp).await {
        Ok(OtpCheck::Valid) => {}
        Ok(OtpCheck::Missing) => {
            return error_response(StatusCode::BAD_REQUEST, "No OTP found for this email");
        }
        Ok(OtpCheck::Expired) => {
            return error_response(StatusCode::BAD_REQUEST, "OTP has expired");
        }
        Ok(OtpCheck::Mismatch) => {
            return error_response(StatusCode::BAD_REQUEST, "Invalid OTP");
        }
        Err(e) => return database_error("Failed to check OTP", e),
    }

    let created = match register(db, &req).await {
        Ok(created) => created,
        Err(e) if is_unique_violation(&e) => {
            return error_response(
                StatusCode::CONFLICT,
                "A user with this email already exists",
            );
        }
        Err(e) => return database_error("Failed to create user", e),
    };

    tracing::info!(user_id = created.id, account_type = %created.account_type, "User registered");

    match UserWithProfile::load(db, created).await {
        Ok(data) => success_response(StatusCode::CREATED, data, "User registered successfully"),
        Err(e) => database_error("Failed to load profile", e),
    }
}

/// Creates the user and their profile, and consumes their OTPs, in one transaction.
async fn register(db: &DatabaseConnection, req: &SignupRequest) -> Result<user::Model, DbErr> {
    let txn = db.begin().await?;
    let created = user::Model::create(
        &txn,
        &req.first_name,
        &req.last_name,
        &req.email,
        &req.password,
        req.account_type,
    )
    .await?;
    profile::Model::create_empty(&txn, created.id, req.contact_number.as_deref()).await?;
    otp::Model::clear_for(&txn, &created.email).await?;
    txn.commit().await?;
    Ok(created)
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: UserWithProfile,
}

/// POST /auth/login
///
/// Authenticates a user and issues a JWT, both in the body and as an
/// HTTP-only `token` cookie.
///
/// ### Request Body
/// ```json
/// { "email": "ada@example.com", "password": "strongpassword" }
/// ```
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "jwt_token_here",
///     "expires_at": "2025-05-24T18:00:00+00:00",
///     "user": { "id": 1, "email": "ada@example.com", "account_type": "student", "profile": { } }
///   },
///   "message": "Login successful"
/// }
/// ```
/// - `401 Unauthorized` unknown email or wrong password
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_failed(&e);
    }
    let db = app_state.db();

    let account = match user::Model::verify_credentials(db, &req.email, &req.password).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            return error_response(StatusCode::UNAUTHORIZED, "Invalid email or password");
        }
        Err(e) => return database_error("Failed to verify credentials", e),
    };

    let (token, expires_at) =
        match generate_jwt(account.id, &account.email, account.account_type) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(error = %e, user_id = account.id, "Failed to sign token");
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to sign token");
            }
        };

    let user = match UserWithProfile::load(db, account).await {
        Ok(user) => user,
        Err(e) => return database_error("Failed to load profile", e),
    };

    let secure = AppConfig::global().is_production();
    let cookie = Cookie::build((TOKEN_COOKIE, token.clone()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/");

    let body = LoginResponse {
        token,
        expires_at,
        user,
    };

    (
        jar.add(cookie),
        success_response(StatusCode::OK, body, "Login successful"),
    )
        .into_response()
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,

    pub confirm_password: String,
}

/// POST /auth/change-password
///
/// Changes the caller's password and sends a notification email.
///
/// ### Responses
/// - `200 OK` password updated
/// - `400 Bad Request` validation failure or mismatch
/// - `401 Unauthorized` wrong old password
pub async fn change_password(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_failed(&e);
    }
    if req.new_password != req.confirm_password {
        return error_response(
            StatusCode::BAD_REQUEST,
            "New password and confirm password do not match",
        );
    }
    if !user.verify_password(&req.old_password) {
        return error_response(StatusCode::UNAUTHORIZED, "The old password is incorrect");
    }

    let updated = match user::Model::update_password(app_state.db(), user.id, &req.new_password).await {
        Ok(updated) => updated,
        Err(e) => return database_error("Failed to update password", e),
    };

    send_logged(
        app_state.mailer(),
        password_updated_email(&updated.email, &updated.full_name()),
    )
    .await;

    success_response(StatusCode::OK, Empty, "Password updated successfully")
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordTokenRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// POST /auth/reset-password-token
///
/// Emails a password reset link when an account exists. The response is the
/// same either way so the endpoint cannot be used to discover accounts.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": null,
///   "message": "If the account exists, a reset link has been sent to the email"
/// }
/// ```
/// - `400 Bad Request` invalid email format
pub async fn reset_password_token(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<ResetPasswordTokenRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_failed(&e);
    }
    let db = app_state.db();

    let account = match user::Model::find_by_email(db, &req.email).await {
        Ok(account) => account,
        Err(e) => return database_error("Failed to look up user", e),
    };

    if let Some(account) = account {
        let (expiry_minutes, frontend_url) = {
            let config = AppConfig::global();
            (config.reset_token_expiry_minutes, config.frontend_url.clone())
        };

        match password_reset_token::Model::issue(db, account.id, expiry_minutes as i64).await {
            Ok((_, raw)) => {
                let link = format!(
                    "{}/update-password/{}",
                    frontend_url.trim_end_matches('/'),
                    raw
                );
                send_logged(
                    app_state.mailer(),
                    password_reset_email(&account.email, &link, expiry_minutes),
                )
                .await;
            }
            Err(e) => return database_error("Failed to store reset token", e),
        }
    }

    success_response(
        StatusCode::OK,
        Empty,
        "If the account exists, a reset link has been sent to the email",
    )
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub confirm_password: String,
}

/// POST /auth/reset-password
///
/// Sets a new password using an emailed reset token. Tokens are single use.
///
/// ### Responses
/// - `200 OK` password reset
/// - `400 Bad Request` mismatch, or an unknown, used or expired token
pub async fn reset_password(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return validation_failed(&e);
    }
    if req.password != req.confirm_password {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Password and confirm password do not match",
        );
    }
    let db = app_state.db();

    let token = match password_reset_token::Model::find_by_token(db, req.token.trim()).await {
        Ok(Some(token)) if token.is_usable() => token,
        Ok(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid or expired token"),
        Err(e) => return database_error("Failed to look up reset token", e),
    };

    let reset = async {
        let txn = db.begin().await?;
        user::Model::update_password(&txn, token.user_id, &req.password).await?;
        token.mark_as_used(&txn).await?;
        txn.commit().await
    };
    if let Err(e) = reset.await {
        return database_error("Failed to reset password", e);
    }

    tracing::info!(user_id = token.user_id, "Password reset");
    success_response(StatusCode::OK, Empty, "Password reset successful")
}
