use crate::helpers::{
    app::{empty_request, json_request},
    fixtures::{PASSWORD, user_with_token},
    make_test_app,
};
use api::auth::extractors::decode_token;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use db::models::{
    otp, password_reset_token,
    user::{self, AccountType},
};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{Value, json};
use tower::ServiceExt;

fn signup_body(email: &str, otp: &str) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "password": "strongpassword",
        "confirm_password": "strongpassword",
        "account_type": "student",
        "contact_number": "5550100",
        "otp": otp
    })
}

#[tokio::test]
async fn signup_with_latest_otp_creates_account_and_profile() {
    let app = make_test_app().await;

    let (status, _) = app
        .send(json_request("POST", "/api/auth/send-otp", None, json!({ "email": "ada@example.com" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let code = otp::Model::latest_for(app.db(), "ada@example.com")
        .await
        .unwrap()
        .unwrap()
        .code;
    let mail = app.mailer.last_to("ada@example.com").expect("OTP email sent");
    assert!(mail.text.contains(&code));

    let (status, json) = app
        .send(json_request("POST", "/api/auth/signup", None, signup_body("ada@example.com", &code)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["email"], "ada@example.com");
    assert_eq!(json["data"]["account_type"], "student");
    assert_eq!(json["data"]["profile"]["contact_number"], "5550100");
    assert!(json["data"].get("password_hash").is_none());

    // Used codes are removed
    assert!(otp::Model::latest_for(app.db(), "ada@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn signup_rejects_wrong_or_missing_otp() {
    let app = make_test_app().await;

    let (status, json) = app
        .send(json_request("POST", "/api/auth/signup", None, signup_body("nobody@example.com", "123456")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "No OTP found for this email");

    app.send(json_request("POST", "/api/auth/send-otp", None, json!({ "email": "nobody@example.com" })))
        .await;
    let latest = otp::Model::latest_for(app.db(), "nobody@example.com")
        .await
        .unwrap()
        .unwrap();
    let wrong = if latest.code == "123456" { "654321" } else { "123456" };

    let (status, json) = app
        .send(json_request("POST", "/api/auth/signup", None, signup_body("nobody@example.com", wrong)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid OTP");
    assert!(user::Model::find_by_email(app.db(), "nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn signup_without_otp_field_is_a_bad_request() {
    let app = make_test_app().await;
    let mut body = signup_body("field@example.com", "123456");
    body.as_object_mut().unwrap().remove("otp");

    let (status, json) = app
        .send(json_request("POST", "/api/auth/signup", None, body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("otp"));

    let (status, json) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Request body is not valid JSON");
}

#[tokio::test]
async fn signup_rejects_expired_otp() {
    let app = make_test_app().await;
    let past = Utc::now() - Duration::minutes(10);
    otp::ActiveModel {
        email: Set("late@example.com".into()),
        code: Set("111111".into()),
        created_at: Set(past),
        expires_at: Set(past + Duration::minutes(5)),
        ..Default::default()
    }
    .insert(app.db())
    .await
    .unwrap();

    let (status, json) = app
        .send(json_request("POST", "/api/auth/signup", None, signup_body("late@example.com", "111111")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "OTP has expired");
}

#[tokio::test]
async fn signup_refuses_admin_accounts_and_mismatched_passwords() {
    let app = make_test_app().await;

    let mut body = signup_body("boss@example.com", "123456");
    body["account_type"] = json!("admin");
    let (status, _) = app.send(json_request("POST", "/api/auth/signup", None, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = signup_body("boss@example.com", "123456");
    body["confirm_password"] = json!("different-password");
    let (status, json) = app.send(json_request("POST", "/api/auth/signup", None, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Password and confirm password do not match");
}

#[tokio::test]
async fn send_otp_conflicts_for_registered_email() {
    let app = make_test_app().await;
    user_with_token(app.db(), "taken@example.com", AccountType::Student).await;

    let (status, json) = app
        .send(json_request("POST", "/api/auth/send-otp", None, json!({ "email": "taken@example.com" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);

    let (status, _) = app
        .send(json_request("POST", "/api/auth/send-otp", None, json!({ "email": "Taken@Example.com" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_issues_token_for_user_and_sets_cookie() {
    let app = make_test_app().await;
    let (user, _) = user_with_token(app.db(), "login@example.com", AccountType::Teacher).await;

    let req = json_request(
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": "login@example.com", "password": PASSWORD }),
    );
    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("token cookie set")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    let token = json["data"]["token"].as_str().unwrap();
    let claims = decode_token(token).expect("token decodes");
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.account_type, AccountType::Teacher);
    assert_eq!(json["data"]["user"]["email"], "login@example.com");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = make_test_app().await;
    user_with_token(app.db(), "login2@example.com", AccountType::Student).await;

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "login2@example.com", "password": "wrong-password" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "ghost@example.com", "password": PASSWORD }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_accepts_cookie_token() {
    let app = make_test_app().await;
    let (user, token) = user_with_token(app.db(), "cookie@example.com", AccountType::Student).await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("token={token}"))
        .body(Body::empty())
        .unwrap();
    let (status, json) = app.send(req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], user.id);
    assert!(json["data"]["profile"].is_object());
}

#[tokio::test]
async fn token_of_deleted_user_is_rejected() {
    let app = make_test_app().await;
    let (user, token) = user_with_token(app.db(), "gone@example.com", AccountType::Student).await;
    user::Model::delete(app.db(), user.id).await.unwrap();

    let (status, _) = app.send(empty_request("GET", "/api/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_token() {
    let app = make_test_app().await;
    let (status, _) = app.send(empty_request("GET", "/api/auth/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(empty_request("GET", "/api/auth/me", Some("not-a-jwt")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_checks_old_password_and_notifies() {
    let app = make_test_app().await;
    let (_, token) = user_with_token(app.db(), "change@example.com", AccountType::Student).await;

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            json!({ "old_password": "nope-nope", "new_password": "brandnewpass", "confirm_password": "brandnewpass" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            json!({ "old_password": PASSWORD, "new_password": "brandnewpass", "confirm_password": "brandnewpass" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.mailer.last_to("change@example.com").is_some());

    let account = user::Model::find_by_email(app.db(), "change@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(account.verify_password("brandnewpass"));
}

#[tokio::test]
async fn password_reset_flow_uses_single_use_token() {
    let app = make_test_app().await;
    user_with_token(app.db(), "forgot@example.com", AccountType::Student).await;

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/auth/reset-password-token",
            None,
            json!({ "email": "forgot@example.com" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let mail = app.mailer.last_to("forgot@example.com").expect("reset email sent");
    let raw = mail
        .text
        .split("/update-password/")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .expect("link in email")
        .to_string();

    let body = json!({ "token": raw, "password": "resetpassword", "confirm_password": "resetpassword" });
    let (status, _) = app
        .send(json_request("POST", "/api/auth/reset-password", None, body.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let account = user::Model::find_by_email(app.db(), "forgot@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(account.verify_password("resetpassword"));

    let (status, json) = app
        .send(json_request("POST", "/api/auth/reset-password", None, body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid or expired token");
}

#[tokio::test]
async fn expired_reset_token_is_rejected() {
    let app = make_test_app().await;
    let (account, _) = user_with_token(app.db(), "stale@example.com", AccountType::Student).await;
    let (_, raw) = password_reset_token::Model::issue(app.db(), account.id, -1)
        .await
        .unwrap();

    let body = json!({ "token": raw, "password": "resetpassword", "confirm_password": "resetpassword" });
    let (status, json) = app
        .send(json_request("POST", "/api/auth/reset-password", None, body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid or expired token");

    let account = user::Model::find_by_id(app.db(), account.id).await.unwrap().unwrap();
    assert!(account.verify_password(PASSWORD));
    assert!(!account.verify_password("resetpassword"));
}

#[tokio::test]
async fn reset_token_request_does_not_reveal_unknown_accounts() {
    let app = make_test_app().await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/auth/reset-password-token",
            None,
            json!({ "email": "stranger@example.com" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert!(app.mailer.sent().is_empty());
}
