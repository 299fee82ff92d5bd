use crate::helpers::{
    app::{empty_request, json_request},
    fixtures::{make_category, make_course, user_with_token},
    make_test_app,
};
use axum::http::StatusCode;
use db::models::{
    course::CourseStatus,
    user::{self, AccountType},
};
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use serde_json::json;

#[tokio::test]
async fn malformed_course_id_is_rejected() {
    let app = make_test_app().await;
    let (_, token) = user_with_token(app.db(), "bad@example.com", AccountType::Student).await;

    let (status, _) = app
        .send(empty_request("GET", "/api/courses/abc/full", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_course_is_not_found_for_instructor_routes() {
    let app = make_test_app().await;
    let (_, token) = user_with_token(app.db(), "nf@example.com", AccountType::Teacher).await;

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/courses/424242/sections",
            Some(&token),
            json!({ "section_name": "Ghost" }),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admins_pass_course_guards() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, _) = user_with_token(db, "gt@example.com", AccountType::Teacher).await;
    let (_, admin) = user_with_token(db, "ga@example.com", AccountType::Admin).await;
    let category = make_category(db, "Guards").await;
    let course = make_course(db, teacher.id, category.id, "Guarded", 10, CourseStatus::Draft).await;

    let (status, _) = app
        .send(empty_request("GET", &format!("/api/courses/{}/full", course.id), Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(json_request(
            "POST",
            &format!("/api/courses/{}/sections", course.id),
            Some(&admin),
            json!({ "section_name": "Moderated" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn account_type_is_read_from_the_database() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, token) = user_with_token(db, "demoted@example.com", AccountType::Teacher).await;

    let (status, _) = app.send(empty_request("GET", "/api/courses/mine", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let mut active = teacher.into_active_model();
    active.account_type = Set(AccountType::Student);
    active.update(db).await.unwrap();

    // Same token, but the account is now a student
    let (status, _) = app.send(empty_request("GET", "/api/courses/mine", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let stored = user::Model::find_by_email(db, "demoted@example.com").await.unwrap().unwrap();
    assert_eq!(stored.account_type, AccountType::Student);
}
