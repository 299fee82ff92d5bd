use crate::helpers::{
    app::{empty_request, json_request, multipart_request},
    fixtures::{make_category, make_course, make_enrollment, make_lecture, make_section, user_with_token},
    make_test_app,
};
use axum::http::StatusCode;
use db::models::{course::CourseStatus, user::{self, AccountType}};
use db::progress::mark_complete;
use serde_json::json;

#[tokio::test]
async fn get_profile_returns_user_and_profile() {
    let app = make_test_app().await;
    let (user, token) = user_with_token(app.db(), "me@example.com", AccountType::Student).await;

    let (status, json) = app.send(empty_request("GET", "/api/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["profile"]["user_id"], user.id);
}

#[tokio::test]
async fn update_profile_changes_names_and_details() {
    let app = make_test_app().await;
    let (_, token) = user_with_token(app.db(), "edit@example.com", AccountType::Student).await;

    let (status, json) = app
        .send(json_request(
            "PUT",
            "/api/profile",
            Some(&token),
            json!({
                "first_name": "Grace",
                "gender": "female",
                "date_of_birth": "1906-12-09",
                "about": "Compilers",
                "contact_number": "5550199"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["first_name"], "Grace");
    assert_eq!(json["data"]["last_name"], "User");
    assert_eq!(json["data"]["profile"]["date_of_birth"], "1906-12-09");
    assert_eq!(json["data"]["profile"]["about"], "Compilers");
}

#[tokio::test]
async fn update_profile_rejects_bad_date() {
    let app = make_test_app().await;
    let (_, token) = user_with_token(app.db(), "date@example.com", AccountType::Student).await;

    let (status, json) = app
        .send(json_request(
            "PUT",
            "/api/profile",
            Some(&token),
            json!({ "date_of_birth": "09/12/1906" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn display_picture_must_be_an_image() {
    let app = make_test_app().await;
    let (user, token) = user_with_token(app.db(), "pic@example.com", AccountType::Student).await;

    let (status, _) = app
        .send(multipart_request(
            "PUT",
            "/api/profile/display-picture",
            Some(&token),
            &[],
            &[("display_picture", "notes.txt", "text/plain", b"hello".as_slice())],
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = app
        .send(multipart_request(
            "PUT",
            "/api/profile/display-picture",
            Some(&token),
            &[],
            &[("display_picture", "me.png", "image/png", b"\x89PNG fake".as_slice())],
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let image = json["data"]["image"].as_str().unwrap();
    assert!(image.starts_with("http://localhost/media/avatars/"));

    let stored = user::Model::find_by_id(app.db(), user.id).await.unwrap().unwrap();
    assert_eq!(stored.image, image);
}

#[tokio::test]
async fn delete_account_removes_user() {
    let app = make_test_app().await;
    let (user, token) = user_with_token(app.db(), "bye@example.com", AccountType::Student).await;

    let (status, _) = app.send(empty_request("DELETE", "/api/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(user::Model::find_by_id(app.db(), user.id).await.unwrap().is_none());

    let (status, _) = app.send(empty_request("GET", "/api/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn enrolled_courses_show_progress_for_students_only() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, teacher_token) = user_with_token(db, "t@example.com", AccountType::Teacher).await;
    let (student, token) = user_with_token(db, "s@example.com", AccountType::Student).await;
    let category = make_category(db, "Systems").await;
    let course = make_course(db, teacher.id, category.id, "Kernels", 100, CourseStatus::Published).await;
    let section = make_section(db, course.id, "Intro").await;
    let first = make_lecture(db, section.id, "boot", 60).await;
    make_lecture(db, section.id, "paging", 60).await;
    make_enrollment(db, student.id, course.id).await;
    mark_complete(db, student.id, course.id, first.id).await.unwrap();

    let (status, json) = app
        .send(empty_request("GET", "/api/profile/enrolled-courses", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    let courses = json["data"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["id"], course.id);
    assert_eq!(courses[0]["total_sub_sections"], 2);
    assert_eq!(courses[0]["completed_sub_sections"], 1);
    assert_eq!(courses[0]["progress_percentage"], 50.0);

    let (status, _) = app
        .send(empty_request("GET", "/api/profile/enrolled-courses", Some(&teacher_token)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn instructor_dashboard_reports_revenue() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, token) = user_with_token(db, "rev@example.com", AccountType::Teacher).await;
    let (a, student_token) = user_with_token(db, "a@example.com", AccountType::Student).await;
    let (b, _) = user_with_token(db, "b@example.com", AccountType::Student).await;
    let category = make_category(db, "Money").await;
    let course = make_course(db, teacher.id, category.id, "Pricing", 250, CourseStatus::Published).await;
    make_enrollment(db, a.id, course.id).await;
    make_enrollment(db, b.id, course.id).await;

    let (status, json) = app
        .send(empty_request("GET", "/api/profile/instructor-dashboard", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["total_students_enrolled"], 2);
    assert_eq!(json["data"][0]["total_amount_generated"], 500);

    let (status, _) = app
        .send(empty_request("GET", "/api/profile/instructor-dashboard", Some(&student_token)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
