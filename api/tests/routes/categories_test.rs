use crate::helpers::{
    app::{empty_request, json_request},
    fixtures::{make_category, make_course, make_enrollment, user_with_token},
    make_test_app,
};
use axum::http::StatusCode;
use db::models::{course::CourseStatus, user::AccountType};
use serde_json::json;

#[tokio::test]
async fn only_admins_create_categories() {
    let app = make_test_app().await;
    let (_, admin) = user_with_token(app.db(), "admin@example.com", AccountType::Admin).await;
    let (_, teacher) = user_with_token(app.db(), "teach@example.com", AccountType::Teacher).await;
    let body = json!({ "name": "Web Development", "description": "Browsers and servers" });

    let (status, _) = app
        .send(json_request("POST", "/api/categories", Some(&teacher), body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(json_request("POST", "/api/categories", None, body.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = app
        .send(json_request("POST", "/api/categories", Some(&admin), body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["name"], "Web Development");

    let (status, _) = app
        .send(json_request("POST", "/api/categories", Some(&admin), body))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_categories_is_public() {
    let app = make_test_app().await;
    make_category(app.db(), "Databases").await;
    make_category(app.db(), "Algorithms").await;

    let (status, json) = app.send(empty_request("GET", "/api/categories", None)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Algorithms", "Databases"]);
}

#[tokio::test]
async fn category_page_lists_published_courses() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, _) = user_with_token(db, "cp@example.com", AccountType::Teacher).await;
    let (student, _) = user_with_token(db, "cps@example.com", AccountType::Student).await;
    let web = make_category(db, "Web").await;
    let data = make_category(db, "Data").await;
    let html = make_course(db, teacher.id, web.id, "HTML", 10, CourseStatus::Published).await;
    make_course(db, teacher.id, web.id, "Unreleased", 10, CourseStatus::Draft).await;
    let sql = make_course(db, teacher.id, data.id, "SQL", 10, CourseStatus::Published).await;
    make_enrollment(db, student.id, sql.id).await;

    let (status, json) = app
        .send(empty_request("GET", &format!("/api/categories/{}/page", web.id), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    let selected = json["data"]["selected_category"]["courses"].as_array().unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0]["id"], html.id);
    assert_eq!(json["data"]["different_category"]["category"]["id"], data.id);
    assert_eq!(json["data"]["most_selling_courses"][0]["id"], sql.id);
}

#[tokio::test]
async fn category_page_not_found_cases() {
    let app = make_test_app().await;
    let empty = make_category(app.db(), "Empty").await;

    let (status, json) = app
        .send(empty_request("GET", &format!("/api/categories/{}/page", empty.id), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "No published courses found for this category");

    let (status, json) = app
        .send(empty_request("GET", "/api/categories/9999/page", None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Category not found");
}
