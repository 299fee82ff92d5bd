use crate::helpers::{
    app::{empty_request, json_request, multipart_request},
    fixtures::{make_category, make_course, make_enrollment, make_lecture, make_section, user_with_token},
    make_test_app,
};
use axum::http::StatusCode;
use db::models::{
    course::{self, CourseStatus},
    course_enrollment, section, sub_section,
    user::AccountType,
};
use serde_json::json;

fn course_fields(category_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("course_name", "Rust for Servers".to_string()),
        ("course_description", "Build HTTP services".to_string()),
        ("what_you_will_learn", "axum and SeaORM".to_string()),
        ("price", "499".to_string()),
        ("category_id", category_id.to_string()),
        ("tag", r#"["rust","web"]"#.to_string()),
        ("instructions", r#"["Install rustup"]"#.to_string()),
        ("status", "published".to_string()),
    ]
}

#[tokio::test]
async fn teacher_creates_course_with_thumbnail() {
    let app = make_test_app().await;
    let (teacher, token) = user_with_token(app.db(), "maker@example.com", AccountType::Teacher).await;
    let category = make_category(app.db(), "Backend").await;

    let owned = course_fields(&category.id.to_string());
    let fields: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let (status, json) = app
        .send(multipart_request(
            "POST",
            "/api/courses",
            Some(&token),
            &fields,
            &[("thumbnail_image", "cover.png", "image/png", b"\x89PNG fake".as_slice())],
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["instructor_id"], teacher.id);
    assert_eq!(json["data"]["price"], 499);
    assert_eq!(json["data"]["status"], "published");
    assert_eq!(json["data"]["tags"], json!(["rust", "web"]));
    assert!(
        json["data"]["thumbnail"]
            .as_str()
            .unwrap()
            .starts_with("http://localhost/media/thumbnails/")
    );
}

#[tokio::test]
async fn create_course_validates_form() {
    let app = make_test_app().await;
    let (_, token) = user_with_token(app.db(), "val@example.com", AccountType::Teacher).await;
    let category = make_category(app.db(), "Validation").await;
    let image = [("thumbnail_image", "cover.png", "image/png", &b"img"[..])];

    // Missing thumbnail
    let owned = course_fields(&category.id.to_string());
    let fields: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let (status, _) = app
        .send(multipart_request("POST", "/api/courses", Some(&token), &fields, &[]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Negative price
    let mut owned = course_fields(&category.id.to_string());
    owned[3].1 = "-5".into();
    let fields: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let (status, json) = app
        .send(multipart_request("POST", "/api/courses", Some(&token), &fields, &image))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Price cannot be negative");

    // Price above the ceiling
    let mut owned = course_fields(&category.id.to_string());
    owned[3].1 = (i64::MAX / 50).to_string();
    let fields: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let (status, json) = app
        .send(multipart_request("POST", "/api/courses", Some(&token), &fields, &image))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Price cannot exceed 10000000");

    // Unknown category
    let owned = course_fields("9999");
    let fields: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let (status, json) = app
        .send(multipart_request("POST", "/api/courses", Some(&token), &fields, &image))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Category not found");

    // Missing name
    let owned: Vec<_> = course_fields(&category.id.to_string()).into_iter().skip(1).collect();
    let fields: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let (status, _) = app
        .send(multipart_request("POST", "/api/courses", Some(&token), &fields, &image))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn students_cannot_create_courses() {
    let app = make_test_app().await;
    let (_, token) = user_with_token(app.db(), "learner@example.com", AccountType::Student).await;
    let category = make_category(app.db(), "Nope").await;

    let owned = course_fields(&category.id.to_string());
    let fields: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let (status, _) = app
        .send(multipart_request(
            "POST",
            "/api/courses",
            Some(&token),
            &fields,
            &[("thumbnail_image", "cover.png", "image/png", b"img".as_slice())],
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(course::Model::list_published(app.db()).await.unwrap().is_empty());
}

#[tokio::test]
async fn public_listing_hides_drafts() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, _) = user_with_token(db, "drafts@example.com", AccountType::Teacher).await;
    let category = make_category(db, "Drafts").await;
    let live = make_course(db, teacher.id, category.id, "Live", 10, CourseStatus::Published).await;
    let draft = make_course(db, teacher.id, category.id, "Draft", 10, CourseStatus::Draft).await;

    let (status, json) = app.send(empty_request("GET", "/api/courses", None)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![live.id]);
    assert_eq!(json["data"][0]["instructor"]["id"], teacher.id);

    let (status, _) = app
        .send(empty_request("GET", &format!("/api/courses/{}", draft.id), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn course_details_hide_video_urls() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, _) = user_with_token(db, "details@example.com", AccountType::Teacher).await;
    let category = make_category(db, "Details").await;
    let course = make_course(db, teacher.id, category.id, "Details", 10, CourseStatus::Published).await;
    let section = make_section(db, course.id, "Week 1").await;
    make_lecture(db, section.id, "intro", 3600).await;
    make_lecture(db, section.id, "setup", 300).await;

    let (status, json) = app
        .send(empty_request("GET", &format!("/api/courses/{}", course.id), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total_lectures"], 2);
    assert_eq!(json["data"]["total_duration"], "1h 5m");
    let lecture = &json["data"]["sections"][0]["sub_sections"][0];
    assert!(lecture.get("video_url").is_none() || lecture["video_url"].is_null());
    assert!(json["data"].get("completed_videos").is_none());
}

#[tokio::test]
async fn full_course_requires_enrolment() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, teacher_token) = user_with_token(db, "full@example.com", AccountType::Teacher).await;
    let (student, token) = user_with_token(db, "fulls@example.com", AccountType::Student).await;
    let (_, outsider) = user_with_token(db, "fullo@example.com", AccountType::Student).await;
    let category = make_category(db, "Full").await;
    let course = make_course(db, teacher.id, category.id, "Full", 10, CourseStatus::Published).await;
    let section = make_section(db, course.id, "Week 1").await;
    let lecture = make_lecture(db, section.id, "intro", 60).await;
    make_enrollment(db, student.id, course.id).await;
    let uri = format!("/api/courses/{}/full", course.id);

    let (status, _) = app.send(empty_request("GET", &uri, Some(&outsider))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(json_request(
            "POST",
            &format!("/api/courses/{}/progress", course.id),
            Some(&token),
            json!({ "sub_section_id": lecture.id }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app.send(empty_request("GET", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["completed_videos"], json!([lecture.id]));
    assert!(json["data"]["sections"][0]["sub_sections"][0]["video_url"].is_string());

    // The instructor sees the full course without enrolling
    let (status, _) = app.send(empty_request("GET", &uri, Some(&teacher_token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn progress_rules() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, _) = user_with_token(db, "prog@example.com", AccountType::Teacher).await;
    let (student, token) = user_with_token(db, "progs@example.com", AccountType::Student).await;
    let (_, outsider) = user_with_token(db, "progo@example.com", AccountType::Student).await;
    let category = make_category(db, "Progress").await;
    let course = make_course(db, teacher.id, category.id, "Progress", 10, CourseStatus::Published).await;
    let other = make_course(db, teacher.id, category.id, "Other", 10, CourseStatus::Published).await;
    let section = make_section(db, course.id, "Week 1").await;
    let lecture = make_lecture(db, section.id, "intro", 60).await;
    let other_section = make_section(db, other.id, "Elsewhere").await;
    let foreign = make_lecture(db, other_section.id, "foreign", 60).await;
    make_enrollment(db, student.id, course.id).await;
    let uri = format!("/api/courses/{}/progress", course.id);

    let (status, _) = app
        .send(json_request("POST", &uri, Some(&outsider), json!({ "sub_section_id": lecture.id })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(json_request("POST", &uri, Some(&token), json!({ "sub_section_id": foreign.id })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(json_request("POST", &uri, Some(&token), json!({ "sub_section_id": lecture.id })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app
        .send(json_request("POST", &uri, Some(&token), json!({ "sub_section_id": lecture.id })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Subsection already completed");
}

#[tokio::test]
async fn only_the_instructor_edits_a_course() {
    let app = make_test_app().await;
    let db = app.db();
    let (owner, owner_token) = user_with_token(db, "owner@example.com", AccountType::Teacher).await;
    let (_, rival) = user_with_token(db, "rival@example.com", AccountType::Teacher).await;
    let (_, admin) = user_with_token(db, "root@example.com", AccountType::Admin).await;
    let category = make_category(db, "Edits").await;
    let course = make_course(db, owner.id, category.id, "Original", 10, CourseStatus::Draft).await;
    let uri = format!("/api/courses/{}", course.id);

    let (status, _) = app
        .send(multipart_request("PUT", &uri, Some(&rival), &[("course_name", "Hijacked")], &[]))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app
        .send(multipart_request(
            "PUT",
            &uri,
            Some(&owner_token),
            &[("course_name", "Renamed"), ("status", "published")],
            &[],
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["course_name"], "Renamed");
    assert_eq!(json["data"]["status"], "published");
    assert_eq!(json["data"]["price"], 10);

    let (status, _) = app
        .send(multipart_request("PUT", &uri, Some(&admin), &[("price", "20")], &[]))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(multipart_request("PUT", "/api/courses/9999", Some(&owner_token), &[("price", "20")], &[]))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_course_cascades() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, token) = user_with_token(db, "del@example.com", AccountType::Teacher).await;
    let (student, _) = user_with_token(db, "dels@example.com", AccountType::Student).await;
    let category = make_category(db, "Deletes").await;
    let course = make_course(db, teacher.id, category.id, "Doomed", 10, CourseStatus::Published).await;
    let section = make_section(db, course.id, "Week 1").await;
    let lecture = make_lecture(db, section.id, "intro", 60).await;
    make_enrollment(db, student.id, course.id).await;

    let (status, _) = app
        .send(empty_request("DELETE", &format!("/api/courses/{}", course.id), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);

    assert!(course::Model::find_by_id(db, course.id).await.unwrap().is_none());
    assert!(section::Model::find_in_course(db, course.id, section.id).await.unwrap().is_none());
    assert!(
        sub_section::Model::find_in_section(db, section.id, lecture.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        !course_enrollment::Model::is_enrolled(db, student.id, course.id)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn my_courses_include_drafts() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, token) = user_with_token(db, "mine@example.com", AccountType::Teacher).await;
    let (other, _) = user_with_token(db, "notmine@example.com", AccountType::Teacher).await;
    let category = make_category(db, "Mine").await;
    make_course(db, teacher.id, category.id, "Draft", 10, CourseStatus::Draft).await;
    make_course(db, teacher.id, category.id, "Live", 10, CourseStatus::Published).await;
    make_course(db, other.id, category.id, "Theirs", 10, CourseStatus::Published).await;

    let (status, json) = app.send(empty_request("GET", "/api/courses/mine", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}
