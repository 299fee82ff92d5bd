use api::auth::generate_jwt;
use db::enrollment::enroll;
use db::models::{
    category,
    course::{self, CourseStatus, NewCourse},
    profile, section,
    sub_section::{self, NewSubSection},
    user::{self, AccountType},
};
use sea_orm::DatabaseConnection;

pub const PASSWORD: &str = "password123";

/// Creates an account with an empty profile and returns it with a bearer token.
pub async fn user_with_token(
    db: &DatabaseConnection,
    email: &str,
    account_type: AccountType,
) -> (user::Model, String) {
    let created = user::Model::create(db, "Test", "User", email, PASSWORD, account_type)
        .await
        .expect("Failed to create user");
    profile::Model::create_empty(db, created.id, None)
        .await
        .expect("Failed to create profile");
    let (token, _) = generate_jwt(created.id, &created.email, created.account_type).unwrap();
    (created, token)
}

pub async fn make_category(db: &DatabaseConnection, name: &str) -> category::Model {
    category::Model::create(db, name, "Test category")
        .await
        .expect("Failed to create category")
}

pub async fn make_course(
    db: &DatabaseConnection,
    instructor_id: i64,
    category_id: i64,
    name: &str,
    price: i64,
    status: CourseStatus,
) -> course::Model {
    course::Model::create(
        db,
        NewCourse {
            course_name: name.to_string(),
            course_description: format!("About {name}"),
            instructor_id,
            what_you_will_learn: "Things".into(),
            price,
            thumbnail: "http://localhost/media/thumbnails/cover.png".into(),
            category_id,
            tags: vec!["rust".into()],
            instructions: vec![],
            status,
        },
    )
    .await
    .expect("Failed to create course")
}

pub async fn make_section(db: &DatabaseConnection, course_id: i64, name: &str) -> section::Model {
    section::Model::create(db, course_id, name)
        .await
        .expect("Failed to create section")
}

pub async fn make_lecture(
    db: &DatabaseConnection,
    section_id: i64,
    title: &str,
    seconds: i32,
) -> sub_section::Model {
    sub_section::Model::create(
        db,
        section_id,
        NewSubSection {
            title: title.to_string(),
            description: "Lecture".into(),
            video_url: format!("http://localhost/media/videos/{title}.mp4"),
            duration_seconds: seconds,
        },
    )
    .await
    .expect("Failed to create lecture")
}

pub async fn make_enrollment(db: &DatabaseConnection, user_id: i64, course_id: i64) {
    enroll(db, user_id, course_id)
        .await
        .expect("Failed to enrol");
}
