use crate::helpers::{
    app::{PAYMENT_SECRET, json_request, make_test_app_with_payment_secret},
    fixtures::{make_category, make_course, make_enrollment, user_with_token},
    make_test_app,
};
use api::services::payment::sign_payment;
use axum::http::StatusCode;
use db::models::{
    course::CourseStatus, course_enrollment, payment_order, user::AccountType,
};
use serde_json::json;

#[tokio::test]
async fn capture_prices_order_in_minor_units() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, _) = user_with_token(db, "seller@example.com", AccountType::Teacher).await;
    let (_, token) = user_with_token(db, "buyer@example.com", AccountType::Student).await;
    let category = make_category(db, "Shop").await;
    let a = make_course(db, teacher.id, category.id, "A", 499, CourseStatus::Published).await;
    let b = make_course(db, teacher.id, category.id, "B", 1, CourseStatus::Published).await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/payments/capture",
            Some(&token),
            json!({ "course_ids": [a.id, b.id, a.id] }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["amount"], 50000);
    assert_eq!(json["data"]["currency"], "INR");
    assert_eq!(json["data"]["key_id"], "offline");

    let order_id = json["data"]["order_id"].as_str().unwrap();
    let stored = payment_order::Model::find_by_gateway_id(db, order_id)
        .await
        .unwrap()
        .expect("order persisted");
    assert_eq!(stored.course_id_list(), vec![a.id, b.id]);
    assert!(!stored.is_paid());
}

#[tokio::test]
async fn capture_rejects_bad_selections() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, teacher_token) = user_with_token(db, "s2@example.com", AccountType::Teacher).await;
    let (student, token) = user_with_token(db, "b2@example.com", AccountType::Student).await;
    let category = make_category(db, "Shop 2").await;
    let owned = make_course(db, teacher.id, category.id, "Owned", 10, CourseStatus::Published).await;
    let draft = make_course(db, teacher.id, category.id, "Draft", 10, CourseStatus::Draft).await;
    make_enrollment(db, student.id, owned.id).await;

    let cases = [
        (json!({ "course_ids": [] }), StatusCode::BAD_REQUEST),
        (json!({ "course_ids": [9999] }), StatusCode::NOT_FOUND),
        (json!({ "course_ids": [draft.id] }), StatusCode::BAD_REQUEST),
        (json!({ "course_ids": [owned.id] }), StatusCode::BAD_REQUEST),
    ];
    for (body, expected) in cases {
        let (status, json) = app
            .send(json_request("POST", "/api/payments/capture", Some(&token), body.clone()))
            .await;
        assert_eq!(status, expected, "body {body}: {json}");
    }

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/payments/capture",
            Some(&teacher_token),
            json!({ "course_ids": [owned.id] }),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn verify_enrols_only_with_valid_signature() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, _) = user_with_token(db, "s3@example.com", AccountType::Teacher).await;
    let (student, token) = user_with_token(db, "b3@example.com", AccountType::Student).await;
    let category = make_category(db, "Shop 3").await;
    let course = make_course(db, teacher.id, category.id, "Paid", 99, CourseStatus::Published).await;

    let (_, json) = app
        .send(json_request(
            "POST",
            "/api/payments/capture",
            Some(&token),
            json!({ "course_ids": [course.id] }),
        ))
        .await;
    let order_id = json["data"]["order_id"].as_str().unwrap().to_string();

    let forged = json!({ "order_id": order_id, "payment_id": "pay_1", "signature": "deadbeef" });
    let (status, json) = app
        .send(json_request("POST", "/api/payments/verify", Some(&token), forged))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Payment verification failed");
    assert!(!course_enrollment::Model::is_enrolled(db, student.id, course.id).await.unwrap());

    let signed = json!({
        "order_id": order_id,
        "payment_id": "pay_1",
        "signature": sign_payment(PAYMENT_SECRET, &order_id, "pay_1")
    });
    let (status, json) = app
        .send(json_request("POST", "/api/payments/verify", Some(&token), signed.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["enrolled_course_ids"], json!([course.id]));
    assert!(course_enrollment::Model::is_enrolled(db, student.id, course.id).await.unwrap());
    assert_eq!(
        app.mailer.last_to("b3@example.com").unwrap().subject,
        "Successfully Enrolled into Paid"
    );

    // Replaying a settled order does not enrol twice
    let (status, _) = app
        .send(json_request("POST", "/api/payments/verify", Some(&token), signed))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        course_enrollment::Model::count_for_course(db, course.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn verify_rejects_someone_elses_order() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, _) = user_with_token(db, "s4@example.com", AccountType::Teacher).await;
    let (_, buyer) = user_with_token(db, "b4@example.com", AccountType::Student).await;
    let (thief, thief_token) = user_with_token(db, "t4@example.com", AccountType::Student).await;
    let category = make_category(db, "Shop 4").await;
    let course = make_course(db, teacher.id, category.id, "Guarded", 99, CourseStatus::Published).await;

    let (_, json) = app
        .send(json_request(
            "POST",
            "/api/payments/capture",
            Some(&buyer),
            json!({ "course_ids": [course.id] }),
        ))
        .await;
    let order_id = json["data"]["order_id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/payments/verify",
            Some(&thief_token),
            json!({
                "order_id": order_id,
                "payment_id": "pay_x",
                "signature": sign_payment(PAYMENT_SECRET, &order_id, "pay_x")
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!course_enrollment::Model::is_enrolled(db, thief.id, course.id).await.unwrap());
}

#[tokio::test]
async fn success_email_formats_major_units() {
    let app = make_test_app().await;
    let (_, token) = user_with_token(app.db(), "receipt@example.com", AccountType::Student).await;

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/payments/success-email",
            Some(&token),
            json!({ "order_id": "order_1", "payment_id": "pay_1", "amount": 49900 }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let mail = app.mailer.last_to("receipt@example.com").expect("receipt sent");
    assert!(mail.text.contains("499"));
    assert!(mail.text.contains("order_1"));
}

#[tokio::test]
async fn capture_rejects_totals_that_overflow() {
    let app = make_test_app().await;
    let db = app.db();
    let (teacher, _) = user_with_token(db, "s5@example.com", AccountType::Teacher).await;
    let (_, token) = user_with_token(db, "b5@example.com", AccountType::Student).await;
    let category = make_category(db, "Shop 5").await;
    let course = make_course(
        db,
        teacher.id,
        category.id,
        "Priceless",
        i64::MAX / 50,
        CourseStatus::Published,
    )
    .await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/payments/capture",
            Some(&token),
            json!({ "course_ids": [course.id] }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Order total is too large");
}

#[tokio::test]
async fn malformed_bodies_get_the_error_envelope() {
    let app = make_test_app().await;
    let (_, token) = user_with_token(app.db(), "b6@example.com", AccountType::Student).await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/payments/verify",
            Some(&token),
            json!({ "order_id": "order_1", "payment_id": "pay_1" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("signature"));

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/payments/capture",
            Some(&token),
            json!({ "course_ids": "all" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn checkout_is_disabled_without_a_payment_secret() {
    let app = make_test_app_with_payment_secret("").await;
    let db = app.db();
    let (teacher, _) = user_with_token(db, "s7@example.com", AccountType::Teacher).await;
    let (student, token) = user_with_token(db, "b7@example.com", AccountType::Student).await;
    let category = make_category(db, "Shop 7").await;
    let course = make_course(db, teacher.id, category.id, "Locked", 10, CourseStatus::Published).await;

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/payments/capture",
            Some(&token),
            json!({ "course_ids": [course.id] }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    payment_order::Model::create(db, "order_x", student.id, 1000, "INR", &[course.id])
        .await
        .unwrap();
    let forged = json!({
        "order_id": "order_x",
        "payment_id": "pay_anything",
        "signature": sign_payment("", "order_x", "pay_anything")
    });
    let (status, json) = app
        .send(json_request("POST", "/api/payments/verify", Some(&token), forged))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["message"], "Payments are not configured");
    assert!(!course_enrollment::Model::is_enrolled(db, student.id, course.id).await.unwrap());
}
