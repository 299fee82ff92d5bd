use crate::helpers::{app::json_request, make_test_app};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn contact_message_is_forwarded_and_confirmed() {
    let app = make_test_app().await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/contact",
            None,
            json!({
                "first_name": "Lin",
                "last_name": "Ng",
                "email": "lin@example.com",
                "phone_number": "5550123",
                "message": "Do you offer team licences?"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Message sent successfully");

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 2);
    let forwarded = sent
        .iter()
        .find(|m| m.to != "lin@example.com")
        .expect("forwarded to support");
    assert!(forwarded.text.contains("Do you offer team licences?"));
    assert!(forwarded.text.contains("5550123"));

    let confirmation = app.mailer.last_to("lin@example.com").expect("confirmation sent");
    assert!(confirmation.text.contains("Dear Lin"));
}

#[tokio::test]
async fn contact_message_is_validated() {
    let app = make_test_app().await;

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/contact",
            None,
            json!({ "first_name": "Lin", "email": "not-an-email", "message": "Hi" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/contact",
            None,
            json!({ "first_name": "Lin", "email": "lin@example.com", "message": "" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.mailer.sent().is_empty());
}
