use api::routes::routes;
use api::services::{email::LogMailer, media::LocalMediaStore, payment::OfflineGateway};
use api::state::AppState;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use db::test_utils::setup_test_db;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PAYMENT_SECRET: &str = "test_payment_secret";
const BOUNDARY: &str = "----notewrite-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: Arc<LogMailer>,
    pub media_root: TempDir,
}

/// Router over a fresh in-memory database, a temp media folder, a logging
/// mailer and the offline payment gateway.
pub async fn make_test_app() -> TestApp {
    make_test_app_with_payment_secret(PAYMENT_SECRET).await
}

/// Same as [`make_test_app`] with the offline gateway keyed by `secret`.
pub async fn make_test_app_with_payment_secret(secret: &str) -> TestApp {
    let db = setup_test_db().await;
    let media_root = tempfile::tempdir().expect("Failed to create media dir");
    let mailer = Arc::new(LogMailer::new());

    let state = AppState::new(
        db,
        mailer.clone(),
        Arc::new(LocalMediaStore::new(
            media_root.path(),
            "http://localhost/media",
        )),
        Arc::new(OfflineGateway::new(secret)),
    );

    let router = Router::new().nest("/api", routes(state.clone()));

    TestApp {
        router,
        state,
        mailer,
        media_root,
    }
}

impl TestApp {
    pub fn db(&self) -> &sea_orm::DatabaseConnection {
        self.state.db()
    }

    /// Sends a request and returns the status and decoded JSON body.
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

fn with_auth(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method(method).uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    with_auth(Request::builder().method(method).uri(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A file part for [`multipart_request`]: field name, file name, content type, bytes.
pub type FilePart<'a> = (&'a str, &'a str, &'a str, &'a [u8]);

pub fn multipart_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
    files: &[FilePart<'_>],
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    with_auth(Request::builder().method(method).uri(uri), token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
