use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceExt;

/// Opens a fresh in-memory database with the schema applied.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = tasks_server::database::connect("sqlite::memory:").await?;
    Ok(db)
}

/// Builds the full application router backed by a fresh in-memory database.
#[allow(dead_code)]
pub async fn setup_app() -> anyhow::Result<Router> {
    let db = setup_db().await?;
    Ok(tasks_server::web::create_app(Arc::new(db)))
}

/// Sends a request through the router and returns the status and the JSON body.
///
/// Bodies that are not JSON (e.g. empty HEAD responses) come back as `Value::Null`.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// HTTP response snapshot for testing endpoints.
#[allow(dead_code)]
#[derive(Debug, Serialize)]
pub struct HttpResponseSnapshot {
    pub test_context: String,
    pub status: u16,
    pub body: serde_json::Value,
}

impl HttpResponseSnapshot {
    #[allow(dead_code)]
    pub fn new(body: serde_json::Value, status: StatusCode, test_context: &str) -> Self {
        Self {
            test_context: test_context.to_string(),
            status: status.as_u16(),
            body,
        }
    }
}
