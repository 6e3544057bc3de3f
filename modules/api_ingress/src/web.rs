use axum::{
    http::{HeaderMap, StatusCode, Uri},
    response::{Html, Json},
};
use modkit::api::problem::{Problem, ProblemResponse};
use modkit::http::request_id;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn healthz() -> &'static str {
    "ok"
}

/// Fallback for any path no module registered.
pub async fn route_not_found(uri: Uri, headers: HeaderMap) -> ProblemResponse {
    let rid = headers
        .get(request_id::header())
        .and_then(|v| v.to_str().ok());
    Problem::new(StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND", "Not Found", "Route not found")
        .at(uri.path(), rid)
        .into()
}

pub async fn serve_docs() -> Html<&'static str> {
    // Stoplight Elements from CDN, pointed at our document
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>Catalog API Docs</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}
