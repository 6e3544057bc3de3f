//! Integration-style tests for the items module.
//!
//! Key points:
//! - Each test runs on a fresh in-memory SQLite DB and applies migrations.
//! - Service is constructed with a SeaORM-backed repository (Domain Port + Adapter).
//! - REST layer is exercised via an Axum Router registered through the module.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use items::{
    contract::model::{ItemQuery, ItemSort},
    domain::{
        error::DomainError,
        normalize::{CreateInput, PartialInput, ReplaceInput},
        object_id::ObjectId,
        service::{Service, ServiceConfig},
    },
    infra::storage::{migrations::Migrator, sea_orm_repo::SeaOrmItemsRepository},
    ItemsConfig, ItemsModule,
};
use modkit::{DbModule, RestfulModule};

/// Create a fresh test database for each test (in-memory SQLite) and run migrations.
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Build the domain Service with a SeaORM-backed repository.
async fn create_test_service() -> Arc<Service> {
    let db = create_test_db().await;
    let repo = SeaOrmItemsRepository::new(db);
    Arc::new(Service::new(Arc::new(repo), ServiceConfig::default()))
}

/// Build the module router the same way the server does.
async fn create_test_router(cfg: ItemsConfig) -> Router {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    let module = ItemsModule::new(db, cfg);
    module.migrate().await.expect("Failed to run migrations");
    module
        .register_rest(Router::new())
        .expect("Failed to register routes")
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create(router: &Router, body: Value) -> Value {
    let (status, item) = send(router, "POST", "/items", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{item}");
    item
}

// ---------------------------------------------------------------------------
// Service over SeaORM
// ---------------------------------------------------------------------------

#[tokio::test]
async fn service_crud_round_trip() {
    let svc = create_test_service().await;

    let input = CreateInput::parse(&json!({"name": " Widget ", "price": 10})).unwrap();
    let created = svc.create_item(input).await.unwrap();
    assert_eq!(created.name, "Widget");
    assert_eq!(created.created_at, created.updated_at);

    let fetched = svc.get_item(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let patch = PartialInput::parse(&json!({"quantity": 3})).unwrap();
    let patched = svc.patch_item(created.id, patch).await.unwrap();
    assert_eq!(patched.quantity, 3.0);
    assert_eq!(patched.price, 10.0);
    assert_eq!(patched.created_at, created.created_at);
    assert!(patched.updated_at >= created.updated_at);

    svc.delete_item(created.id).await.unwrap();
    assert!(matches!(
        svc.get_item(created.id).await,
        Err(DomainError::ItemNotFound { .. })
    ));
}

#[tokio::test]
async fn replace_resets_omitted_fields_and_is_idempotent() {
    let svc = create_test_service().await;
    let created = svc
        .create_item(
            CreateInput::parse(&json!({
                "name": "Lamp",
                "description": "desk lamp",
                "category": "lighting",
                "price": 25,
                "quantity": 4
            }))
            .unwrap(),
        )
        .await
        .unwrap();

    let body = json!({"name": "Lamp v2", "price": 30});
    let first = svc
        .replace_item(created.id, ReplaceInput::parse(&body).unwrap())
        .await
        .unwrap();
    assert_eq!(first.description, "");
    assert_eq!(first.category, "general");
    assert_eq!(first.quantity, 0.0);
    assert_eq!(first.created_at, created.created_at);

    let second = svc
        .replace_item(created.id, ReplaceInput::parse(&body).unwrap())
        .await
        .unwrap();
    assert_eq!(
        (&first.name, &first.description, &first.category, first.price, first.quantity),
        (&second.name, &second.description, &second.category, second.price, second.quantity)
    );
    assert_eq!(first.created_at, second.created_at);
}

#[tokio::test]
async fn service_lists_with_filters_and_sorting() {
    let svc = create_test_service().await;
    for (name, category, price) in [
        ("a", "tools", 5.0),
        ("b", "tools", 15.0),
        ("c", "toys", 25.0),
        ("d", "tools", 35.0),
    ] {
        let body = json!({"name": name, "category": category, "price": price});
        svc.create_item(CreateInput::parse(&body).unwrap())
            .await
            .unwrap();
    }

    let tools = svc
        .list_items(ItemQuery {
            category: Some("tools".into()),
            min_price: Some(10.0),
            sort: ItemSort::PriceDesc,
            limit: None,
        })
        .await
        .unwrap();
    let names: Vec<&str> = tools.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["d", "b"]);

    let cheapest = svc
        .list_items(ItemQuery {
            sort: ItemSort::PriceAsc,
            limit: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<&str> = cheapest.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);

    let newest = svc.list_items(ItemQuery::default()).await.unwrap();
    assert_eq!(newest.first().map(|i| i.name.as_str()), Some("d"));
    assert_eq!(newest.len(), 4);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let svc = create_test_service().await;
    let id = ObjectId::new();
    assert!(matches!(
        svc.get_item(id).await,
        Err(DomainError::ItemNotFound { .. })
    ));
    assert!(matches!(
        svc.delete_item(id).await,
        Err(DomainError::ItemNotFound { .. })
    ));
}

// ---------------------------------------------------------------------------
// REST
// ---------------------------------------------------------------------------

#[tokio::test]
async fn post_trims_name_and_applies_defaults() {
    let router = create_test_router(ItemsConfig::default()).await;
    let item = create(&router, json!({"name": " Widget ", "price": 10})).await;

    assert_eq!(item["name"], "Widget");
    assert_eq!(item["price"].as_f64(), Some(10.0));
    assert_eq!(item["quantity"].as_f64(), Some(0.0));
    assert_eq!(item["description"], "");
    assert_eq!(item["category"], "general");
    assert_eq!(item["createdAt"], item["updatedAt"]);

    let id = item["id"].as_str().unwrap();
    assert!(items::domain::object_id::is_valid(id));

    let (status, fetched) = send(&router, "GET", &format!("/items/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, item);
}

#[tokio::test]
async fn post_rejects_invalid_bodies() {
    let router = create_test_router(ItemsConfig::default()).await;

    let (status, problem) = send(&router, "POST", "/items", Some(json!({"price": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        problem["detail"],
        "name is required and must be a non-empty string"
    );
    assert_eq!(problem["code"], "ITEMS_VALIDATION");
    assert_eq!(problem["errors"][0]["pointer"], "/name");

    let (status, problem) = send(&router, "POST", "/items", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["detail"], "Request body must be a JSON object");

    let request = Request::builder()
        .method("POST")
        .uri("/items")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
}

#[tokio::test]
async fn malformed_id_is_rejected_before_storage() {
    let router = create_test_router(ItemsConfig::default()).await;

    for method in ["GET", "DELETE"] {
        let (status, problem) = send(&router, method, "/items/not-an-id", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(problem["detail"], "Invalid ID");
        assert_eq!(problem["code"], "ITEMS_INVALID_ID");
        assert_eq!(problem["instance"], "/items/not-an-id");
    }

    // The id check wins over body validation.
    let (status, problem) = send(&router, "PATCH", "/items/xyz", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["detail"], "Invalid ID");

    let (status, _) = send(
        &router,
        "GET",
        "/items/507F1F77BCF86CD799439011",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_items_are_404() {
    let router = create_test_router(ItemsConfig::default()).await;
    let id = ObjectId::new().to_hex();

    let (status, problem) = send(&router, "DELETE", &format!("/items/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["code"], "ITEMS_NOT_FOUND");

    let (status, _) = send(&router, "GET", &format!("/items/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &router,
        "PUT",
        &format!("/items/{id}"),
        Some(json!({"name": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &router,
        "PATCH",
        &format!("/items/{id}"),
        Some(json!({"price": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_validation() {
    let router = create_test_router(ItemsConfig::default()).await;
    let item = create(&router, json!({"name": "Widget", "price": 10})).await;
    let uri = format!("/items/{}", item["id"].as_str().unwrap());

    let (status, problem) = send(&router, "PATCH", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["detail"], "PATCH body cannot be empty");

    let (status, problem) = send(&router, "PATCH", &uri, Some(json!({"colour": "red"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["detail"], "Unknown field: colour");

    let (status, patched) = send(&router, "PATCH", &uri, Some(json!({"quantity": 7}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["quantity"].as_f64(), Some(7.0));
    assert_eq!(patched["name"], "Widget");
    assert_eq!(patched["createdAt"], item["createdAt"]);
}

#[tokio::test]
async fn invalid_replace_leaves_document_unchanged() {
    let router = create_test_router(ItemsConfig::default()).await;
    let item = create(&router, json!({"name": "Widget", "price": 10})).await;
    let uri = format!("/items/{}", item["id"].as_str().unwrap());

    let (status, problem) = send(
        &router,
        "PUT",
        &uri,
        Some(json!({"name": "Widget", "price": -5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["detail"], "price must be a non-negative number");

    // Without a name the name rule fails first, still leaving the item as is.
    let (status, problem) = send(&router, "PUT", &uri, Some(json!({"price": -5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        problem["detail"],
        "name is required and must be a non-empty string"
    );

    let (status, stored) = send(&router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, item);
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let router = create_test_router(ItemsConfig::default()).await;
    // Past axum's default 2 MB extractor limit.
    let body = json!({"name": "x".repeat(3 * 1024 * 1024)});

    let (status, problem) = send(&router, "POST", "/items", Some(body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(problem["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(problem["instance"], "/items");

    let (_, listed) = send(&router, "GET", "/items", None).await;
    assert_eq!(listed["count"], 0);
}

#[tokio::test]
async fn put_replaces_full_state() {
    let router = create_test_router(ItemsConfig::default()).await;
    let item = create(
        &router,
        json!({"name": "Widget", "category": "tools", "quantity": 3}),
    )
    .await;
    let uri = format!("/items/{}", item["id"].as_str().unwrap());

    let (status, replaced) = send(&router, "PUT", &uri, Some(json!({"name": "Gadget"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], item["id"]);
    assert_eq!(replaced["name"], "Gadget");
    assert_eq!(replaced["category"], "general");
    assert_eq!(replaced["quantity"].as_f64(), Some(0.0));
    assert_eq!(replaced["createdAt"], item["createdAt"]);
}

#[tokio::test]
async fn delete_returns_no_content() {
    let router = create_test_router(ItemsConfig::default()).await;
    let item = create(&router, json!({"name": "Widget"})).await;
    let uri = format!("/items/{}", item["id"].as_str().unwrap());

    let (status, body) = send(&router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_endpoint_filters_sorts_and_caps() {
    let router = create_test_router(ItemsConfig {
        default_page_size: 2,
        max_page_size: 3,
    })
    .await;
    for (name, category, price) in [
        ("a", "tools", 5),
        ("b", "tools", 15),
        ("c", "toys", 25),
        ("d", "tools", 35),
    ] {
        create(
            &router,
            json!({"name": name, "category": category, "price": price}),
        )
        .await;
    }

    let (status, page) = send(&router, "GET", "/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);

    let (_, page) = send(&router, "GET", "/items?limit=50", None).await;
    assert_eq!(page["count"], 3);

    let (_, page) = send(
        &router,
        "GET",
        "/items?category=tools&minPrice=10&sort=price",
        None,
    )
    .await;
    let names: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["b", "d"]);

    for bad in ["/items?limit=0", "/items?sort=name", "/items?minPrice=-1"] {
        let (status, problem) = send(&router, "GET", bad, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
        assert_eq!(problem["code"], "ITEMS_INVALID_QUERY");
    }
}

#[tokio::test]
async fn problem_echoes_request_id_header() {
    let router = create_test_router(ItemsConfig::default()).await;
    let request = Request::builder()
        .uri("/items/bad")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let problem: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(problem["request_id"], "trace-me");
}
