use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use poketrack::{init_schema, Catalog, ServerConfig};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

fn test_app_with_db() -> (Router, Arc<Mutex<Connection>>) {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let db = Arc::new(Mutex::new(conn));
    let app = poketrack::web::create_router(
        Arc::clone(&db),
        Arc::new(Catalog::builtin()),
        &ServerConfig::default(),
    );
    (app, db)
}

fn test_app() -> Router {
    test_app_with_db().0
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_root_reports_running() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "PokeTrack API is running");
}

#[tokio::test]
async fn test_search_finds_card_case_insensitively() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/cards/search?q=PIKA", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "PIKA");
    assert_eq!(
        body["results"],
        json!([{"name": "Pikachu", "set": "Base Set", "rarity": "Common"}])
    );
}

#[tokio::test]
async fn test_search_empty_query_returns_no_results() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/cards/search?q=", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));
}

#[tokio::test]
async fn test_search_requires_query_parameter() {
    let app = test_app();
    let (status, _) = send(&app, Method::GET, "/cards/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_price_history_defaults_to_fourteen_days() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/cards/Pikachu/price-history", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["card_name"], "Pikachu");
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["points"].as_array().unwrap().len(), 14);
    assert_eq!(body["latest_price"], json!(33.09));
    assert_eq!(body["percent_change_7d"], json!(1.72));
}

#[tokio::test]
async fn test_price_history_custom_days() {
    let app = test_app();
    let (status, body) =
        send(&app, Method::GET, "/cards/Gengar/price-history?days=5", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"].as_array().unwrap().len(), 5);
    assert_eq!(body["percent_change_7d"], json!(0.0));
}

#[tokio::test]
async fn test_price_history_decodes_path() {
    let app = test_app();
    let (status, body) =
        send(&app, Method::GET, "/cards/Mr.%20Mime/price-history?days=3", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["card_name"], "Mr. Mime");
}

#[tokio::test]
async fn test_price_history_rejects_excessive_days() {
    let app = test_app();
    let (status, _) =
        send(&app, Method::GET, "/cards/Pikachu/price-history?days=100000", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/cards/Pikachu/price-history?days=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_watchlist_add_list_remove() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/watchlist", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(
        &app,
        Method::POST,
        "/watchlist",
        Some(json!({"card_name": "Pikachu"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"ok": true}));

    let (status, _) = send(
        &app,
        Method::POST,
        "/watchlist",
        Some(json!({"card_name": "pikachu "})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, "/watchlist", None).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["card_name"], "pikachu");
    assert!(entries[0]["created_at"].is_string());

    let (status, body) = send(&app, Method::DELETE, "/watchlist/PIKACHU", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    let (_, body) = send(&app, Method::GET, "/watchlist", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_watchlist_lists_most_recent_first() {
    let app = test_app();

    for name in ["a", "b"] {
        send(
            &app,
            Method::POST,
            "/watchlist",
            Some(json!({ "card_name": name })),
        )
        .await;
    }

    let (_, body) = send(&app, Method::GET, "/watchlist", None).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["card_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[tokio::test]
async fn test_watchlist_blank_name_is_noop() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/watchlist",
        Some(json!({"card_name": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, "/watchlist", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_watchlist_remove_missing_is_ok() {
    let app = test_app();
    let (status, body) = send(&app, Method::DELETE, "/watchlist/nonexistent", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_watchlist_add_requires_card_name() {
    let app = test_app();
    let (status, _) = send(&app, Method::POST, "/watchlist", Some(json!({}))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_watchlist_storage_failure_returns_500() {
    let (app, db) = test_app_with_db();
    db.lock()
        .unwrap()
        .execute_batch("DROP TABLE watchlist")
        .unwrap();

    let (status, _) = send(&app, Method::GET, "/watchlist", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(
        &app,
        Method::POST,
        "/watchlist",
        Some(json!({"card_name": "Pikachu"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::DELETE, "/watchlist/pikachu", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_cors_allows_dev_origin() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/watchlist")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
