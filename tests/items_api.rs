use std::sync::Arc;

use bytes::Bytes;
use chrono::DateTime;
use items_api::{ItemStore, Response, Router, items};
use serde_json::{Value, json};

type App = Router<Arc<ItemStore>>;

fn app() -> App {
    items::router(Arc::new(ItemStore::new()))
}

fn request(method: &str, path: &str, body: Option<&str>) -> http::Request<Bytes> {
    let builder = http::Request::builder().method(method).uri(path);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Bytes::copy_from_slice(body.as_bytes())),
        None => builder.body(Bytes::new()),
    };
    req.unwrap()
}

async fn send(app: &App, method: &str, path: &str, body: Option<&str>) -> Response {
    app.handle(request(method, path, body)).await
}

fn json_body(res: &Response) -> Value {
    assert_eq!(res.header("content-type"), Some("application/json"));
    serde_json::from_slice(res.body()).unwrap()
}

async fn list_len(app: &App) -> usize {
    let res = send(app, "GET", "/api/items", None).await;
    json_body(&res).as_array().unwrap().len()
}

#[tokio::test]
async fn lists_seed_items_in_order() {
    let app = app();
    let res = send(&app, "GET", "/api/items", None).await;
    assert_eq!(res.status_code(), 200);

    let body = json_body(&res);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "1");
    assert_eq!(items[0]["name"], "First item");
    assert_eq!(items[1]["id"], "2");
    assert_eq!(items[1]["name"], "Second item");
    for item in items {
        assert!(DateTime::parse_from_rfc3339(item["createdAt"].as_str().unwrap()).is_ok());
    }
}

#[tokio::test]
async fn create_assigns_fresh_increasing_ids() {
    let app = app();
    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let res = send(&app, "POST", "/api/items", Some(&json!({ "name": name }).to_string())).await;
        assert_eq!(res.status_code(), 201);
        let item = json_body(&res);
        assert_eq!(item["name"], name);
        assert!(DateTime::parse_from_rfc3339(item["createdAt"].as_str().unwrap()).is_ok());
        ids.push(item["id"].as_str().unwrap().parse::<u64>().unwrap());
    }
    assert_eq!(ids, [3, 4, 5]);
    assert_eq!(list_len(&app).await, 5);
}

#[tokio::test]
async fn create_stringifies_non_string_names() {
    let app = app();
    let res = send(&app, "POST", "/api/items", Some(r#"{"name":42}"#)).await;
    assert_eq!(json_body(&res)["name"], "42");

    let res = send(&app, "POST", "/api/items", Some(r#"{"name":false}"#)).await;
    assert_eq!(json_body(&res)["name"], "false");

    let res = send(&app, "POST", "/api/items", Some(r#"{"name":""}"#)).await;
    assert_eq!(res.status_code(), 201);
    assert_eq!(json_body(&res)["name"], "");
}

#[tokio::test]
async fn create_without_name_is_rejected() {
    let app = app();
    for body in ["{}", r#"{"name":null}"#, r#"{"other":"x"}"#, "[]"] {
        let res = send(&app, "POST", "/api/items", Some(body)).await;
        assert_eq!(res.status_code(), 400, "body {body}");
        assert_eq!(json_body(&res), json!({"error": "name is required"}));
    }

    let res = send(&app, "POST", "/api/items", None).await;
    assert_eq!(res.status_code(), 400);
    assert_eq!(json_body(&res), json!({"error": "name is required"}));

    assert_eq!(list_len(&app).await, 2);
}

#[tokio::test]
async fn create_ignores_non_json_content_type() {
    let app = app();
    let req = http::Request::post("/api/items")
        .header("content-type", "text/plain")
        .body(Bytes::from_static(br#"{"name":"x"}"#))
        .unwrap();
    let res = app.handle(req).await;
    assert_eq!(res.status_code(), 400);
    assert_eq!(json_body(&res), json!({"error": "name is required"}));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app();
    for body in ["{name:", r#""just a string""#, "7"] {
        let res = send(&app, "POST", "/api/items", Some(body)).await;
        assert_eq!(res.status_code(), 400, "body {body}");
        assert_eq!(json_body(&res), json!({"error": "invalid JSON body"}));
    }
    assert_eq!(list_len(&app).await, 2);
}

#[tokio::test]
async fn get_is_repeatable_and_misses_are_not_found() {
    let app = app();
    let created = json_body(&send(&app, "POST", "/api/items", Some(r#"{"name":"x"}"#)).await);
    let path = format!("/api/items/{}", created["id"].as_str().unwrap());

    let first = send(&app, "GET", &path, None).await;
    let second = send(&app, "GET", &path, None).await;
    assert_eq!(first.status_code(), 200);
    assert_eq!(json_body(&first), created);
    assert_eq!(first.body(), second.body());

    let res = send(&app, "GET", "/api/items/9999", None).await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(json_body(&res), json!({"error": "Item not found"}));
}

#[tokio::test]
async fn delete_removes_exactly_one_item() {
    let app = app();
    let res = send(&app, "DELETE", "/api/items/1", None).await;
    assert_eq!(res.status_code(), 204);
    assert!(res.body().is_empty());
    assert_eq!(res.header("content-type"), None);

    assert_eq!(send(&app, "GET", "/api/items/1", None).await.status_code(), 404);
    let remaining = json_body(&send(&app, "GET", "/api/items", None).await);
    assert_eq!(remaining, json!([send_get_item(&app, "2").await]));
}

async fn send_get_item(app: &App, id: &str) -> Value {
    json_body(&send(app, "GET", &format!("/api/items/{id}"), None).await)
}

#[tokio::test]
async fn delete_of_missing_item_changes_nothing() {
    let app = app();
    let before = send(&app, "GET", "/api/items", None).await;

    let res = send(&app, "DELETE", "/api/items/9999", None).await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(json_body(&res), json!({"error": "Item not found"}));

    let after = send(&app, "GET", "/api/items", None).await;
    assert_eq!(before.body(), after.body());
}

#[tokio::test]
async fn unrouted_requests() {
    let app = app();
    assert_eq!(send(&app, "GET", "/api/other", None).await.status_code(), 404);
    assert_eq!(send(&app, "PUT", "/api/items/1", None).await.status_code(), 404);
    assert_eq!(send(&app, "TRACE", "/api/items", None).await.status_code(), 404);
}

#[tokio::test]
async fn lenient_paths_reach_the_item_routes() {
    let app = app();
    for path in ["/api/items/", "/API/ITEMS", "/Api/Items/"] {
        let res = send(&app, "GET", path, None).await;
        assert_eq!(res.status_code(), 200, "{path}");
        assert_eq!(json_body(&res).as_array().unwrap().len(), 2);
    }

    for path in ["/api/items/1/", "/API/items/1", "/api/items/%31"] {
        let res = send(&app, "GET", path, None).await;
        assert_eq!(res.status_code(), 200, "{path}");
        assert_eq!(json_body(&res)["id"], "1");
    }

    let res = send(&app, "POST", "/api/items/", Some(r#"{"name":"slash"}"#)).await;
    assert_eq!(res.status_code(), 201);

    assert_eq!(send(&app, "DELETE", "/api/items/%32/", None).await.status_code(), 204);
    assert_eq!(send(&app, "GET", "/api/items/2", None).await.status_code(), 404);
}

#[tokio::test]
async fn badly_encoded_id_is_a_bad_request() {
    let res = send(&app(), "GET", "/api/items/%E0", None).await;
    assert_eq!(res.status_code(), 400);
    assert_eq!(json_body(&res), json!({"error": "invalid path parameter"}));
}

#[tokio::test]
async fn head_answers_like_get_without_a_body() {
    let app = app();
    let res = send(&app, "HEAD", "/api/items", None).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("content-type"), Some("application/json"));
    assert!(res.body().is_empty());

    assert_eq!(send(&app, "HEAD", "/api/items/1", None).await.status_code(), 200);
    assert_eq!(send(&app, "HEAD", "/api/items/9999", None).await.status_code(), 404);
}

#[tokio::test]
async fn options_reports_allowed_methods() {
    let app = app();
    let res = send(&app, "OPTIONS", "/api/items", None).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("allow"), Some("GET,HEAD,POST"));

    let res = send(&app, "OPTIONS", "/api/items/7", None).await;
    assert_eq!(res.header("allow"), Some("GET,HEAD,DELETE"));

    assert_eq!(send(&app, "OPTIONS", "/api/other", None).await.status_code(), 404);
}

#[tokio::test]
async fn stores_are_isolated() {
    let first = app();
    send(&first, "DELETE", "/api/items/1", None).await;
    assert_eq!(list_len(&first).await, 1);
    assert_eq!(list_len(&app()).await, 2);
}

#[tokio::test]
async fn concurrent_creates_get_unique_ids() {
    let store = Arc::new(ItemStore::new());
    let app = Arc::new(items::router(Arc::clone(&store)));

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let app = Arc::clone(&app);
            tokio::spawn(async move {
                let body = json!({ "name": i }).to_string();
                let res = send(&app, "POST", "/api/items", Some(&body)).await;
                json_body(&res)["id"].as_str().unwrap().to_owned()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().parse::<u64>().unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (3..35).collect::<Vec<u64>>());
    assert_eq!(store.list().len(), 34);
}

#[tokio::test]
async fn end_to_end_scenario() {
    let app = app();
    assert_eq!(list_len(&app).await, 2);

    let res = send(&app, "POST", "/api/items", Some(r#"{"name":"Third"}"#)).await;
    assert_eq!(res.status_code(), 201);
    let created = json_body(&res);
    assert_eq!(created["id"], "3");
    assert_eq!(created["name"], "Third");

    let res = send(&app, "GET", "/api/items/3", None).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(json_body(&res), created);

    assert_eq!(send(&app, "DELETE", "/api/items/3", None).await.status_code(), 204);
    assert_eq!(send(&app, "GET", "/api/items/3", None).await.status_code(), 404);
    assert_eq!(list_len(&app).await, 2);
}
