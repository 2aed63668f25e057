//! The `/api/items` resource.
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | GET | `/api/items` | 200, array of items | |
//! | GET | `/api/items/{id}` | 200, item | 404 |
//! | POST | `/api/items` | 201, item | 400, 413 |
//! | DELETE | `/api/items/{id}` | 204, empty | 404 |

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::ItemStore;

/// Builds the router serving the item routes out of `store`.
pub fn router(store: Arc<ItemStore>) -> Router<Arc<ItemStore>> {
    Router::new(store)
        .on(Method::Get,    "/api/items",      list)
        .on(Method::Get,    "/api/items/{id}", get)
        .on(Method::Post,   "/api/items",      create)
        .on(Method::Delete, "/api/items/{id}", delete)
}

/// Body of a create request.
#[derive(Debug, Default, Deserialize)]
struct CreateItem {
    #[serde(default)]
    name: Option<Value>,
}

async fn list(store: Arc<ItemStore>, _req: Request) -> Response {
    Json(store.list()).into_response()
}

async fn get(store: Arc<ItemStore>, req: Request) -> Result<Response, ApiError> {
    let item = store.get(id(&req))?;
    Ok(Json(item).into_response())
}

async fn create(store: Arc<ItemStore>, req: Request) -> Result<Response, ApiError> {
    let input = match req.json::<Value>()? {
        Some(body @ Value::Object(_)) => serde_json::from_value::<CreateItem>(body)?,
        Some(Value::Array(_)) | None => CreateItem::default(),
        Some(_) => return Err(ApiError::MalformedBody),
    };

    let item = store.create(input.name)?;
    Ok((Status::Created, Json(item)).into_response())
}

async fn delete(store: Arc<ItemStore>, req: Request) -> Result<Status, ApiError> {
    store.delete(id(&req))?;
    Ok(Status::NoContent)
}

fn id(req: &Request) -> &str {
    req.param("id").unwrap_or_default()
}
