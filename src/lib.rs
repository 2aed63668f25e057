//! # items-api
//!
//! An in-memory JSON CRUD service over a single collection of items.
//!
//! ```text
//! GET    /api/items        list every item, in insertion order
//! GET    /api/items/{id}   one item, or 404 {"error":"Item not found"}
//! POST   /api/items        create from {"name": ...}, or 400 {"error":"name is required"}
//! DELETE /api/items/{id}   204, or 404 {"error":"Item not found"}
//! ```
//!
//! Items live for as long as the process does. Nothing is persisted.
//!
//! ## Layout
//!
//! The HTTP plumbing is a small hyper-based layer: radix-tree routing via
//! [`matchit`], typed [`Method`] and [`Status`], and handlers that are plain
//! async functions of `(state, Request)` returning anything that implements
//! [`IntoResponse`]. The item resource sits on top of it in [`items`]; its
//! router carries the shared `Arc<ItemStore>` as state.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use items_api::{ItemStore, Server, items};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), items_api::Error> {
//!     let app = items::router(Arc::new(ItemStore::new()));
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;

pub mod config;
pub mod items;

pub use config::Config;
pub use error::{ApiError, Error};
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{Item, ItemStore, name_to_string};
