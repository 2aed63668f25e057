//! Stateful route handlers.
//!
//! A handler is any async function taking the router's shared state and the
//! request:
//!
//! ```text
//! async fn get(store: Arc<ItemStore>, req: Request) -> Result<Response, ApiError>
//! ```
//!
//! The router clones its state into every call, so `S` is expected to be a
//! cheap handle such as an `Arc`. Handlers of different concrete types are
//! kept side by side as `Arc<dyn Handler<S>>`; each call boxes the returned
//! future once.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The future every stored handler resolves through.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

pub(crate) type BoxedHandler<S> = Arc<dyn Handler<S>>;

/// Implemented for every `Fn(S, Request) -> impl Future<Output = impl IntoResponse>`.
pub trait Handler<S>: Send + Sync + 'static {
    fn call(&self, state: S, req: Request) -> BoxFuture;
}

impl<S, F, Fut, R> Handler<S> for F
where
    F: Fn(S, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, state: S, req: Request) -> BoxFuture {
        let fut = (self)(state, req);
        Box::pin(async move { fut.await.into_response() })
    }
}
