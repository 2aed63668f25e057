//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Matching is lenient in
//! the ways browsers and curl users expect:
//!
//! - literal path segments match case-insensitively (`/API/Items`)
//! - one trailing slash is ignored (`/api/items/`)
//! - path parameters are percent-decoded before a handler sees them
//! - `HEAD` falls back to the `GET` route and drops the body
//! - `OPTIONS` without its own route answers `200` with an `Allow` header

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use matchit::Router as MatchitRouter;

use crate::error::ApiError;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// Order in which methods are listed in an `Allow` header.
const ALLOW_ORDER: [Method; 6] = [
    Method::Get,
    Method::Head,
    Method::Post,
    Method::Put,
    Method::Patch,
    Method::Delete,
];

/// The application router, holding the state every handler is called with.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] call returns `self` so registrations chain.
pub struct Router<S> {
    state: S,
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
}

impl<S: Clone + Send + Sync + 'static> Router<S> {
    pub fn new(state: S) -> Self {
        Self { state, routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax and match one segment;
    /// `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        let handler: BoxedHandler<S> = Arc::new(handler);
        self.routes
            .entry(method)
            .or_default()
            .insert(fold_route(path), handler)
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    /// Finds the handler for `method` + `path`, with parameters still encoded.
    fn lookup<'p>(
        &self,
        method: Method,
        path: &'p str,
    ) -> Option<(BoxedHandler<S>, Vec<(String, &'p str)>)> {
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };
        // ASCII lowercasing keeps byte offsets, so each parameter can be
        // cut back out of the original path with its case intact.
        let folded = path.to_ascii_lowercase();
        let matched = self.routes.get(&method)?.at(&folded).ok()?;

        let params = matched.params.iter()
            .map(|(key, value)| {
                let start = value.as_ptr() as usize - folded.as_ptr() as usize;
                (key.to_owned(), &path[start..start + value.len()])
            })
            .collect();
        Some((Arc::clone(matched.value), params))
    }

    fn allowed(&self, path: &str) -> Vec<Method> {
        let routed = |method| self.lookup(method, path).is_some();
        ALLOW_ORDER.into_iter()
            .filter(|&method| routed(method) || (method == Method::Head && routed(Method::Get)))
            .collect()
    }

    /// Routes one fully-read request and produces its response.
    ///
    /// Unknown methods and unmatched paths get `404` with no body.
    pub async fn handle(&self, req: http::Request<Bytes>) -> Response {
        let Ok(method) = Method::try_from(req.method()) else {
            return Response::status(Status::NotFound);
        };
        let (parts, body) = req.into_parts();
        let path = parts.uri.path();

        let found = self.lookup(method, path).or_else(|| match method {
            Method::Head => self.lookup(Method::Get, path),
            _ => None,
        });
        let Some((handler, raw_params)) = found else {
            return self.unrouted(method, path);
        };

        let params = match decode_params(raw_params) {
            Ok(params) => params,
            Err(e) => return e.into_response(),
        };

        let mut res = handler
            .call(self.state.clone(), Request::new(parts.headers, body, params))
            .await;
        if method == Method::Head {
            res.body.clear();
        }
        res
    }

    fn unrouted(&self, method: Method, path: &str) -> Response {
        let allowed = self.allowed(path);
        if method != Method::Options || allowed.is_empty() {
            return Response::status(Status::NotFound);
        }
        let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(",");
        Response::builder().header("allow", &allow).no_body()
    }
}

/// Lowercases the literal segments of a route, leaving `{param}` names alone.
fn fold_route(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with('{') {
                segment.to_owned()
            } else {
                segment.to_ascii_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn decode_params(raw: Vec<(String, &str)>) -> Result<HashMap<String, String>, ApiError> {
    raw.into_iter()
        .map(|(key, value)| Ok((key, percent_decode(value)?)))
        .collect()
}

/// Decodes `%XX` escapes. A `%` not followed by two hex digits, or bytes that
/// are not UTF-8 once decoded, are rejected.
fn percent_decode(s: &str) -> Result<String, ApiError> {
    if !s.contains('%') {
        return Ok(s.to_owned());
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3).ok_or(ApiError::MalformedParam)?;
            let hex = std::str::from_utf8(hex).map_err(|_| ApiError::MalformedParam)?;
            let byte = u8::from_str_radix(hex, 16).map_err(|_| ApiError::MalformedParam)?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| ApiError::MalformedParam)
}
