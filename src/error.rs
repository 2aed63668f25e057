//! Error types.
//!
//! Two layers, kept apart on purpose:
//!
//! - [`Error`] surfaces infrastructure failures: parsing the listen address,
//!   binding the port, accepting a connection. It never reaches a client.
//! - [`ApiError`] is what a handler returns when a request cannot be served.
//!   It renders itself as a JSON `{"error": "..."}` body with the matching
//!   status code and is reported only to the caller of that request.

use serde::Serialize;
use tracing::error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// The error type returned by the server's fallible operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid socket address `{addr}`: {source}")]
    Addr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// A request-level failure, rendered to the client as JSON.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No item carries the requested id.
    #[error("Item not found")]
    NotFound,

    /// A create request without a `name`, or with `name: null`.
    #[error("name is required")]
    NameRequired,

    /// A JSON body that does not parse, or whose top level is a primitive.
    #[error("invalid JSON body")]
    MalformedBody,

    /// A request body over the read limit.
    #[error("request body too large")]
    BodyTooLarge,

    /// A path parameter whose percent-encoding is invalid or not UTF-8.
    #[error("invalid path parameter")]
    MalformedParam,
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            Self::NotFound     => Status::NotFound,
            Self::BodyTooLarge => Status::PayloadTooLarge,
            Self::NameRequired
            | Self::MalformedBody
            | Self::MalformedParam => Status::BadRequest,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(_: serde_json::Error) -> Self {
        Self::MalformedBody
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match serde_json::to_vec(&ErrorBody { error: &message }) {
            Ok(body) => Response::builder().status(self.status()).json(body),
            Err(e) => {
                error!("failed to encode error body: {e}");
                Response::status(Status::InternalServerError)
            }
        }
    }
}
