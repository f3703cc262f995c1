// API error taxonomy
// Every failure a request can end in, and the status code it maps to

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

use crate::http;

/// Request-level failure; the message is what the client sees
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// A required field or parameter is missing
    #[error("{0}")]
    Validation(&'static str),
    /// Unknown id, empty collection, or unknown route
    #[error("{0}")]
    NotFound(&'static str),
    /// The collection could not be written; details are in the error log
    #[error("{0}")]
    Storage(&'static str),
    #[error("Request body too large")]
    PayloadTooLarge,
    /// Anything unexpected, e.g. a handler panic
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Storage(_) | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        http::error_response(self.status(), &self.to_string())
    }
}
