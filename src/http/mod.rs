//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! quote API: response builders, query/form decoding, static file metadata.

pub mod cache;
pub mod mime;
pub mod query;
pub mod response;

// Re-export commonly used types
pub use query::QueryParams;
pub use response::{
    apply_common_headers, build_304_response, build_options_response, build_static_response,
    error_response, json_response, strip_body,
};
