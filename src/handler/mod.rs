//! Request handler module
//!
//! Responsible for request routing dispatch: the quote API, static files
//! from the public directory, and CORS preflight.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
