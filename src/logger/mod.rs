//! Logger module
//!
//! Provides logging utilities for the quotes server:
//! - Server lifecycle logging
//! - Request logging (the per-request middleware output)
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::RequestLogEntry;

use crate::config::{Config, LogFormat};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, storage: &str) {
    write_info("======================================");
    write_info("Quotes server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Storage: {storage}"));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Endpoints:");
    for (method, path) in crate::api::ENDPOINTS.iter().map(|e| (e.method, e.path)) {
        write_info(&format!("  - {method:<6} {path}"));
    }
    write_info("======================================\n");
}

/// Log an incoming request
pub fn log_request(entry: &RequestLogEntry, format: LogFormat) {
    write_info(&entry.format(format));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_shutdown_requested(signal: &str) {
    write_info(&format!("\n[Shutdown] {signal} received, no longer accepting connections"));
}

pub fn log_shutdown_complete(remaining: usize) {
    if remaining > 0 {
        log_warning(&format!(
            "[Shutdown] Exiting with {remaining} connection(s) still open"
        ));
    }
    write_info("[Shutdown] Server stopped");
}
