//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body collection, request
//! logging, CORS preflight, static files, API dispatch, and the fallbacks
//! for unknown routes and panicking handlers.

use crate::api::{self, ApiError, ApiRequest};
use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, QueryParams};
use crate::logger::{self, RequestLogEntry};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderMap};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let response = match collect_body(&parts.headers, body, state.config.http.max_body_size).await {
        Ok(bytes) => respond(&parts, bytes, &state, peer_addr).await,
        Err(err) => {
            log_incoming(&parts, None, &state, peer_addr);
            finish(&parts, err.into_response(), &state)
        }
    };

    Ok(response)
}

/// Handle a request whose body has already been collected
pub async fn respond(
    parts: &Parts,
    body: Bytes,
    state: &Arc<AppState>,
    peer_addr: SocketAddr,
) -> Response<Full<Bytes>> {
    log_incoming(parts, Some(&body), state, peer_addr);
    let response = route_request(parts, body, state).await;
    finish(parts, response, state)
}

/// Read the request body, enforcing the configured size limit
async fn collect_body<B>(headers: &HeaderMap, body: B, max_body_size: u64) -> Result<Bytes, ApiError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if let Some(size) = content_length(headers) {
        if size > max_body_size {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            return Err(ApiError::PayloadTooLarge);
        }
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!(
                "Request body exceeded {max_body_size} bytes while streaming"
            ));
            Err(ApiError::PayloadTooLarge)
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(ApiError::Validation("Failed to read request body"))
        }
    }
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(header::CONTENT_LENGTH)?;
    match value.to_str().ok().and_then(|v| v.trim().parse().ok()) {
        Some(size) => Some(size),
        None => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: {value:?}, skipping size check"
            ));
            None
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Request logging middleware
///
/// One entry per request; write methods also record the body.
fn log_incoming(parts: &Parts, body: Option<&Bytes>, state: &AppState, peer_addr: SocketAddr) {
    let logging = &state.config.logging;
    if !logging.access_log {
        return;
    }

    let uri = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);

    let is_write = [Method::POST, Method::PUT, Method::PATCH].contains(&parts.method);
    let body = if is_write {
        Some(match body {
            Some(b) if !b.is_empty() => String::from_utf8_lossy(b).into_owned(),
            Some(_) => "(empty)".to_string(),
            None => "(not read)".to_string(),
        })
    } else {
        None
    };

    let entry = RequestLogEntry::new(peer_addr.ip().to_string(), parts.method.to_string(), uri)
        .with_body(body);
    logger::log_request(&entry, logging.format);
}

/// Route request based on method and path
async fn route_request(parts: &Parts, body: Bytes, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let path = parts.uri.path();
    let http_config = &state.config.http;

    // 1. CORS preflight / OPTIONS
    if parts.method == Method::OPTIONS {
        return http::build_options_response(
            http_config.enable_cors,
            header_str(&parts.headers, &header::ACCESS_CONTROL_REQUEST_HEADERS),
        );
    }

    // 2. Static files for reads outside the API
    let is_head = parts.method == Method::HEAD;
    if (parts.method == Method::GET || is_head) && !path.starts_with(api::BASE_PATH) {
        let if_none_match = header_str(&parts.headers, &header::IF_NONE_MATCH);
        if let Some(resp) =
            static_files::serve_static(&http_config.static_dir, path, is_head, if_none_match).await
        {
            return resp;
        }
    }

    // 3. API route table
    let Some(route) = api::match_route(&parts.method, path) else {
        return ApiError::NotFound("Route not found").into_response();
    };

    let request = ApiRequest {
        query: QueryParams::parse(parts.uri.query().unwrap_or("")),
        content_type: header_str(&parts.headers, &header::CONTENT_TYPE).map(ToString::to_string),
        body,
    };
    run_guarded(route, request, Arc::clone(state)).await
}

/// Run an API handler on the blocking pool; a panic becomes a generic 500
async fn run_guarded(
    route: api::Route,
    request: ApiRequest,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let task = tokio::task::spawn_blocking(move || api::dispatch(route, &request, &*state.store));

    match task.await {
        Ok(response) => response,
        Err(e) if e.is_panic() => {
            let payload = e.into_panic();
            let message = payload
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            logger::log_error(&format!("Request handler panicked: {message}"));
            ApiError::Internal.into_response()
        }
        Err(e) => {
            logger::log_error(&format!("Request handler did not complete: {e}"));
            ApiError::Internal.into_response()
        }
    }
}

/// Headers common to every response; HEAD responses lose their body
fn finish(parts: &Parts, mut response: Response<Full<Bytes>>, state: &AppState) -> Response<Full<Bytes>> {
    let http_config = &state.config.http;
    http::apply_common_headers(&mut response, &http_config.server_name, http_config.enable_cors);
    if parts.method == Method::HEAD {
        http::strip_body(response)
    } else {
        response
    }
}
