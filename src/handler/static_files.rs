//! Static file serving module
//!
//! Serves files from the configured public directory for GET/HEAD requests
//! that the API does not own. Directories resolve to their `index.html`.

use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

const INDEX_FILE: &str = "index.html";

/// Serve `path` from `static_dir`, or `None` when no such file exists
pub async fn serve_static(
    static_dir: &str,
    path: &str,
    is_head: bool,
    if_none_match: Option<&str>,
) -> Option<Response<Full<Bytes>>> {
    let file_path = resolve_path(Path::new(static_dir), path).await?;

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let etag = cache::generate_etag(&content);
    if cache::check_etag_match(if_none_match, &etag) {
        return Some(http::build_304_response(&etag));
    }

    Some(http::build_static_response(
        Bytes::from(content),
        mime::content_type_for(&file_path),
        &etag,
        is_head,
    ))
}

/// Map a request path onto a file inside `static_dir`
///
/// Rejects any path that is not made of plain components (`..`, absolute
/// prefixes). Missing files are common and not logged.
async fn resolve_path(static_dir: &Path, path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(path).ok()?;
    let relative = Path::new(decoded.trim_start_matches('/'));

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return None;
    }

    let mut file_path = static_dir.join(relative);
    let is_dir = fs::metadata(&file_path).await.ok()?.is_dir();
    if is_dir {
        file_path = file_path.join(INDEX_FILE);
        if !fs::metadata(&file_path).await.ok()?.is_file() {
            return None;
        }
    }

    Some(file_path)
}
