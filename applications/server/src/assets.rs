//! Static asset serving
//!
//! Every path that is not an API route resolves to a file under the asset
//! root. Unknown paths get `index.html` so client-side routes still load the
//! UI.

use crate::error::{Result, ServerError};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

const INDEX: &str = "index.html";
const HTML: &str = "text/html; charset=utf-8";
const FALLBACK_TYPE: &str = "application/octet-stream";

/// Map a request path onto a file below `root`
///
/// The path is percent-decoded and normalized before it is joined, so `..`
/// segments can never climb above `root`.
pub fn safe_path(root: &Path, request_path: &str) -> Result<PathBuf> {
    let path = request_path.split('?').next().unwrap_or_default();
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map_err(|e| ServerError::InvalidPath(e.to_string()))?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(segments);
    Ok(resolved)
}

/// Content type for a served file
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("html") => HTML,
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        _ => mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(FALLBACK_TYPE),
    }
}

/// Fallback handler serving files from the asset root
pub async fn serve_asset(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let request_path = match uri.path() {
        "/" => "/index.html",
        path => path,
    };
    let file_path = safe_path(state.root(), request_path)?;

    match tokio::fs::read(&file_path).await {
        Ok(contents) => return Ok(file_response(content_type(&file_path), contents)),
        Err(e) => tracing::debug!(
            "{} not served ({}), falling back to {}",
            file_path.display(),
            e,
            INDEX
        ),
    }

    let index = tokio::fs::read(state.root().join(INDEX)).await?;
    Ok(file_response(HTML, index))
}

fn file_response(content_type: &'static str, contents: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        contents,
    )
        .into_response()
}
