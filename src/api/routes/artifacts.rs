//! Artifact handler: cache lookup, origin download, streaming response.

use super::CACHE_STATUS_HEADER;
use crate::api::AppState;
use crate::error::{Error, Result};
use crate::types::Artifact;
use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// GET /:prefix/*artifact_url - Serve an artifact, downloading it on a miss
///
/// `artifact_url` arrives percent-decoded, so `intel.com%2Fmkl.zip` and
/// `intel.com/mkl.zip` name the same artifact.
pub async fn get_artifact(
    State(state): State<AppState>,
    Path((prefix, artifact_url)): Path<(String, String)>,
    request: Request,
) -> Response {
    if !state.config.is_known_prefix(&prefix) {
        return Error::UnknownPrefix(prefix).into_response();
    }

    // Aborts the download if the client goes away
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let artifact = match state.service.get(&prefix, &artifact_url, &cancel).await {
        Ok(artifact) => artifact,
        Err(e) => {
            if e.is_remote() {
                tracing::warn!(prefix = %prefix, url = %artifact_url, error = %e, "origin download failed");
            } else {
                tracing::error!(prefix = %prefix, url = %artifact_url, error = %e, "artifact request failed");
            }
            return e.into_response();
        }
    };

    match serve_content(&artifact, request).await {
        Ok(response) => with_artifact_headers(response, &artifact),
        Err(e) => {
            tracing::error!(name = %artifact.name, error = %e, "failed to open artifact content");
            e.into_response()
        }
    }
}

/// Stream the artifact bytes
///
/// File-backed content goes through [`ServeFile`], which answers range and
/// conditional requests. Other content is sent whole.
async fn serve_content(artifact: &Artifact, request: Request) -> Result<Response> {
    if let Some(path) = artifact.content.local_path() {
        let response = ServeFile::new(path)
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});
        return Ok(response.map(Body::new));
    }

    let metadata = artifact.content.metadata();
    let reader = artifact.content.open().await?;
    let last_modified = DateTime::<Utc>::from(metadata.modified)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();

    let mut response = Body::from_stream(ReaderStream::new(reader)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len));
    if let Ok(value) = HeaderValue::from_str(&last_modified) {
        headers.insert(header::LAST_MODIFIED, value);
    }

    Ok(response)
}

fn with_artifact_headers(mut response: Response, artifact: &Artifact) -> Response {
    // Errors from ServeFile (e.g. 416) are passed through untouched
    if !response.status().is_success() && response.status() != StatusCode::NOT_MODIFIED {
        return response;
    }

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        artifact.name.replace('"', "")
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    let cache_status = if artifact.retrieved_from_cache {
        "hit"
    } else {
        "miss"
    };

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(
        HeaderName::from_static(CACHE_STATUS_HEADER),
        HeaderValue::from_static(cache_status),
    );
    response
}
