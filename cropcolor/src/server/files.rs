//! Passthrough serving of artifacts and data files.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use super::exception::ExceptionReport;
use super::AppState;
use crate::artifact::{ArtifactBody, ArtifactNotFound, ArtifactResponder};

/// `GET /outputs/*path`
pub async fn outputs(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    serve(state.outputs, path).await
}

/// `GET /data/*path`
pub async fn data(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    serve(state.data, path).await
}

/// Reads the file on the blocking pool; artifacts can be large GeoTIFFs.
async fn serve(responder: ArtifactResponder, path: String) -> Response {
    match tokio::task::spawn_blocking(move || responder.respond(&path)).await {
        Ok(Ok(body)) => body_response(body),
        Ok(Err(ArtifactNotFound(path))) => {
            debug!(path = %path, "File not found");
            (StatusCode::NOT_FOUND, "not found").into_response()
        }
        Err(e) => {
            error!(error = %e, "File read task did not complete");
            ExceptionReport::internal("file read was interrupted").into_response()
        }
    }
}

fn body_response(body: ArtifactBody) -> Response {
    match body.media_type {
        Some(media_type) => ([(header::CONTENT_TYPE, media_type)], body.bytes).into_response(),
        None => {
            let mut response = body.bytes.into_response();
            response.headers_mut().remove(header::CONTENT_TYPE);
            response
        }
    }
}
