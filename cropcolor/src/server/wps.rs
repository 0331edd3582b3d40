//! The `/wps` endpoint: GetCapabilities, DescribeProcess and Execute.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use serde_json::{json, Map, Value};
use tracing::{error, info};

use super::exception::{ExceptionReport, OPERATION_NOT_SUPPORTED};
use super::AppState;
use crate::job::{ArtifactLocation, Output, OutputSet, ProcessError};
use crate::request::{parse_data_inputs, RawRequest, PROCESS_IDENTIFIER};

pub const SERVICE: &str = "WPS";
pub const SERVICE_VERSION: &str = "1.0.0";

/// `GET /wps?request=...`
pub async fn get(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(operation) = param(&params, "request") else {
        return ExceptionReport::missing_parameter("request").into_response();
    };

    match operation.to_ascii_lowercase().as_str() {
        "getcapabilities" => capabilities(&state).into_response(),
        "describeprocess" => describe(&state, param(&params, "identifier")),
        "execute" => {
            let Some(identifier) = param(&params, "identifier") else {
                return ExceptionReport::missing_parameter("identifier").into_response();
            };
            let data_inputs = param(&params, "DataInputs").unwrap_or_default();
            match parse_data_inputs(identifier, data_inputs) {
                Ok(request) => execute(state, request).await,
                Err(e) => ExceptionReport::from(&ProcessError::from(e)).into_response(),
            }
        }
        other => ExceptionReport::new(
            axum::http::StatusCode::BAD_REQUEST,
            OPERATION_NOT_SUPPORTED,
            Some("request"),
            format!("operation '{other}' is not supported"),
        )
        .into_response(),
    }
}

/// `POST /wps` with a JSON request body.
pub async fn post(State(state): State<AppState>, body: Bytes) -> Response {
    match serde_json::from_slice::<RawRequest>(&body) {
        Ok(request) => execute(state, request).await,
        Err(e) => ExceptionReport::invalid_parameter("body", format!("invalid request body: {e}"))
            .into_response(),
    }
}

/// WPS parameter names are case-insensitive.
fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

fn capabilities(state: &AppState) -> Json<Value> {
    let description = state.process.describe();
    Json(json!({
        "service": SERVICE,
        "version": SERVICE_VERSION,
        "title": "cropcolor",
        "processes": [{
            "identifier": description.identifier,
            "version": description.version,
            "title": description.title,
            "abstract": description.abstract_text,
        }],
    }))
}

fn describe(state: &AppState, identifier: Option<&str>) -> Response {
    let description = state.process.describe();
    match identifier {
        None => ExceptionReport::missing_parameter("identifier").into_response(),
        Some(id) if id == description.identifier => Json(description.clone()).into_response(),
        Some(id) => {
            ExceptionReport::invalid_parameter("identifier", format!("unknown process '{id}'"))
                .into_response()
        }
    }
}

async fn execute(state: AppState, request: RawRequest) -> Response {
    let process = state.process.clone();
    let run = match tokio::task::spawn_blocking(move || process.handle(&request)).await {
        Ok(run) => run,
        Err(e) => {
            error!(error = %e, "Execute task did not complete");
            return ExceptionReport::internal("execution was interrupted").into_response();
        }
    };

    match run.result {
        Ok(outputs) => {
            info!(phase = %run.trace.current(), outputs = outputs.len(), "Execute succeeded");
            Json(execute_response(&state, &outputs)).into_response()
        }
        Err(e) => ExceptionReport::from(&e).into_response(),
    }
}

/// Success document: literals as `{data}`, artifacts as `{mimeType, href}`.
pub fn execute_response(state: &AppState, outputs: &OutputSet) -> Value {
    let mut rendered = Map::new();
    for (name, output) in outputs.iter() {
        let value = match output {
            Output::Literal(data) => json!({ "data": data }),
            Output::Artifact(artifact) => match &artifact.location {
                ArtifactLocation::File(path) => json!({
                    "mimeType": artifact.media_type,
                    "href": output_href(&state.base_url, &state.outputs_dir, path),
                }),
                ArtifactLocation::Inline(bytes) => json!({
                    "mimeType": artifact.media_type,
                    "data": STANDARD.encode(bytes),
                    "encoding": "base64",
                }),
            },
        };
        rendered.insert(name.to_string(), value);
    }

    json!({
        "process": PROCESS_IDENTIFIER,
        "status": "succeeded",
        "outputs": rendered,
    })
}

/// Public URL of an artifact written below `outputs_dir`.
pub fn output_href(base_url: &str, outputs_dir: &Path, path: &Path) -> String {
    let relative = path
        .strip_prefix(outputs_dir)
        .ok()
        .or_else(|| path.file_name().map(Path::new))
        .unwrap_or(path);
    let relative = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/outputs/{}", base_url.trim_end_matches('/'), relative)
}
