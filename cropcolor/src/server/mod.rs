//! HTTP surface.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | greeting |
//! | `GET /test` | liveness check |
//! | `GET /wps` | GetCapabilities, DescribeProcess, Execute (KVP) |
//! | `POST /wps` | Execute (JSON body) |
//! | `GET /outputs/*path` | produced artifacts |
//! | `GET /data/*path` | source data |
//!
//! # Example
//!
//! ```ignore
//! let state = AppState::new(process, "outputs", "data", "http://127.0.0.1:5000");
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, router(state)).await?;
//! ```

mod exception;
mod files;
mod wps;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::artifact::ArtifactResponder;
use crate::job::CropColorProcess;

pub use exception::{Exception, ExceptionReport, OPERATION_NOT_SUPPORTED};
pub use wps::{execute_response, output_href, SERVICE, SERVICE_VERSION};

pub const ROOT_GREETING: &str = "hello to the WPS server root";
pub const TEST_GREETING: &str = "hello test!";

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub process: Arc<CropColorProcess>,
    pub outputs: ArtifactResponder,
    pub data: ArtifactResponder,
    pub outputs_dir: PathBuf,
    /// Prefix for artifact hrefs, without a trailing slash.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        process: Arc<CropColorProcess>,
        outputs_dir: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Self {
        let outputs_dir = outputs_dir.into();
        let base_url: String = base_url.into();
        Self {
            process,
            outputs: ArtifactResponder::new(outputs_dir.clone()),
            data: ArtifactResponder::new(data_dir),
            outputs_dir,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_greeting))
        .route("/test", get(test_greeting))
        .route("/wps", get(wps::get).post(wps::post))
        .route("/outputs/*path", get(files::outputs))
        .route("/data/*path", get(files::data))
        .with_state(state)
}

async fn root_greeting() -> &'static str {
    ROOT_GREETING
}

async fn test_greeting() -> &'static str {
    TEST_GREETING
}
