//! Application bootstrap implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::AppConfig;
use super::error::AppError;
use crate::artifact::TempFileAllocator;
use crate::job::{CropColorProcess, JobOrchestrator};
use crate::raster::{GdalEngine, GdalTools};
use crate::server::{router, AppState};

/// Wires the raster engine, allocator and process together.
///
/// Used by both the HTTP service and one-off local runs.
pub fn build_process(config: &AppConfig) -> CropColorProcess {
    let engine =
        Arc::new(GdalEngine::new(config.gdal_bin_dir.clone()).with_data_dir(&config.data_dir));
    let allocator = Arc::new(TempFileAllocator::new(&config.outputs_dir));
    let orchestrator = JobOrchestrator::new(engine.clone(), engine, allocator);
    CropColorProcess::new(orchestrator)
}

/// Checks that the GDAL utilities can be launched, warning when they cannot.
///
/// Jobs that need the engine fail until the tools are reachable; requests
/// without outputs still succeed.
pub fn check_gdal(config: &AppConfig) -> bool {
    let available = GdalTools::new(config.gdal_bin_dir.clone()).is_available();
    if !available {
        warn!(
            bin_dir = ?config.gdal_bin_dir,
            "GDAL utilities not found; set [gdal] bin_dir or --gdal-bin-dir"
        );
    }
    available
}

/// The running HTTP service.
///
/// # Example
///
/// ```ignore
/// use cropcolor::app::{AppConfig, CropColorApp};
///
/// let app = CropColorApp::start(config).await?;
/// app.serve(async { tokio::signal::ctrl_c().await.ok(); }).await?;
/// ```
pub struct CropColorApp {
    config: AppConfig,
    state: AppState,
    listener: TcpListener,
}

impl CropColorApp {
    /// Creates the storage directories, builds the process and binds the
    /// listener.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        ensure_dir(&config.outputs_dir)?;
        ensure_dir(&config.data_dir)?;

        let listener = TcpListener::bind(config.bind)
            .await
            .map_err(|source| AppError::Bind {
                addr: config.bind,
                source,
            })?;
        let local_addr = listener.local_addr().map_err(AppError::Server)?;
        let config = config.bound_to(local_addr);

        if local_addr.ip().is_unspecified() && config.base_url_follows_bind() {
            warn!(
                base_url = %config.base_url,
                "Wildcard bind address in artifact links; set [server] base_url to a reachable URL"
            );
        }
        check_gdal(&config);

        let process = Arc::new(build_process(&config));
        let state = AppState::new(
            process,
            config.outputs_dir.clone(),
            config.data_dir.clone(),
            config.base_url.clone(),
        );

        info!(
            bind = %config.bind,
            base_url = %config.base_url,
            outputs = %config.outputs_dir.display(),
            data = %config.data_dir.display(),
            "Application started"
        );

        Ok(Self {
            config,
            state,
            listener,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Address actually bound.
    pub fn local_addr(&self) -> Result<SocketAddr, AppError> {
        self.listener.local_addr().map_err(AppError::Server)
    }

    /// Serves requests until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(AppError::Server)?;
        info!("Server stopped");
        Ok(())
    }
}

fn ensure_dir(path: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(path).map_err(|source| AppError::Storage {
        path: path.to_path_buf(),
        source,
    })
}
