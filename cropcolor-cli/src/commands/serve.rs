//! Serve command - run the HTTP job service until Ctrl+C.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cropcolor::app::{AppConfig, CropColorApp};
use tokio::sync::Notify;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the serve command.
pub struct ServeArgs {
    pub bind: Option<SocketAddr>,
    pub gdal_bin_dir: Option<PathBuf>,
}

/// Run the serve command.
pub fn run(config_path: Option<&Path>, args: ServeArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path, true)?;
    runner.log_startup("serve");

    let mut config = AppConfig::from_config_file(runner.config());
    if let Some(bind) = args.bind {
        config = config.with_bind(bind);
    }
    if args.gdal_bin_dir.is_some() {
        config = config.with_gdal_bin_dir(args.gdal_bin_dir);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let shutdown = Arc::new(Notify::new());
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping server...");
        shutdown_clone.notify_one();
    })
    .map_err(|e| CliError::Runtime(format!("Failed to set signal handler: {}", e)))?;

    runtime.block_on(async move {
        let app = CropColorApp::start(config).await?;
        let addr = app.local_addr()?;

        println!("cropcolor v{}", cropcolor::VERSION);
        println!("================");
        println!();
        println!("Listening:  http://{}", addr);
        println!("WPS:        {}/wps", app.config().base_url);
        println!("Outputs:    {}", app.config().outputs_dir.display());
        println!("Data:       {}", app.config().data_dir.display());
        println!();
        println!("Press Ctrl+C to stop");
        println!();

        app.serve(async move { shutdown.notified().await }).await?;
        info!("Shutdown complete");
        Ok::<(), CliError>(())
    })
}
