//! Application bootstrap and lifecycle management.
//!
//! ```text
//! ConfigFile ──► AppConfig ──► CropColorApp::start
//!                                 ├── storage directories
//!                                 ├── GdalEngine + TempFileAllocator ──► CropColorProcess
//!                                 └── axum router + TcpListener
//!                              CropColorApp::serve(shutdown)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cropcolor::app::{AppConfig, CropColorApp};
//! use cropcolor::config::ConfigFile;
//!
//! let config = AppConfig::from_config_file(&ConfigFile::load()?);
//! let app = CropColorApp::start(config).await?;
//! app.serve(shutdown_signal).await?;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::{build_process, check_gdal, CropColorApp};
pub use config::AppConfig;
pub use error::AppError;
