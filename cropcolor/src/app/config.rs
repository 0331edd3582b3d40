//! Application configuration for `CropColorApp`.
//!
//! `AppConfig` is the runtime view of the settings; it is built from the
//! user's `ConfigFile` and adjusted by command-line overrides.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::{ConfigFile, DEFAULT_BASE_URL};

/// Top-level configuration passed to `CropColorApp::start()`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Address the HTTP listener binds to.
    pub bind: SocketAddr,

    /// Public URL prefix for artifact links.
    pub base_url: String,

    /// Directory artifacts are reserved in and served from.
    pub outputs_dir: PathBuf,

    /// Directory served under `/data`.
    pub data_dir: PathBuf,

    /// GDAL utility directory; `None` uses `PATH`.
    pub gdal_bin_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Create a config with the given storage directories and default server
    /// settings.
    pub fn new(outputs_dir: PathBuf, data_dir: PathBuf) -> Self {
        let defaults = ConfigFile::default();
        Self {
            bind: defaults.server.bind,
            base_url: DEFAULT_BASE_URL.to_string(),
            outputs_dir,
            data_dir,
            gdal_bin_dir: None,
        }
    }

    /// Create application config from the configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            bind: config.server.bind,
            base_url: config.server.base_url.clone(),
            outputs_dir: config.storage.outputs_dir.clone(),
            data_dir: config.storage.data_dir.clone(),
            gdal_bin_dir: config.gdal.bin_dir.clone(),
        }
    }

    /// Override the listen address.
    ///
    /// When the base URL still points at the default address it follows the
    /// new bind address.
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        if self.base_url_follows_bind() {
            self.base_url = format!("http://{bind}");
        }
        self.bind = bind;
        self
    }

    /// Records the address the listener actually bound.
    ///
    /// A base URL that was derived from the bind address is re-derived, so
    /// an ephemeral port shows up in artifact links. Explicit base URLs are
    /// kept; a wildcard bind needs one to produce reachable links.
    pub fn bound_to(mut self, addr: SocketAddr) -> Self {
        if self.base_url_follows_bind() {
            self.base_url = format!("http://{addr}");
        }
        self.bind = addr;
        self
    }

    /// True when the base URL is the default or was derived from `bind`.
    pub fn base_url_follows_bind(&self) -> bool {
        self.base_url == DEFAULT_BASE_URL || self.base_url == format!("http://{}", self.bind)
    }

    pub fn with_gdal_bin_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.gdal_bin_dir = dir;
        self
    }
}
