//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::file::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let bin_dir = config
        .gdal
        .bin_dir
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[server]
; Address the HTTP service listens on
bind = {}
; Public URL prefix used in artifact links returned to clients
base_url = {}

[storage]
; Directory job artifacts are written to and served from (/outputs)
outputs_dir = {}
; Directory served under /data; relative raster references resolve here
data_dir = {}

[gdal]
; Directory containing gdalinfo, gdalwarp, gdaldem and gdal_translate
; If empty, the tools are looked up on PATH
bin_dir = {}

[logging]
; Log directory and file name (the file is truncated on startup)
directory = {}
file = {}
"#,
        config.server.bind,
        config.server.base_url,
        path_to_string(&config.storage.outputs_dir),
        path_to_string(&config.storage.data_dir),
        bin_dir,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert path to string, collapsing the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
