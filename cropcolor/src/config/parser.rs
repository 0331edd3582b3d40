//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! Starts from defaults and overlays any values found in the file. This is
//! the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::{ConfigFile, ConfigFileError};

pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = section.get("bind") {
            let v = v.trim();
            config.server.bind = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "server".to_string(),
                key: "bind".to_string(),
                value: v.to_string(),
                reason: "expected a socket address like '127.0.0.1:5000'".to_string(),
            })?;
        }
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(ConfigFileError::InvalidValue {
                    section: "server".to_string(),
                    key: "base_url".to_string(),
                    value: v.to_string(),
                    reason: "must start with http:// or https://".to_string(),
                });
            }
            config.server.base_url = v.trim_end_matches('/').to_string();
        }
    }

    // [storage] section
    if let Some(section) = ini.section(Some("storage")) {
        if let Some(v) = non_empty(section.get("outputs_dir")) {
            config.storage.outputs_dir = expand_tilde(v);
        }
        if let Some(v) = non_empty(section.get("data_dir")) {
            config.storage.data_dir = expand_tilde(v);
        }
    }

    // [gdal] section
    if let Some(section) = ini.section(Some("gdal")) {
        config.gdal.bin_dir = non_empty(section.get("bin_dir")).map(expand_tilde);
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section.get("directory")) {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section.get("file")) {
            if v.contains('/') || v.contains('\\') {
                return Err(ConfigFileError::InvalidValue {
                    section: "logging".to_string(),
                    key: "file".to_string(),
                    value: v.to_string(),
                    reason: "must be a file name, not a path".to_string(),
                });
            }
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Expand `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
