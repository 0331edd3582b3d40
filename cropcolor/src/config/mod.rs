//! User configuration stored in `~/.cropcolor/config.ini`.
//!
//! # Example
//!
//! ```ignore
//! use cropcolor::config::{config_file_path, ConfigFile};
//!
//! let config = ConfigFile::load_from(&config_file_path())?;
//! println!("serving on {}", config.server.bind);
//! ```

mod file;
mod parser;
mod writer;

pub use file::{
    config_directory, config_file_path, ConfigFile, ConfigFileError, GdalSettings,
    LoggingSettings, ServerSettings, StorageSettings, DEFAULT_BASE_URL, DEFAULT_BIND,
    DEFAULT_DATA_DIR, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE, DEFAULT_OUTPUTS_DIR,
};
