//! CLI runner for common setup.
//!
//! Loads the configuration file and initializes logging once per command.

use std::path::{Path, PathBuf};

use cropcolor::config::{config_file_path, ConfigFile};
use cropcolor::logging::{init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    /// Load the config (defaults when absent) and start logging.
    pub fn new(config_path: Option<&Path>, stdout_logging: bool) -> Result<Self, CliError> {
        let config_path = resolve_config_path(config_path);
        let config = ConfigFile::load_from(&config_path)?;

        let logging_guard = init_logging(
            &config.logging.directory,
            &config.logging.file,
            stdout_logging,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("cropcolor v{}", cropcolor::VERSION);
        info!(config = %self.config_path.display(), "cropcolor CLI: {} command", command);
    }
}

/// `--config` when given, otherwise `~/.cropcolor/config.ini`.
pub fn resolve_config_path(cli_path: Option<&Path>) -> PathBuf {
    cli_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_config_path() {
        assert_eq!(
            resolve_config_path(Some(Path::new("/etc/cropcolor.ini"))),
            PathBuf::from("/etc/cropcolor.ini")
        );
        assert_eq!(resolve_config_path(None), config_file_path());
    }
}
