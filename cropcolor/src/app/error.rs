//! Application error types.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::ConfigFileError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Configuration could not be loaded.
    Config(ConfigFileError),

    /// A storage directory could not be created.
    Storage { path: PathBuf, source: io::Error },

    /// The listener could not be bound.
    Bind { addr: SocketAddr, source: io::Error },

    /// The HTTP server stopped with an error.
    Server(io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Storage { path, source } => {
                write!(f, "Failed to create directory {}: {}", path.display(), source)
            }
            AppError::Bind { addr, source } => {
                write!(f, "Failed to bind {}: {}", addr, source)
            }
            AppError::Server(e) => write!(f, "Server error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Storage { source, .. } => Some(source),
            AppError::Bind { source, .. } => Some(source),
            AppError::Server(e) => Some(e),
        }
    }
}

impl From<ConfigFileError> for AppError {
    fn from(e: ConfigFileError) -> Self {
        AppError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Bind {
            addr: "127.0.0.1:5000".parse().unwrap(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };
        assert!(err.to_string().contains("Failed to bind 127.0.0.1:5000"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_app_error_from_config_error() {
        let config_err = ConfigFileError::WriteError("disk full".to_string());
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Config(_)));
        assert!(app_err.to_string().contains("disk full"));
    }
}
