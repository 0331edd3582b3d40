//! Helpers shared across CLI commands.

use std::path::Path;

use cropcolor::config::ConfigFile;

use crate::error::CliError;
use crate::runner::resolve_config_path;

/// Load the config without starting logging.
pub fn load_config(cli_path: Option<&Path>) -> Result<ConfigFile, CliError> {
    Ok(ConfigFile::load_from(&resolve_config_path(cli_path))?)
}
