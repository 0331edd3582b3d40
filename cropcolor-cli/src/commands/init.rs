//! Init command - write the default configuration file.

use std::path::Path;

use cropcolor::config::ConfigFile;

use crate::error::CliError;
use crate::runner::resolve_config_path;

/// Run the init command.
pub fn run(config_path: Option<&Path>) -> Result<(), CliError> {
    let path = resolve_config_path(config_path);

    if ConfigFile::ensure_exists(&path)? {
        println!("Created configuration file: {}", path.display());
    } else {
        println!("Configuration file already exists: {}", path.display());
    }
    println!();
    println!("Edit this file to customize cropcolor settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
