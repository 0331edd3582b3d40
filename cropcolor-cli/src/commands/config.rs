//! Configuration CLI commands: `config path` and `config show`.

use std::path::Path;

use clap::Subcommand;

use super::common::load_config;
use crate::error::CliError;
use crate::runner::resolve_config_path;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show,
}

/// Run a config subcommand.
pub fn run(config_path: Option<&Path>, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", resolve_config_path(config_path).display());
            Ok(())
        }
        ConfigCommands::Show => run_show(config_path),
    }
}

fn run_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let bin_dir = config
        .gdal
        .bin_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(PATH)".to_string());

    println!("[server]");
    println!("  bind = {}", config.server.bind);
    println!("  base_url = {}", config.server.base_url);
    println!();
    println!("[storage]");
    println!("  outputs_dir = {}", config.storage.outputs_dir.display());
    println!("  data_dir = {}", config.storage.data_dir.display());
    println!();
    println!("[gdal]");
    println!("  bin_dir = {}", bin_dir);
    println!();
    println!("[logging]");
    println!("  directory = {}", config.logging.directory.display());
    println!("  file = {}", config.logging.file);
    Ok(())
}
