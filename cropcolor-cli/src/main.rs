//! cropcolor CLI - command-line interface
//!
//! Runs the HTTP job service or executes single jobs locally.

mod commands;
mod error;
mod runner;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::run::RunArgs;
use commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "cropcolor")]
#[command(version, about = "Crop rasters and render color reliefs", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.cropcolor/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP job service until Ctrl+C
    Serve {
        /// Listen address (overrides [server] bind)
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Directory holding the GDAL utilities (overrides [gdal] bin_dir)
        #[arg(long)]
        gdal_bin_dir: Option<PathBuf>,
    },

    /// Execute one crop_color job locally and print its outputs
    Run {
        /// Source raster path or URL
        #[arg(long)]
        raster: String,

        /// Produce a CZML document (default: true)
        #[arg(long)]
        output_czml: Option<String>,

        /// Produce a GeoTIFF (default: false)
        #[arg(long)]
        output_tif: Option<String>,

        /// gdaldem color-relief palette, as a path or URL
        #[arg(long, conflicts_with = "color_palette_inline")]
        color_palette: Option<String>,

        /// gdaldem color-relief palette text, passed inline
        #[arg(long)]
        color_palette_inline: Option<String>,

        /// Cutline polygon (e.g. GML), as a path or URL
        #[arg(long)]
        cutline: Option<String>,

        /// Extent as minY,minX,maxY,maxX in EPSG:4326
        #[arg(long, allow_hyphen_values = true)]
        extent: Option<String>,

        /// Directory for artifacts (overrides [storage] outputs_dir)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Directory holding the GDAL utilities (overrides [gdal] bin_dir)
        #[arg(long)]
        gdal_bin_dir: Option<PathBuf>,
    },

    /// Write the default configuration file if it does not exist
    Init,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve { bind, gdal_bin_dir } => {
            commands::serve::run(config_path, ServeArgs { bind, gdal_bin_dir })
        }
        Commands::Run {
            raster,
            output_czml,
            output_tif,
            color_palette,
            color_palette_inline,
            cutline,
            extent,
            output_dir,
            gdal_bin_dir,
        } => commands::run::run(
            config_path,
            RunArgs {
                raster,
                output_czml,
                output_tif,
                color_palette,
                color_palette_inline,
                cutline,
                extent,
                output_dir,
                gdal_bin_dir,
            },
        ),
        Commands::Init => commands::init::run(config_path),
        Commands::Config { command } => commands::config::run(config_path, command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
