//! Run command - execute one `crop_color` job locally.

use std::path::{Path, PathBuf};

use cropcolor::app::{build_process, check_gdal, AppConfig};
use cropcolor::job::{
    Output, OutputSet, INPUT_COLOR_PALETTE, INPUT_CUTLINE, INPUT_EXTENT, INPUT_OUTPUT_CZML,
    INPUT_OUTPUT_TIF, INPUT_RASTER,
};
use cropcolor::request::{InputValue, RawRequest};
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub raster: String,
    pub output_czml: Option<String>,
    pub output_tif: Option<String>,
    /// Palette path or URL.
    pub color_palette: Option<String>,
    /// Palette text passed inline.
    pub color_palette_inline: Option<String>,
    /// Cutline path or URL.
    pub cutline: Option<String>,
    pub extent: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub gdal_bin_dir: Option<PathBuf>,
}

/// Run the run command.
pub fn run(config_path: Option<&Path>, args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path, false)?;
    runner.log_startup("run");

    let mut config = AppConfig::from_config_file(runner.config());
    if let Some(dir) = &args.output_dir {
        if dir.is_file() {
            return Err(CliError::Usage(format!(
                "--output-dir {} is a file",
                dir.display()
            )));
        }
        config.outputs_dir = dir.clone();
    }
    if args.gdal_bin_dir.is_some() {
        config = config.with_gdal_bin_dir(args.gdal_bin_dir.clone());
    }
    check_gdal(&config);

    let request = build_request(&args);
    let process = build_process(&config);
    let run = process.handle(&request);

    info!(phases = ?run.trace.phases(), "Local job finished");
    let outputs = run.result?;
    print_outputs(&outputs);
    Ok(())
}

/// Translates command-line flags into a raw request.
///
/// Values are passed through untouched; validation happens in the resolver
/// so local runs behave exactly like HTTP requests.
pub fn build_request(args: &RunArgs) -> RawRequest {
    let mut request = RawRequest::default()
        .with_input(INPUT_RASTER, InputValue::reference(args.raster.clone()));

    if let Some(v) = &args.output_czml {
        request.push(INPUT_OUTPUT_CZML, InputValue::literal(v.clone()));
    }
    if let Some(v) = &args.output_tif {
        request.push(INPUT_OUTPUT_TIF, InputValue::literal(v.clone()));
    }
    if let Some(v) = &args.color_palette {
        request.push(INPUT_COLOR_PALETTE, InputValue::reference(v.clone()));
    }
    if let Some(v) = &args.color_palette_inline {
        request.push(INPUT_COLOR_PALETTE, InputValue::literal(v.clone()));
    }
    if let Some(v) = &args.cutline {
        request.push(INPUT_CUTLINE, InputValue::reference(v.clone()));
    }
    if let Some(v) = &args.extent {
        request.push(INPUT_EXTENT, InputValue::literal(v.clone()));
    }
    request
}

fn print_outputs(outputs: &OutputSet) {
    println!("Outputs:");
    for (name, output) in outputs.iter() {
        match output {
            Output::Literal(value) => println!("  {:<5} {}", name, value),
            Output::Artifact(artifact) => match artifact.path() {
                Some(path) => {
                    println!("  {:<5} {} ({})", name, path.display(), artifact.media_type)
                }
                None => println!("  {:<5} <inline> ({})", name, artifact.media_type),
            },
        }
    }
}
