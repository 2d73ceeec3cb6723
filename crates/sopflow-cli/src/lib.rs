//! CLI logic for the sopflow converter.
//!
//! Reads an analysis document, runs it through the sopflow pipeline and
//! writes the resulting BPMN document.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use sopflow::{ProcessBuilder, SopflowError};

/// Run the sopflow CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SopflowError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Layout errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), SopflowError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing analysis"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = ProcessBuilder::new(app_config);
    let procedure = builder.parse(&source)?;
    let xml = builder.render_bpmn(&procedure)?;

    fs::write(&args.output, xml)?;

    info!(output_file = args.output; "BPMN exported successfully");

    Ok(())
}
