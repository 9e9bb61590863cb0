//! CLI logic for the Concerto diagram tool.
//!
//! Reads a metamodel JSON file, projects its namespaces, optionally lays the
//! diagram out, and writes nodes and edges with their geometry as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::ConfigError;

use std::fs;

use log::{debug, info};
use thiserror::Error;

use concerto_diagram::{DiagramBuilder, DiagramError, Workspace};

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input file could not be parsed, with its content for reporting.
    #[error("{err}")]
    Parse { err: DiagramError, src: String },

    #[error(transparent)]
    Diagram(#[from] DiagramError),
}

/// Run the Concerto diagram CLI application
///
/// # Errors
///
/// Returns `CliError` for:
/// - Configuration loading errors
/// - File I/O errors
/// - Invalid metamodel JSON
/// - Unknown namespaces passed to `--hide`
/// - Projection and layout errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing models"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(direction) = args.direction {
        app_config = app_config.with_direction(direction);
    }

    let source = fs::read_to_string(&args.input).map_err(DiagramError::from)?;

    let builder = DiagramBuilder::new(app_config);
    let models = builder
        .parse(&source)
        .map_err(|err| CliError::Parse { err, src: source })?;

    let mut workspace = Workspace::from_models(models);
    for namespace in &args.hide {
        workspace
            .set_visible(namespace, false)
            .map_err(DiagramError::from)?;
        debug!(namespace; "Hiding namespace");
    }

    let mut diagram = builder.project(&workspace)?;
    if args.auto_layout {
        diagram = builder.layout(&diagram)?;
    }

    let json = builder.render_json(&diagram)?;
    fs::write(&args.output, json).map_err(DiagramError::from)?;

    info!(output_file = args.output; "Diagram exported successfully");

    Ok(())
}
