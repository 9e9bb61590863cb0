//! Command-line argument definitions for the Concerto diagram CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, layout, namespace visibility and logging verbosity.

use clap::Parser;

use concerto_diagram::layout::Direction;

/// Command-line arguments for the Concerto diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input metamodel JSON file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Layout direction (TB, BT, LR, RL), overrides the configuration file
    #[arg(short, long)]
    pub direction: Option<Direction>,

    /// Lay out the diagram instead of keeping the stored positions
    #[arg(short, long)]
    pub auto_layout: bool,

    /// Namespace to hide, may be repeated
    #[arg(long = "hide", value_name = "NAMESPACE")]
    pub hide: Vec<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
