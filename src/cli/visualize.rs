//! Arguments of the `visualize_agent` binary

use crate::viz::FlowFormat;
use clap::Parser;
use std::path::PathBuf;

/// Visualize the Autoware documentation agent topology
#[derive(Parser, Debug)]
#[command(name = "visualize_agent")]
#[command(version)]
#[command(about = "Visualize the Autoware documentation agent topology.", long_about = None)]
pub struct VisualizeArgs {
    /// Output format for the visualization
    #[arg(long, value_enum, default_value_t = FlowFormat::Mermaid)]
    pub format: FlowFormat,

    /// Optional file path to save the visualization
    #[arg(long)]
    pub output: Option<PathBuf>,
}
