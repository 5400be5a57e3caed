//! visualize_agent - render the agent graph without touching the network

use anyhow::{Context, Result};
use autoware_agent::{
    cli::VisualizeArgs,
    config::{ConfigFile, DEFAULT_MAX_ITERATIONS},
    logging::init_logging,
    tools::TOOL_NAMES,
    viz,
};
use clap::Parser;
use colored::Colorize;
use tracing::debug;

fn main() {
    let args = VisualizeArgs::parse();
    init_logging(false);

    if let Err(e) = run(args) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: VisualizeArgs) -> Result<()> {
    let content = viz::render(args.format, &TOOL_NAMES, max_iterations());

    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Visualization written to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Tool-round limit from the user config file, if one sets it
fn max_iterations() -> usize {
    ConfigFile::default_path()
        .filter(|path| path.exists())
        .and_then(|path| match ConfigFile::from_path(&path) {
            Ok(file) => file.max_iterations,
            Err(e) => {
                debug!("Ignoring config file: {:#}", e);
                None
            }
        })
        .unwrap_or(DEFAULT_MAX_ITERATIONS)
}
