//! CLI module for autoware-agent and visualize_agent
//!
//! Handles command-line argument parsing and chat input.

pub mod args;
pub mod input;
pub mod visualize;

pub use args::{Args, DEFAULT_QUESTION};
pub use input::InputHandler;
pub use visualize::VisualizeArgs;
