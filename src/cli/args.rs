//! Command-line argument parsing for autoware-agent

use crate::config::ConfigOverrides;
use clap::Parser;
use std::path::PathBuf;

/// Question used when `--question` is omitted
pub const DEFAULT_QUESTION: &str = "Autoware の Planning コンポーネントについて教えてください";

/// Agentic RAG assistant over the Autoware documentation
#[derive(Parser, Debug)]
#[command(name = "autoware-agent")]
#[command(version)]
#[command(about = "Autoware agentic RAG demo.", long_about = None)]
pub struct Args {
    /// Limit document refresh to specific components
    #[arg(long, num_args = 0.., value_name = "NAME")]
    pub components: Option<Vec<String>>,

    /// Ask a single question and exit
    #[arg(long)]
    pub question: Option<String>,

    /// Stream agent intermediate steps
    #[arg(long)]
    pub trace: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep asking questions interactively, with conversation history
    #[arg(long, conflicts_with = "question")]
    pub chat: bool,

    /// Chat model (overrides AUTOWARE_AGENT_CHAT_MODEL and the config file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Qdrant URL (overrides AUTOWARE_AGENT_QDRANT_URL and the config file)
    #[arg(long)]
    pub qdrant_url: Option<String>,

    /// Snippets returned by search_documents when the model gives no k
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Tool rounds allowed before the model must answer
    #[arg(long)]
    pub max_iterations: Option<usize>,
}

impl Args {
    /// The question to ask in single-shot mode
    pub fn question(&self) -> &str {
        self.question.as_deref().unwrap_or(DEFAULT_QUESTION)
    }

    /// Configuration values given on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            chat_model: self.model.clone(),
            qdrant_url: self.qdrant_url.clone(),
            top_k: self.top_k,
            max_iterations: self.max_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["autoware-agent"]);
        assert!(args.components.is_none());
        assert!(!args.trace);
        assert!(!args.chat);
        assert_eq!(args.question(), DEFAULT_QUESTION);
        assert_eq!(args.overrides(), ConfigOverrides::default());
    }

    #[test]
    fn test_config_overrides_from_flags() {
        let args = Args::parse_from([
            "autoware-agent",
            "-m",
            "gpt-4o",
            "--top-k",
            "6",
            "--max-iterations",
            "1",
        ]);
        let overrides = args.overrides();
        assert_eq!(overrides.chat_model.as_deref(), Some("gpt-4o"));
        assert_eq!(overrides.top_k, Some(6));
        assert_eq!(overrides.max_iterations, Some(1));
        assert!(overrides.qdrant_url.is_none());
    }

    #[test]
    fn test_components_and_question() {
        let args = Args::parse_from([
            "autoware-agent",
            "--components",
            "planning",
            "perception",
            "--question",
            "What is Planning?",
            "--trace",
        ]);
        assert_eq!(
            args.components,
            Some(vec!["planning".to_string(), "perception".to_string()])
        );
        assert_eq!(args.question(), "What is Planning?");
        assert!(args.trace);
    }

    #[test]
    fn test_components_without_values() {
        let args = Args::parse_from(["autoware-agent", "--components"]);
        assert_eq!(args.components, Some(Vec::new()));
    }

    #[test]
    fn test_chat_conflicts_with_question() {
        assert!(Args::try_parse_from(["autoware-agent", "--chat", "--question", "q"]).is_err());
    }

    #[test]
    fn test_config_and_verbose() {
        let args = Args::parse_from(["autoware-agent", "-v", "--config", "/tmp/agent.toml"]);
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/agent.toml")));
    }
}
