use crate::errors::{AgentError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_LOCAL_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_COLLECTION: &str = "autoware_agent";
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

const DOCS_ROOT: &str = "https://autowarefoundation.github.io/autoware-documentation/main/design/autoware-architecture";

/// A named group of documentation pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub urls: Vec<String>,
}

impl Component {
    pub fn new(name: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            name: name.into(),
            urls,
        }
    }
}

/// Components indexed when the configuration does not list any
pub fn default_components() -> Vec<Component> {
    vec![
        Component::new("architecture", vec![format!("{}/index.html", DOCS_ROOT)]),
        Component::new("planning", vec![format!("{}/planning.html", DOCS_ROOT)]),
        Component::new("perception", vec![format!("{}/perception.html", DOCS_ROOT)]),
    ]
}

/// Where embeddings are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbeddingBackend {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "local")]
    Local,
}

impl FromStr for EmbeddingBackend {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(EmbeddingBackend::OpenAi),
            "local" => Ok(EmbeddingBackend::Local),
            other => Err(AgentError::ConfigError(format!(
                "Unknown embedding backend '{}' (expected 'openai' or 'local')",
                other
            ))),
        }
    }
}

/// Optional TOML configuration file; every field overrides a default
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub data_dir: Option<PathBuf>,
    pub chat_model: Option<String>,
    pub embedding_model: Option<String>,
    pub embedding_backend: Option<EmbeddingBackend>,
    pub base_url: Option<String>,
    pub qdrant_url: Option<String>,
    pub collection: Option<String>,
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
    pub top_k: Option<usize>,
    pub max_iterations: Option<usize>,
    pub request_timeout: Option<u64>,
    pub max_retries: Option<u32>,
    pub components: Option<Vec<Component>>,
}

impl ConfigFile {
    /// Parse a configuration file
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let file: ConfigFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(file)
    }

    /// `~/.autoware-agent/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".autoware-agent").join("config.toml"))
    }
}

/// Values given on the command line; each one beats every other source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub chat_model: Option<String>,
    pub qdrant_url: Option<String>,
    pub top_k: Option<usize>,
    pub max_iterations: Option<usize>,
}

/// Resolved application configuration
#[derive(Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub index_dir: PathBuf,
    pub chat_model: String,
    pub embedding_model: String,
    pub embedding_backend: EmbeddingBackend,
    pub openai_api_key: String,
    pub base_url: String,
    pub qdrant_url: Option<String>,
    pub qdrant_api_key: Option<String>,
    pub collection: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub max_iterations: usize,
    pub request_timeout: u64,
    pub max_retries: u32,
    pub components: Vec<Component>,
}

impl AppConfig {
    /// Load `.env`, the config file (explicit path or the default one when it
    /// exists), the process environment and the CLI overrides, then create
    /// the data directories
    pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        dotenv::dotenv().ok();

        let file = match config_path {
            Some(path) => Some(ConfigFile::from_path(path)),
            None => ConfigFile::default_path()
                .filter(|path| path.exists())
                .map(|path| ConfigFile::from_path(&path)),
        };
        let file = file
            .transpose()
            .map_err(|e| AgentError::ConfigError(format!("{:#}", e)))?
            .unwrap_or_default();

        let mut config = Self::from_sources(file, |key| std::env::var(key).ok())?;
        config.apply_overrides(overrides)?;
        config.ensure_dirs()?;
        Ok(config)
    }

    /// Resolve configuration from a parsed file and an environment lookup
    ///
    /// Precedence: defaults < file < environment.
    pub fn from_sources<F>(file: ConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = env("OPENAI_API_KEY")
            .ok_or_else(|| AgentError::ConfigError("OPENAI_API_KEY is required.".to_string()))?;

        let embedding_backend = match env("AUTOWARE_AGENT_EMBEDDING_BACKEND") {
            Some(value) => value.parse()?,
            None => file.embedding_backend.unwrap_or(EmbeddingBackend::OpenAi),
        };

        let default_embedding = match embedding_backend {
            EmbeddingBackend::OpenAi => DEFAULT_EMBEDDING_MODEL,
            EmbeddingBackend::Local => DEFAULT_LOCAL_EMBEDDING_MODEL,
        };

        let data_dir = file.data_dir.unwrap_or_else(|| PathBuf::from("data"));

        let config = Self {
            index_dir: data_dir.join("index"),
            data_dir,
            chat_model: env("AUTOWARE_AGENT_CHAT_MODEL")
                .or(file.chat_model)
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            embedding_model: env("AUTOWARE_AGENT_EMBEDDING_MODEL")
                .or(file.embedding_model)
                .unwrap_or_else(|| default_embedding.to_string()),
            embedding_backend,
            openai_api_key,
            base_url: env("OPENAI_BASE_URL")
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            qdrant_url: env("AUTOWARE_AGENT_QDRANT_URL").or(file.qdrant_url),
            qdrant_api_key: env("QDRANT_API_KEY"),
            collection: file.collection.unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            chunk_size: file.chunk_size.unwrap_or(800),
            chunk_overlap: file.chunk_overlap.unwrap_or(200),
            top_k: file.top_k.unwrap_or(4),
            max_iterations: file.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            request_timeout: file.request_timeout.unwrap_or(60),
            max_retries: file.max_retries.unwrap_or(2),
            components: file.components.unwrap_or_else(default_components),
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line values on top of the resolved configuration
    ///
    /// Precedence: defaults < file < environment < command line.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(model) = &overrides.chat_model {
            self.chat_model = model.clone();
        }
        if let Some(url) = &overrides.qdrant_url {
            self.qdrant_url = Some(url.clone());
        }
        if let Some(top_k) = overrides.top_k {
            self.top_k = top_k;
        }
        if let Some(max_iterations) = overrides.max_iterations {
            self.max_iterations = max_iterations;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(AgentError::ConfigError("chunk_size must be positive".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(AgentError::ConfigError(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(AgentError::ConfigError("top_k must be positive".to_string()));
        }
        Ok(())
    }

    /// Create `data_dir` and `data_dir/index`
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.index_dir)?;
        Ok(())
    }

    /// Look up a configured component by name
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Configured component names, sorted
    pub fn component_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.components.iter().map(|c| c.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("data_dir", &self.data_dir)
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("embedding_backend", &self.embedding_backend)
            .field("openai_api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("qdrant_url", &self.qdrant_url)
            .field("collection", &self.collection)
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("top_k", &self.top_k)
            .field("max_iterations", &self.max_iterations)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .field("components", &self.components)
            .finish()
    }
}
