//! Configuration for the parley chat service.
//!
//! The server is configured from startup flags (parsed by the binary) with a
//! small set of environment overrides.
//!
//! # Environment Variable Mapping
//!
//! - `PARLEY_LOG_LEVEL` → observability.log_level
//! - `PARLEY_LOG_FORMAT` → observability.log_format
//! - `PARLEY_API_BASE_URL` → inference.base_url

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5001;

/// Default token budget when no context flag is given.
pub const DEFAULT_TOKEN_BUDGET: usize = 8000;

/// Default credential file, relative to the working directory.
pub const DEFAULT_API_KEY_FILE: &str = "cerebras_api_key.txt";

// ============================================================================
// Context Mode
// ============================================================================

/// How the conversation context is measured and bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "budget", rename_all = "lowercase")]
pub enum ContextMode {
    /// Keep at most this many tokens of history.
    Tokens(usize),
    /// Keep at most this many characters of history.
    Chars(usize),
}

impl ContextMode {
    /// Resolve the mode from the two startup flags.
    ///
    /// A token budget wins over a character budget. With neither flag the
    /// service runs in token mode with [`DEFAULT_TOKEN_BUDGET`].
    pub fn from_flags(token_budget: Option<usize>, char_budget: Option<usize>) -> Self {
        match (token_budget, char_budget) {
            (Some(tokens), _) => Self::Tokens(tokens),
            (None, Some(chars)) => Self::Chars(chars),
            (None, None) => Self::Tokens(DEFAULT_TOKEN_BUDGET),
        }
    }

    /// The configured budget, in this mode's unit.
    pub const fn budget(&self) -> usize {
        match self {
            Self::Tokens(n) | Self::Chars(n) => *n,
        }
    }

    /// Unit name used in logs and the health endpoint.
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Tokens(_) => "tokens",
            Self::Chars(_) => "chars",
        }
    }
}

impl Default for ContextMode {
    fn default() -> Self {
        Self::Tokens(DEFAULT_TOKEN_BUDGET)
    }
}

impl std::fmt::Display for ContextMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.budget(), self.unit())
    }
}

// ============================================================================
// Inference Configuration
// ============================================================================

/// Remote completion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the OpenAI-compatible API (without `/v1/...`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.cerebras.ai".into()
}

fn default_model() -> String {
    "llama3.1-70b".into()
}

fn default_timeout_secs() -> u64 {
    120
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Chat Configuration
// ============================================================================

/// Top-level configuration for the chat server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Answer locally instead of calling the remote API
    #[serde(default)]
    pub test_mode: bool,

    /// Context measurement and budget
    #[serde(default)]
    pub context: ContextMode,

    /// Where the API key is persisted (plaintext)
    #[serde(default = "default_api_key_file")]
    pub api_key_file: PathBuf,

    #[serde(default)]
    pub inference: InferenceConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            test_mode: false,
            context: ContextMode::default(),
            api_key_file: default_api_key_file(),
            inference: InferenceConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_api_key_file() -> PathBuf {
    PathBuf::from(DEFAULT_API_KEY_FILE)
}

impl ChatConfig {
    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("PARLEY_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("PARLEY_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Ok(url) = std::env::var("PARLEY_API_BASE_URL") {
            self.inference.base_url = url;
        }
    }

    /// Socket address to bind the HTTP listener to.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| Error::Config(format!("invalid bind host: {}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
