//! Startup flags.

use clap::Parser;
use parley_common::config::{ChatConfig, ContextMode, DEFAULT_API_KEY_FILE, DEFAULT_PORT};
use std::path::PathBuf;

/// parley-chat - chat with a hosted LLM from your browser.
#[derive(Parser, Debug)]
#[command(name = "parley-chat")]
#[command(version)]
#[command(about = "Web chat front-end with a bounded rolling context.", long_about = None)]
pub struct Args {
    /// Answer with a local echo instead of calling the API
    #[arg(long)]
    pub test: bool,

    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Bound the context to this many tokens (takes precedence)
    #[arg(long, alias = "token_contextlen", value_name = "TOKENS")]
    pub token_contextlen: Option<usize>,

    /// Bound the context to this many characters
    #[arg(long, alias = "char_contextlen", value_name = "CHARS")]
    pub char_contextlen: Option<usize>,

    /// File the API key is read from and saved to
    #[arg(long, default_value = DEFAULT_API_KEY_FILE)]
    pub api_key_file: PathBuf,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Request timeout for inference calls, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    pub log_format: Option<String>,
}

impl Args {
    /// Resolve flags into a server configuration.
    ///
    /// Environment overrides apply first; explicit flags win over them.
    pub fn into_config(self) -> ChatConfig {
        let mut config = ChatConfig {
            host: self.host,
            port: self.port,
            test_mode: self.test,
            context: ContextMode::from_flags(self.token_contextlen, self.char_contextlen),
            api_key_file: self.api_key_file,
            ..Default::default()
        };

        config.apply_env_overrides();

        if let Some(model) = self.model {
            config.inference.model = model;
        }
        if let Some(url) = self.api_base_url {
            config.inference.base_url = url;
        }
        if let Some(secs) = self.timeout_secs {
            config.inference.timeout_secs = secs;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }

        config
    }
}
