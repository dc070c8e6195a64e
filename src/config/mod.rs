mod api;
mod defaults;
mod server;

use crate::cli::Args;
use crate::error::{ChatError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::ApiConfig;
pub use defaults::{
    DEFAULT_API_ENDPOINT, DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_PORT, DEFAULT_STATIC_DIR,
};
pub use server::ServerConfig;

use defaults::{default_request_timeout, default_session_expiry_minutes, parse_bool};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub expiry_minutes: Option<i64>,
    #[serde(default)]
    pub max_history_pairs: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub name: Option<String>,
}

/// Settings resolved once at startup and handed to the server explicitly.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub request_timeout: u64,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub session_secret: Option<String>,
    pub session_expiry_minutes: i64,
    pub max_history_pairs: Option<usize>,
    pub verbose: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_endpoint", &self.api_endpoint)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("static_dir", &self.static_dir)
            .field("session_secret", &self.session_secret.as_ref().map(|_| "<redacted>"))
            .field("session_expiry_minutes", &self.session_expiry_minutes)
            .field("max_history_pairs", &self.max_history_pairs)
            .field("verbose", &self.verbose)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load(args.config.as_deref())?;
        Self::resolve(args, file_config, |key| env::var(key).ok())
    }

    /// Merge the layers: CLI args > env vars > config file > defaults
    pub fn resolve<F>(args: &Args, file_config: FileConfig, env_var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // API key only ever comes from the environment
        let api_key = env_var("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ChatError::Config("GEMINI_API_KEY environment variable not set".to_string())
            })?;

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env_var("KAUTALIYA_API_ENDPOINT"))
            .or(file_config.api.endpoint)
            .map(|endpoint| endpoint.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let request_timeout = env_var("KAUTALIYA_REQUEST_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.api.request_timeout)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_request_timeout);

        let model = args
            .model
            .clone()
            .or_else(|| env_var("KAUTALIYA_MODEL"))
            .or(file_config.model.name)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let host = args
            .host
            .clone()
            .or_else(|| env_var("KAUTALIYA_HOST"))
            .or(file_config.server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match args.port {
            Some(port) => port,
            None => match env_var("KAUTALIYA_PORT") {
                Some(value) => value.parse::<u16>().map_err(|_| {
                    ChatError::Config(format!("KAUTALIYA_PORT is not a valid port: {}", value))
                })?,
                None => file_config.server.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let static_dir = args
            .static_dir
            .clone()
            .or_else(|| env_var("KAUTALIYA_STATIC_DIR").map(PathBuf::from))
            .or(file_config.server.static_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let session_secret = env_var("KAUTALIYA_SESSION_SECRET").filter(|s| !s.is_empty());

        let session_expiry_minutes = env_var("KAUTALIYA_SESSION_EXPIRY_MINUTES")
            .and_then(|s| s.parse::<i64>().ok())
            .or(file_config.session.expiry_minutes)
            .filter(|minutes| *minutes > 0)
            .unwrap_or_else(default_session_expiry_minutes);

        // Zero means "no cap"
        let max_history_pairs = env_var("KAUTALIYA_MAX_HISTORY_PAIRS")
            .and_then(|s| s.parse::<usize>().ok())
            .or(file_config.session.max_history_pairs)
            .filter(|pairs| *pairs > 0);

        let verbose = args.verbose
            || env_var("KAUTALIYA_VERBOSE")
                .as_deref()
                .and_then(parse_bool)
                .or(file_config.logging.verbose)
                .unwrap_or(false);

        Ok(Config {
            api_key,
            api_endpoint,
            model,
            request_timeout,
            host,
            port,
            static_dir,
            session_secret,
            session_expiry_minutes,
            max_history_pairs,
            verbose,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FileConfig {
    /// Load an explicit config file, or the first one found on the search path
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))
            .map_err(config_error)?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config: FileConfig = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))
                .map_err(config_error)?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))
                .map_err(config_error)?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // Current directory overrides the user config
            PathBuf::from(".kautaliya.yaml"),
            PathBuf::from(".kautaliya.yml"),
            PathBuf::from(".kautaliya.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let config_dir = config_dir.join("kautaliya");
            paths.push(config_dir.join("kautaliya.yaml"));
            paths.push(config_dir.join("kautaliya.yml"));
            paths.push(config_dir.join("kautaliya.json"));
        }

        paths
    }
}

fn config_error(err: anyhow::Error) -> ChatError {
    ChatError::Config(format!("{err:#}"))
}
