mod api;
pub mod defaults;
mod validation;
mod weather;

use crate::cli::Args;
use crate::deployment::DeploymentRecord;
use crate::error::{Result, WeatherbotError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::{ApiConfig, ModelConfig, SessionConfig};
pub use validation::{expand_env_var_in_string, normalize_api_base};
pub use weather::{WeatherConfig, WeatherSection};

use defaults::{
    default_model_for, default_request_timeout, default_temperature, DEFAULT_SYSTEM_PROMPT,
    OPENAI_API_BASE,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    /// Normalised base URL ending in `/v1`.
    pub api_base: String,
    pub model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub request_timeout: u64,
    pub verbose: bool,
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsonConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub weather: WeatherSection,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Values supplied on the command line; each wins over env and file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub verbose: bool,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let json_config = JsonConfig::load().unwrap_or_else(|e| {
            eprintln!("Warning: ignoring config file: {:#}", e);
            JsonConfig::default()
        });

        // --endpoint beats --platform; the deployment record only supplies a URL
        let endpoint = match (&args.endpoint, args.platform) {
            (Some(endpoint), _) => Some(endpoint.clone()),
            (None, Some(platform)) => {
                Some(DeploymentRecord::load(platform, Path::new("."))?.api_endpoint)
            }
            (None, None) => None,
        };

        let overrides = Overrides {
            endpoint,
            model: args.model.clone(),
            verbose: args.verbose,
        };

        Self::resolve(&overrides, &json_config, |key| env::var(key).ok())
    }

    /// Layer CLI overrides > environment > config file > defaults.
    pub fn resolve<F>(overrides: &Overrides, file: &JsonConfig, env_lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = overrides
            .endpoint
            .clone()
            .or_else(|| env_lookup("AI_API_ENDPOINT"))
            .or_else(|| file.api.endpoint.as_deref().map(expand_env_var_in_string))
            .map(|endpoint| normalize_api_base(&endpoint))
            .unwrap_or_else(|| OPENAI_API_BASE.to_string());

        let api_key = env_lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());

        // Local servers (Ollama, vLLM) accept unauthenticated requests
        if api_key.is_none() && api_base == OPENAI_API_BASE {
            return Err(WeatherbotError::Config(
                "OPENAI_API_KEY environment variable not set".to_string(),
            ));
        }

        let model = overrides
            .model
            .clone()
            .or_else(|| env_lookup("AI_MODEL"))
            .or_else(|| file.model.default_model.clone())
            .unwrap_or_else(|| default_model_for(&api_base));

        let system_prompt = env_lookup("AI_SYSTEM_PROMPT")
            .or_else(|| file.model.system_prompt.clone())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let request_timeout = env_lookup("AI_REQUEST_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file.api.request_timeout)
            .unwrap_or_else(default_request_timeout);

        let verbose = overrides.verbose
            || env_lookup("AI_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file.session.verbose)
                .unwrap_or(false);

        let weather = WeatherConfig::resolve(&file.weather, env_lookup("OPENWEATHER_API_KEY"));

        Ok(Config {
            api_key,
            api_base,
            model,
            system_prompt,
            temperature: file.model.temperature.unwrap_or_else(default_temperature),
            max_tokens: file.model.max_tokens,
            request_timeout,
            verbose,
            weather,
        })
    }

    pub fn get_current_date() -> String {
        chrono::Local::now().format("%A, %B %d, %Y").to_string()
    }
}

impl JsonConfig {
    pub fn load() -> anyhow::Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(JsonConfig::default())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse YAML config file: {}", path.display())
            })?
        } else {
            serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse JSON config file: {}", path.display())
            })?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".weatherbot.yaml"),
            PathBuf::from(".weatherbot.yml"),
            PathBuf::from(".weatherbot.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("weatherbot");
            paths.push(config_dir.join("weatherbot.yaml"));
            paths.push(config_dir.join("weatherbot.yml"));
            paths.push(config_dir.join("weatherbot.json"));
        }

        paths
    }
}
