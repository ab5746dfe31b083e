use serde::{Deserialize, Serialize};

use super::defaults::{
    default_weather_base_url, default_weather_timeout, OPENWEATHER_PLACEHOLDER_KEY,
};
use super::validation::expand_env_var_in_string;

/// `weather:` section of the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WeatherSection {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Resolved settings handed to the weather tools.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl WeatherConfig {
    pub fn simulated() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_secs: default_weather_timeout(),
        }
    }

    pub fn with_api_key(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: default_weather_timeout(),
        }
    }

    /// Env var wins over the config file; `${VAR}` references in the file are expanded.
    pub fn resolve(section: &WeatherSection, env_key: Option<String>) -> Self {
        let api_key = env_key.or_else(|| {
            section
                .api_key
                .as_deref()
                .map(expand_env_var_in_string)
        });

        Self {
            api_key,
            base_url: section
                .base_url
                .clone()
                .unwrap_or_else(default_weather_base_url)
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: section.timeout.unwrap_or_else(default_weather_timeout),
        }
    }

    /// The key to use for real requests, or `None` when data must be simulated.
    pub fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != OPENWEATHER_PLACEHOLDER_KEY && !k.starts_with("${"))
    }
}
