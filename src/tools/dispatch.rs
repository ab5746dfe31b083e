use crate::config::WeatherConfig;
use crate::error::Result;
use colored::*;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

use super::outcome::{ErrorKind, ToolOutcome};
use super::registry::ToolName;
use super::time::{self, TimeArgs};
use super::weather::{self, ForecastArgs, WeatherArgs};

/// Everything a tool handler may depend on, built once at startup.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub weather: WeatherConfig,
    pub verbose: bool,
    http: reqwest::Client,
}

impl ToolContext {
    pub fn new(weather: WeatherConfig, verbose: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(weather.timeout_secs))
            .build()?;

        Ok(Self {
            weather,
            verbose,
            http,
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn log(&self, message: &str) {
        if self.verbose {
            eprintln!("{}", format!("[tools] {}", message).dimmed());
        }
    }
}

/// Run the tool named by the model. Unknown names and undecodable arguments
/// come back as error outcomes, never as `Err`.
pub async fn dispatch(context: &ToolContext, name: &str, arguments: &Value) -> ToolOutcome {
    match ToolName::parse(name) {
        Some(tool) => execute(context, tool, arguments).await,
        None => {
            context.log(&format!("rejecting unknown tool '{}'", name));
            ToolOutcome::unknown_tool(name)
        }
    }
}

pub async fn execute(context: &ToolContext, tool: ToolName, arguments: &Value) -> ToolOutcome {
    context.log(&format!("executing {} with args: {}", tool.as_str(), arguments));

    match tool {
        ToolName::GetWeather => match decode::<WeatherArgs>(tool, arguments) {
            Ok(args) => weather::get_weather(context, &args).await,
            Err(outcome) => outcome,
        },
        ToolName::GetCurrentTime => match decode::<TimeArgs>(tool, arguments) {
            Ok(args) => time::get_current_time(&args),
            Err(outcome) => outcome,
        },
        ToolName::GetWeatherForecast => match decode::<ForecastArgs>(tool, arguments) {
            Ok(args) => weather::get_weather_forecast(context, &args).await,
            Err(outcome) => outcome,
        },
    }
}

fn decode<T: DeserializeOwned>(
    tool: ToolName,
    arguments: &Value,
) -> std::result::Result<T, ToolOutcome> {
    // Some models send `null` instead of `{}` for parameterless calls
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };

    serde_json::from_value(arguments).map_err(|e| {
        ToolOutcome::error(
            ErrorKind::InvalidArguments,
            format!("Invalid arguments for {}: {}", tool.as_str(), e),
        )
    })
}
