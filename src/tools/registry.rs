use serde_json::{json, Value};

/// The closed set of tools offered to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetWeather,
    GetCurrentTime,
    GetWeatherForecast,
}

impl ToolName {
    pub const ALL: [ToolName; 3] = [
        ToolName::GetWeather,
        ToolName::GetCurrentTime,
        ToolName::GetWeatherForecast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::GetWeather => "get_weather",
            ToolName::GetCurrentTime => "get_current_time",
            ToolName::GetWeatherForecast => "get_weather_forecast",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "get_weather" => Some(ToolName::GetWeather),
            "get_current_time" => Some(ToolName::GetCurrentTime),
            "get_weather_forecast" => Some(ToolName::GetWeatherForecast),
            _ => None,
        }
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        match self {
            ToolName::GetWeather => ToolDescriptor {
                name: self.as_str(),
                description: "Get current weather information for any city worldwide using real weather data",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "location": {
                            "type": "string",
                            "description": "City name, optionally with country code (e.g., 'San Francisco', 'Tokyo,JP', 'London,UK')"
                        },
                        "unit": {
                            "type": "string",
                            "enum": ["celsius", "fahrenheit"],
                            "description": "Temperature unit preference",
                            "default": "celsius"
                        }
                    },
                    "required": ["location"]
                }),
            },
            ToolName::GetCurrentTime => ToolDescriptor {
                name: self.as_str(),
                description: "Get the current time in any timezone worldwide",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "timezone": {
                            "type": "string",
                            "description": "Timezone name (e.g., 'UTC', 'US/Eastern', 'Europe/London', 'Asia/Tokyo') or abbreviation (EST, PST, etc.)",
                            "default": "UTC"
                        }
                    },
                    "required": []
                }),
            },
            ToolName::GetWeatherForecast => ToolDescriptor {
                name: self.as_str(),
                description: "Get weather forecast for a location for the next few days",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "location": {
                            "type": "string",
                            "description": "City name for the forecast"
                        },
                        "days": {
                            "type": "integer",
                            "description": "Number of days for forecast (1-5)",
                            "minimum": 1,
                            "maximum": 5,
                            "default": 5
                        }
                    },
                    "required": ["location"]
                }),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

impl ToolDescriptor {
    pub fn to_llm_schema(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    ToolName::ALL.iter().map(ToolName::descriptor).collect()
}

pub fn format_tools_for_llm() -> Vec<Value> {
    tool_descriptors()
        .iter()
        .map(ToolDescriptor::to_llm_schema)
        .collect()
}
