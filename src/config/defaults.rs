pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const OPENWEATHER_API_BASE: &str = "http://api.openweathermap.org/data/2.5";

/// Placeholder from the sample `.env` file; treated as "no key".
pub const OPENWEATHER_PLACEHOLDER_KEY: &str = "your_openweather_api_key_here";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful weather and time assistant with access to real-time weather data and timezone information. Follow these guidelines: 1. Provide detailed, accurate, and friendly responses based ONLY on the data returned by the API calls. 2. For weather forecasts, clearly indicate the specific time of day for each forecast (e.g., 'Thursday afternoon forecast shows...'). 3. Acknowledge the limitations of weather forecasts - they are predictions that may change. 4. When providing weather information, include relevant details like temperature, conditions, humidity, and wind when available. 5. Offer practical advice based on the weather conditions (clothing, travel recommendations, etc.). 6. For time queries, be precise about timezone information and conversions. 7. If the data shows 'simulated' status, clearly inform the user that you're providing simulated data, not real weather information. 8. Never make up or embellish weather data beyond what's provided in the API response.";

/// Ollama listens on 11434 unless told otherwise.
pub fn is_ollama_base(api_base: &str) -> bool {
    api_base.contains(":11434")
}

pub fn default_model_for(api_base: &str) -> String {
    if api_base == OPENAI_API_BASE {
        "gpt-4o".to_string()
    } else if is_ollama_base(api_base) {
        "gpt-oss:20b".to_string()
    } else {
        "openai/gpt-oss-20b".to_string()
    }
}

pub fn default_temperature() -> f32 {
    0.7
}

pub fn default_request_timeout() -> u64 {
    120
}

pub fn default_weather_base_url() -> String {
    OPENWEATHER_API_BASE.to_string()
}

pub fn default_weather_timeout() -> u64 {
    10
}
