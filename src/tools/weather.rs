use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, Timelike, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::dispatch::ToolContext;
use super::outcome::{ErrorKind, ToolOutcome};

pub const MIN_FORECAST_DAYS: i64 = 1;
pub const MAX_FORECAST_DAYS: i64 = 5;
/// The forecast endpoint returns 3-hourly slots.
const SLOTS_PER_DAY: usize = 8;
const MAX_FORECAST_SLOTS: usize = 40;
/// Hour of day whose slot best represents the day.
const TARGET_HOUR: i64 = 14;

const SIMULATED_NOTE: &str = "This is simulated data. Please add a valid OpenWeatherMap API key.";
const SIMULATED_FORECAST_NOTE: &str =
    "This is simulated forecast data. Please add a valid OpenWeatherMap API key.";
const SIMULATED_CONDITIONS: &[&str] = &["sunny", "cloudy", "rainy", "snowy"];
const SIMULATED_FORECAST_CONDITIONS: &[&str] = &[
    "Clear Sky",
    "Scattered Clouds",
    "Light Rain",
    "Heavy Rain",
    "Thunderstorm",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// `units` query value understood by OpenWeatherMap.
    pub fn api_units(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "metric",
            TemperatureUnit::Fahrenheit => "imperial",
        }
    }

    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

/// Only "fahrenheit" selects Fahrenheit; null, other spellings and
/// non-strings all fall back to Celsius.
fn lenient_unit<'de, D>(deserializer: D) -> Result<TemperatureUnit, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw.as_ref().and_then(|v| v.as_str()) {
        Some(unit) if unit.trim().eq_ignore_ascii_case("fahrenheit") => TemperatureUnit::Fahrenheit,
        _ => TemperatureUnit::Celsius,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherArgs {
    pub location: String,
    #[serde(default, deserialize_with = "lenient_unit")]
    pub unit: TemperatureUnit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastArgs {
    pub location: String,
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    MAX_FORECAST_DAYS
}

pub fn clamp_days(days: i64) -> usize {
    days.clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS) as usize
}

#[derive(Debug, Serialize)]
struct SimulatedWeather<'a> {
    location: &'a str,
    temperature: f64,
    unit: &'static str,
    conditions: String,
    humidity: u32,
    note: &'static str,
}

#[derive(Debug, Serialize)]
struct WeatherReport {
    location: String,
    temperature: f64,
    feels_like: f64,
    humidity: u32,
    pressure: u32,
    unit: &'static str,
    conditions: String,
    wind_speed: f64,
    wind_direction: serde_json::Value,
    visibility: serde_json::Value,
    sunrise: String,
    sunset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub temperature: f64,
    pub conditions: String,
    pub humidity: u32,
    pub wind_speed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_main: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub simulated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
struct ForecastReport<'a> {
    location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinates: Option<Coordinates>,
    forecasts: Vec<ForecastEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
    /// Days actually reported, and raw slots the API returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    forecast_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_forecast_count: Option<usize>,
}

// OpenWeatherMap response shapes, reduced to the fields we read.

#[derive(Debug, Deserialize)]
struct OwmCurrent {
    name: String,
    sys: OwmSys,
    main: OwmMain,
    weather: Vec<OwmCondition>,
    wind: OwmWind,
    #[serde(default)]
    visibility: Option<u64>,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    humidity: u32,
    pressure: u32,
}

/// Forecast slots only need these two.
#[derive(Debug, Deserialize)]
struct OwmSlotMain {
    temp: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmSlotCondition {
    id: u32,
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
    #[serde(default)]
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmForecast {
    list: Vec<OwmForecastItem>,
    city: OwmCity,
}

#[derive(Debug, Deserialize)]
struct OwmCity {
    name: String,
    country: String,
    coord: Coordinates,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmSlotMain,
    weather: Vec<OwmSlotCondition>,
    wind: OwmWind,
}

enum FetchError {
    Network(String),
    InvalidResponse(String),
}

impl FetchError {
    fn into_failure(self) -> (ErrorKind, String) {
        match self {
            FetchError::Network(msg) => (ErrorKind::Network, format!("Network error: {}", msg)),
            FetchError::InvalidResponse(msg) => (
                ErrorKind::InvalidResponse,
                format!("Invalid location or API response: {}", msg),
            ),
        }
    }
}

pub async fn get_weather(context: &ToolContext, args: &WeatherArgs) -> ToolOutcome {
    let Some(api_key) = context.weather.usable_key() else {
        context.log("no OpenWeatherMap key configured, simulating current weather");
        return simulated_weather(&args.location, args.unit, &mut rand::thread_rng());
    };

    context.log(&format!("requesting weather data for {}", args.location));

    let url = format!("{}/weather", context.weather.base_url);
    let query = [
        ("q", args.location.as_str()),
        ("appid", api_key),
        ("units", args.unit.api_units()),
    ];

    let outcome = match fetch_json::<OwmCurrent>(context, &url, &query).await {
        Ok(current) => build_weather_report(current, args.unit),
        Err(err) => Err(err.into_failure()),
    };

    match outcome {
        Ok(report) => ToolOutcome::success(&report),
        Err((kind, message)) => {
            ToolOutcome::error(kind, message).with_detail("location", args.location.as_str())
        }
    }
}

pub async fn get_weather_forecast(context: &ToolContext, args: &ForecastArgs) -> ToolOutcome {
    let days = clamp_days(args.days);

    let Some(api_key) = context.weather.usable_key() else {
        context.log("no OpenWeatherMap key configured, simulating forecast");
        return simulated_forecast(
            &args.location,
            days,
            Local::now().date_naive(),
            &mut rand::thread_rng(),
        );
    };

    context.log(&format!(
        "requesting forecast data for {} for {} day(s)",
        args.location, days
    ));

    let url = format!("{}/forecast", context.weather.base_url);
    let count = (days * SLOTS_PER_DAY).min(MAX_FORECAST_SLOTS).to_string();
    let query = [
        ("q", args.location.as_str()),
        ("appid", api_key),
        ("units", "metric"),
        ("cnt", count.as_str()),
    ];

    let outcome = match fetch_json::<OwmForecast>(context, &url, &query).await {
        Ok(forecast) => forecast_outcome(forecast, days),
        Err(err) => Err(err.into_failure()),
    };

    match outcome {
        Ok(outcome) => {
            context.log("forecast processing complete");
            outcome
        }
        Err((kind, message)) => {
            ToolOutcome::error(kind, message).with_detail("location", args.location.as_str())
        }
    }
}

/// Random placeholder for current conditions; the caller supplies the RNG.
pub fn simulated_weather<R: Rng>(
    location: &str,
    unit: TemperatureUnit,
    rng: &mut R,
) -> ToolOutcome {
    let celsius: i32 = rng.gen_range(0..=35);
    let conditions = SIMULATED_CONDITIONS
        .choose(&mut *rng)
        .copied()
        .unwrap_or("sunny");

    ToolOutcome::simulated(&SimulatedWeather {
        location,
        temperature: unit.from_celsius(f64::from(celsius)),
        unit: unit.symbol(),
        conditions: title_case(conditions),
        humidity: rng.gen_range(30..=90),
        note: SIMULATED_NOTE,
    })
}

/// Random placeholder forecast: one entry per day starting at `today`.
pub fn simulated_forecast<R: Rng>(
    location: &str,
    days: usize,
    today: NaiveDate,
    rng: &mut R,
) -> ToolOutcome {
    let forecasts = (0..days)
        .map(|offset| ForecastEntry {
            date: (today + Duration::days(offset as i64))
                .format("%Y-%m-%d")
                .to_string(),
            time: None,
            temperature: round1(rng.gen_range(10.0..=30.0)),
            conditions: SIMULATED_FORECAST_CONDITIONS
                .choose(&mut *rng)
                .copied()
                .unwrap_or("Clear Sky")
                .to_string(),
            humidity: rng.gen_range(30..=90),
            wind_speed: round1(rng.gen_range(1.0..=10.0)),
            weather_id: None,
            weather_main: None,
            simulated: true,
        })
        .collect();

    ToolOutcome::simulated(&ForecastReport {
        location: location.to_string(),
        coordinates: None,
        forecasts,
        note: Some(SIMULATED_FORECAST_NOTE),
        forecast_count: None,
        api_forecast_count: None,
    })
}

/// Parse a raw OpenWeatherMap forecast body and reduce it to `days` entries.
pub fn forecast_from_json(body: &str, days: usize) -> ToolOutcome {
    let outcome = serde_json::from_str::<OwmForecast>(body)
        .map_err(|e| FetchError::InvalidResponse(e.to_string()).into_failure())
        .and_then(|forecast| forecast_outcome(forecast, days));

    match outcome {
        Ok(outcome) => outcome,
        Err((kind, message)) => ToolOutcome::error(kind, message),
    }
}

fn forecast_outcome(
    forecast: OwmForecast,
    days: usize,
) -> Result<ToolOutcome, (ErrorKind, String)> {
    let offset = city_offset(forecast.city.timezone);
    let forecasts = select_daily(&forecast.list, days, offset)?;

    Ok(ToolOutcome::success(&ForecastReport {
        location: format!("{}, {}", forecast.city.name, forecast.city.country),
        coordinates: Some(forecast.city.coord),
        forecast_count: Some(forecasts.len()),
        api_forecast_count: Some(forecast.list.len()),
        forecasts,
        note: None,
    }))
}

/// Group slots by city-local date, keep the first `days` dates and, for
/// each, the slot closest to the target hour (earliest wins ties).
fn select_daily(
    items: &[OwmForecastItem],
    days: usize,
    offset: FixedOffset,
) -> Result<Vec<ForecastEntry>, (ErrorKind, String)> {
    let mut by_day: BTreeMap<NaiveDate, Vec<(NaiveDateTime, &OwmForecastItem)>> = BTreeMap::new();

    for item in items {
        let Some(local) = local_time(item.dt, offset) else {
            continue;
        };
        by_day
            .entry(local.date())
            .or_default()
            .push((local, item));
    }

    by_day
        .into_iter()
        .take(days)
        .filter_map(|(_, slots)| {
            slots
                .into_iter()
                .min_by_key(|(time, _)| (i64::from(time.hour()) - TARGET_HOUR).abs())
        })
        .map(|(time, item)| {
            let condition = item.weather.first().ok_or_else(|| {
                FetchError::InvalidResponse(format!("missing weather conditions at {}", item.dt))
                    .into_failure()
            })?;

            Ok(ForecastEntry {
                date: time.format("%Y-%m-%d").to_string(),
                time: Some(time.format("%H:%M").to_string()),
                temperature: round1(item.main.temp),
                conditions: title_case(&condition.description),
                humidity: item.main.humidity,
                wind_speed: item.wind.speed,
                weather_id: Some(condition.id),
                weather_main: Some(condition.main.clone()),
                simulated: false,
            })
        })
        .collect()
}

fn build_weather_report(
    current: OwmCurrent,
    unit: TemperatureUnit,
) -> Result<WeatherReport, (ErrorKind, String)> {
    let condition = current.weather.first().ok_or_else(|| {
        (
            ErrorKind::InvalidResponse,
            "Invalid location or API response: missing weather conditions".to_string(),
        )
    })?;

    let offset = city_offset(current.timezone);
    let clock = |ts: i64| {
        local_time(ts, offset)
            .map(|t| t.format("%H:%M").to_string())
            .ok_or_else(|| {
                (
                    ErrorKind::Unexpected,
                    format!("Unexpected error: invalid timestamp {}", ts),
                )
            })
    };

    Ok(WeatherReport {
        location: format!("{}, {}", current.name, current.sys.country),
        temperature: round1(current.main.temp),
        feels_like: round1(current.main.feels_like),
        humidity: current.main.humidity,
        pressure: current.main.pressure,
        unit: unit.symbol(),
        conditions: title_case(&condition.description),
        wind_speed: current.wind.speed,
        wind_direction: current
            .wind
            .deg
            .map(serde_json::Value::from)
            .unwrap_or_else(|| "N/A".into()),
        visibility: current
            .visibility
            .map(serde_json::Value::from)
            .unwrap_or_else(|| "N/A".into()),
        sunrise: clock(current.sys.sunrise)?,
        sunset: clock(current.sys.sunset)?,
    })
}

async fn fetch_json<T: DeserializeOwned>(
    context: &ToolContext,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, FetchError> {
    let response = context
        .http()
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    context.log(&format!("API response status: {}", response.status()));

    let response = response
        .error_for_status()
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| FetchError::InvalidResponse(e.to_string()))
}

fn city_offset(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

fn local_time(timestamp: i64, offset: FixedOffset) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&offset).naive_local())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Capitalise the first letter of every word: "light rain" -> "Light Rain".
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
