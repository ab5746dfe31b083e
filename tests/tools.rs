use chrono::{NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::collections::HashSet;
use weatherbot::config::WeatherConfig;
use weatherbot::tools::time::{current_time_at, resolve_timezone_name, TIMEZONE_ABBREVIATIONS};
use weatherbot::tools::weather::{
    clamp_days, forecast_from_json, simulated_forecast, simulated_weather, title_case,
    TemperatureUnit,
};
use weatherbot::tools::{
    dispatch, format_tools_for_llm, ErrorKind, ToolContext, ToolName, ToolOutcome, ToolStatus,
};

fn simulated_context() -> ToolContext {
    ToolContext::new(WeatherConfig::simulated(), false).unwrap()
}

#[tokio::test]
async fn test_unknown_tool_wire_form() {
    let context = simulated_context();

    let outcome = dispatch(&context, "get_stock_price", &json!({"symbol": "AAPL"})).await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::UnknownTool));
    assert_eq!(
        outcome.to_value(),
        json!({"error": "Unknown tool: get_stock_price", "status": "error"})
    );
}

#[tokio::test]
async fn test_dispatch_weather_without_key_is_simulated() {
    let context = simulated_context();

    let outcome = dispatch(
        &context,
        "get_weather",
        &json!({"location": "Tokyo", "unit": "fahrenheit"}),
    )
    .await;

    assert_eq!(outcome.status(), ToolStatus::Simulated);
    let value = outcome.to_value();
    assert_eq!(value["status"], "simulated");
    assert_eq!(value["location"], "Tokyo");
    assert_eq!(value["unit"], "°F");
    assert!(value["note"].as_str().unwrap().contains("simulated"));
}

#[tokio::test]
async fn test_dispatch_unit_falls_back_to_celsius() {
    let context = simulated_context();

    for unit in [json!("kelvin"), json!(null), json!("Celsius"), json!(7)] {
        let outcome = dispatch(
            &context,
            "get_weather",
            &json!({"location": "Tokyo", "unit": unit}),
        )
        .await;

        assert_eq!(outcome.status(), ToolStatus::Simulated, "unit {}", unit);
        assert_eq!(outcome.to_value()["unit"], "°C");
    }

    let outcome = dispatch(
        &context,
        "get_weather",
        &json!({"location": "Tokyo", "unit": "Fahrenheit"}),
    )
    .await;
    assert_eq!(outcome.to_value()["unit"], "°F");
}

#[tokio::test]
async fn test_dispatch_requires_location() {
    let context = simulated_context();

    let outcome = dispatch(&context, "get_weather_forecast", &json!({"days": 2})).await;

    assert!(outcome.is_error());
    let message = outcome.to_value()["error"].as_str().unwrap().to_string();
    assert!(message.contains("get_weather_forecast"));
}

#[tokio::test]
async fn test_dispatch_time_accepts_null_arguments() {
    let context = simulated_context();

    let outcome = dispatch(&context, "get_current_time", &serde_json::Value::Null).await;

    assert_eq!(outcome.status(), ToolStatus::Success);
    assert_eq!(outcome.to_value()["timezone"], "UTC");
}

#[test]
fn test_simulated_fahrenheit_matches_celsius() {
    for seed in [1_u64, 7, 42, 2024] {
        let celsius = simulated_weather("Oslo", TemperatureUnit::Celsius, &mut StdRng::seed_from_u64(seed));
        let fahrenheit =
            simulated_weather("Oslo", TemperatureUnit::Fahrenheit, &mut StdRng::seed_from_u64(seed));

        let c = celsius.to_value()["temperature"].as_f64().unwrap();
        let f = fahrenheit.to_value()["temperature"].as_f64().unwrap();

        assert!((0.0..=35.0).contains(&c));
        assert_eq!(c.fract(), 0.0);
        assert_eq!(f, c * 9.0 / 5.0 + 32.0);
        assert_eq!(celsius.to_value()["unit"], "°C");
        assert_eq!(
            celsius.to_value()["conditions"],
            fahrenheit.to_value()["conditions"]
        );
    }
}

#[test]
fn test_simulated_weather_ranges() {
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..50 {
        let value = simulated_weather("Lima", TemperatureUnit::Celsius, &mut rng).to_value();
        let humidity = value["humidity"].as_u64().unwrap();
        assert!((30..=90).contains(&humidity));
        let conditions = value["conditions"].as_str().unwrap();
        assert!(["Sunny", "Cloudy", "Rainy", "Snowy"].contains(&conditions));
    }
}

#[test]
fn test_every_abbreviation_resolves() {
    for (abbr, name) in TIMEZONE_ABBREVIATIONS {
        assert_eq!(resolve_timezone_name(abbr), *name);
        assert_eq!(resolve_timezone_name(&abbr.to_lowercase()), *name);
    }
    assert_eq!(resolve_timezone_name(" Asia/Kolkata "), "Asia/Kolkata");
}

#[test]
fn test_current_time_in_tokyo() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 3, 30, 0).unwrap();

    let value = current_time_at("JST", now).to_value();

    assert_eq!(value["status"], "success");
    assert_eq!(value["timezone"], "Asia/Tokyo");
    assert_eq!(value["current_time"], "2024-03-01 12:30:00");
    assert_eq!(value["utc_offset"], "+0900");
    assert_eq!(value["day_of_week"], "Friday");
    assert_eq!(value["is_dst"], false);
}

#[test]
fn test_current_time_reports_dst() {
    let summer = Utc.with_ymd_and_hms(2024, 7, 4, 16, 0, 0).unwrap();

    let value = current_time_at("est", summer).to_value();

    assert_eq!(value["timezone"], "US/Eastern");
    assert_eq!(value["timezone_abbr"], "EDT");
    assert_eq!(value["utc_offset"], "-0400");
    assert_eq!(value["is_dst"], true);
}

#[test]
fn test_current_time_ignores_case() {
    let now = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();

    let london = current_time_at("europe/london", now).to_value();
    assert_eq!(london["status"], "success");
    assert_eq!(london["timezone"], "Europe/London");
    assert_eq!(london["current_time"], "2024-01-15 09:00:00");

    let kolkata = current_time_at("ASIA/KOLKATA", now).to_value();
    assert_eq!(kolkata["timezone"], "Asia/Kolkata");
    assert_eq!(kolkata["utc_offset"], "+0530");

    let tokyo = current_time_at("jst", now).to_value();
    assert_eq!(tokyo["timezone"], "Asia/Tokyo");
    assert_eq!(current_time_at("est", now).to_value()["timezone_abbr"], "EST");
}

#[test]
fn test_unknown_timezone() {
    let outcome = current_time_at("Mars/Olympus", Utc::now());

    assert_eq!(outcome.error_kind(), Some(ErrorKind::UnknownTimezone));
    let value = outcome.to_value();
    assert_eq!(value["error"], "Unknown timezone: Mars/Olympus");
    assert!(!value["available_timezones_sample"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[test]
fn test_clamp_days() {
    assert_eq!(clamp_days(-3), 1);
    assert_eq!(clamp_days(0), 1);
    assert_eq!(clamp_days(3), 3);
    assert_eq!(clamp_days(10), 5);
}

#[tokio::test]
async fn test_simulated_forecast_is_clamped() {
    let context = simulated_context();

    for (requested, expected) in [(10, 5), (0, 1), (3, 3)] {
        let outcome = dispatch(
            &context,
            "get_weather_forecast",
            &json!({"location": "Paris", "days": requested}),
        )
        .await;

        assert_eq!(outcome.status(), ToolStatus::Simulated);
        let value = outcome.to_value();
        let forecasts = value["forecasts"].as_array().unwrap();
        assert_eq!(forecasts.len(), expected);

        let dates: HashSet<&str> = forecasts
            .iter()
            .map(|f| f["date"].as_str().unwrap())
            .collect();
        assert_eq!(dates.len(), expected);
    }
}

#[test]
fn test_simulated_forecast_entries() {
    let today = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();

    let value = simulated_forecast("Paris", 3, today, &mut StdRng::seed_from_u64(5)).to_value();

    let forecasts = value["forecasts"].as_array().unwrap();
    let dates: Vec<&str> = forecasts
        .iter()
        .map(|f| f["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-12-30", "2024-12-31", "2025-01-01"]);

    for entry in forecasts {
        let temperature = entry["temperature"].as_f64().unwrap();
        assert!((10.0..=30.0).contains(&temperature));
        assert_eq!((temperature * 10.0).round() / 10.0, temperature);
        assert_eq!(entry["simulated"], true);
    }
}

fn tokyo_forecast_body() -> String {
    // 2024-03-01T00:00:00Z is 09:00 in Tokyo
    let base = 1_709_251_200_i64;
    let slot = |dt: i64, temp: f64, id: u32, main: &str, description: &str| {
        json!({
            "dt": dt,
            "main": {"temp": temp, "humidity": 60, "pressure": 1015},
            "weather": [{"id": id, "main": main, "description": description}],
            "wind": {"speed": 3.2}
        })
    };

    json!({
        "list": [
            slot(base, 9.04, 800, "Clear", "clear sky"),
            slot(base + 3 * 3600, 12.26, 801, "Clouds", "few clouds"),
            slot(base + 6 * 3600, 13.96, 500, "Rain", "light rain"),
            slot(base + 86_400 + 3 * 3600, 11.0, 804, "Clouds", "overcast clouds"),
            slot(base + 2 * 86_400 + 5 * 3600, 15.0, 800, "Clear", "clear sky")
        ],
        "city": {
            "name": "Tokyo",
            "country": "JP",
            "coord": {"lat": 35.6895, "lon": 139.6917},
            "timezone": 32_400
        }
    })
    .to_string()
}

#[test]
fn test_forecast_picks_afternoon_slot_per_local_day() {
    let value = forecast_from_json(&tokyo_forecast_body(), 2).to_value();

    assert_eq!(value["status"], "success");
    assert_eq!(value["location"], "Tokyo, JP");
    assert_eq!(value["coordinates"], json!({"lat": 35.6895, "lon": 139.6917}));
    assert_eq!(value["forecast_count"], 2);
    assert_eq!(value["api_forecast_count"], 5);
    assert_eq!(
        value["forecasts"],
        json!([
            {
                "date": "2024-03-01",
                "time": "15:00",
                "temperature": 14.0,
                "conditions": "Light Rain",
                "humidity": 60,
                "wind_speed": 3.2,
                "weather_id": 500,
                "weather_main": "Rain"
            },
            {
                "date": "2024-03-02",
                "time": "12:00",
                "temperature": 11.0,
                "conditions": "Overcast Clouds",
                "humidity": 60,
                "wind_speed": 3.2,
                "weather_id": 804,
                "weather_main": "Clouds"
            }
        ])
    );
}

#[test]
fn test_forecast_from_bad_body() {
    let outcome = forecast_from_json("{\"cod\": \"404\"}", 3);

    assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidResponse));
    assert!(outcome.to_value()["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid location or API response:"));
}

#[test]
fn test_forecast_needs_city_coordinates_and_conditions() {
    let mut body: serde_json::Value = serde_json::from_str(&tokyo_forecast_body()).unwrap();
    body["city"].as_object_mut().unwrap().remove("coord");
    let outcome = forecast_from_json(&body.to_string(), 2);
    assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidResponse));

    let mut body: serde_json::Value = serde_json::from_str(&tokyo_forecast_body()).unwrap();
    body["list"][2]["weather"] = json!([]);
    let outcome = forecast_from_json(&body.to_string(), 2);
    assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidResponse));
    assert!(outcome.to_value()["error"]
        .as_str()
        .unwrap()
        .contains("missing weather conditions"));
}

#[test]
fn test_title_case() {
    assert_eq!(title_case("light rain"), "Light Rain");
    assert_eq!(title_case("OVERCAST clouds"), "Overcast Clouds");
    assert_eq!(title_case(""), "");
}

#[test]
fn test_tool_schema_lists_all_tools() {
    let tools = format_tools_for_llm();

    let names: Vec<&str> = tools
        .iter()
        .map(|t| t["function"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["get_weather", "get_current_time", "get_weather_forecast"]
    );
    assert!(tools.iter().all(|t| t["type"] == "function"));
    assert_eq!(
        tools[2]["function"]["parameters"]["required"],
        json!(["location"])
    );
    for name in ToolName::ALL {
        assert_eq!(ToolName::parse(name.as_str()), Some(name));
    }
}

#[test]
fn test_outcome_with_detail_only_on_errors() {
    let success = ToolOutcome::success(&json!({"a": 1})).with_detail("location", "Rome");
    assert_eq!(success.to_value(), json!({"a": 1, "status": "success"}));

    let error = ToolOutcome::error(ErrorKind::Network, "Network error: boom")
        .with_detail("location", "Rome");
    assert_eq!(
        error.to_value(),
        json!({"error": "Network error: boom", "location": "Rome", "status": "error"})
    );
}
