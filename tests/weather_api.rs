use serde_json::json;
use weatherbot::config::WeatherConfig;
use weatherbot::tools::{dispatch, ErrorKind, ToolContext, ToolStatus};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn live_context(server: &MockServer) -> ToolContext {
    ToolContext::new(WeatherConfig::with_api_key("test-key", server.uri()), false).unwrap()
}

fn london_body() -> serde_json::Value {
    // 2024-03-01 06:47 and 17:46 UTC
    json!({
        "name": "London",
        "sys": {"country": "GB", "sunrise": 1_709_275_620, "sunset": 1_709_315_160},
        "main": {"temp": 7.46, "feels_like": 4.94, "humidity": 81, "pressure": 1012},
        "weather": [{"description": "overcast clouds"}],
        "wind": {"speed": 4.12, "deg": 250},
        "visibility": 10000,
        "timezone": 0
    })
}

#[tokio::test]
async fn test_current_weather_from_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .mount(&server)
        .await;

    let outcome = dispatch(&live_context(&server), "get_weather", &json!({"location": "London"})).await;

    assert_eq!(outcome.status(), ToolStatus::Success);
    assert_eq!(
        outcome.to_value(),
        json!({
            "location": "London, GB",
            "temperature": 7.5,
            "feels_like": 4.9,
            "humidity": 81,
            "pressure": 1012,
            "unit": "°C",
            "conditions": "Overcast Clouds",
            "wind_speed": 4.12,
            "wind_direction": 250.0,
            "visibility": 10000,
            "sunrise": "06:47",
            "sunset": "17:46",
            "status": "success"
        })
    );
}

#[tokio::test]
async fn test_fahrenheit_uses_imperial_units() {
    let server = MockServer::start().await;
    let mut body = london_body();
    body["main"]["temp"] = json!(45.43);
    body["timezone"] = json!(3600);
    body.as_object_mut().unwrap().remove("visibility");
    body["wind"].as_object_mut().unwrap().remove("deg");

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let value = dispatch(
        &live_context(&server),
        "get_weather",
        &json!({"location": "London", "unit": "fahrenheit"}),
    )
    .await
    .to_value();

    assert_eq!(value["unit"], "°F");
    assert_eq!(value["temperature"], 45.4);
    assert_eq!(value["wind_direction"], "N/A");
    assert_eq!(value["visibility"], "N/A");
    // Sunrise shifted by the one-hour city offset
    assert_eq!(value["sunrise"], "07:47");
}

#[tokio::test]
async fn test_not_found_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&server)
        .await;

    let outcome = dispatch(&live_context(&server), "get_weather", &json!({"location": "Atlantis"})).await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::Network));
    let value = outcome.to_value();
    assert!(value["error"].as_str().unwrap().starts_with("Network error:"));
    assert_eq!(value["location"], "Atlantis");
    assert_eq!(value["status"], "error");
}

#[tokio::test]
async fn test_unexpected_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cod": 200})))
        .mount(&server)
        .await;

    let outcome = dispatch(&live_context(&server), "get_weather", &json!({"location": "Rome"})).await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidResponse));
    let value = outcome.to_value();
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid location or API response:"));
    assert_eq!(value["location"], "Rome");
}

#[tokio::test]
async fn test_partial_body_is_not_reported_as_weather() {
    let server = MockServer::start().await;
    let mut body = london_body();
    body["main"].as_object_mut().unwrap().remove("pressure");
    body["main"].as_object_mut().unwrap().remove("feels_like");
    body["sys"].as_object_mut().unwrap().remove("country");

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let outcome = dispatch(&live_context(&server), "get_weather", &json!({"location": "London"})).await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidResponse));
    let value = outcome.to_value();
    assert_eq!(value["status"], "error");
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid location or API response:"));
    assert_eq!(value["location"], "London");
    assert!(value.get("pressure").is_none());
}

#[tokio::test]
async fn test_each_consumed_field_is_required() {
    let server = MockServer::start().await;
    let mut without_pressure = london_body();
    without_pressure["main"].as_object_mut().unwrap().remove("pressure");
    let mut without_country = london_body();
    without_country["sys"].as_object_mut().unwrap().remove("country");

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Leeds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(without_pressure))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(without_country))
        .mount(&server)
        .await;

    let context = live_context(&server);
    for location in ["Leeds", "York"] {
        let outcome = dispatch(&context, "get_weather", &json!({"location": location})).await;
        assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidResponse), "{}", location);
    }
}

#[tokio::test]
async fn test_placeholder_key_never_calls_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let context = ToolContext::new(
        WeatherConfig::with_api_key("your_openweather_api_key_here", server.uri()),
        false,
    )
    .unwrap();

    let outcome = dispatch(&context, "get_weather", &json!({"location": "Tokyo"})).await;

    assert_eq!(outcome.status(), ToolStatus::Simulated);
}

#[tokio::test]
async fn test_forecast_from_api() {
    let server = MockServer::start().await;
    let base = 1_709_251_200_i64;
    let body = json!({
        "list": [
            {
                "dt": base + 12 * 3600,
                "main": {"temp": 8.44, "humidity": 70},
                "weather": [{"id": 500, "main": "Rain", "description": "light rain"}],
                "wind": {"speed": 5.1}
            },
            {
                "dt": base + 15 * 3600,
                "main": {"temp": 9.1, "humidity": 65},
                "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds"}],
                "wind": {"speed": 4.0}
            },
            {
                "dt": base + 86_400 + 15 * 3600,
                "main": {"temp": 11.0, "humidity": 50},
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
                "wind": {"speed": 2.5}
            }
        ],
        "city": {
            "name": "Paris",
            "country": "FR",
            "coord": {"lat": 48.8534, "lon": 2.3488},
            "timezone": 3600
        }
    });

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Paris"))
        .and(query_param("units", "metric"))
        .and(query_param("cnt", "16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let value = dispatch(
        &live_context(&server),
        "get_weather_forecast",
        &json!({"location": "Paris", "days": 2}),
    )
    .await
    .to_value();

    assert_eq!(value["status"], "success");
    assert_eq!(value["location"], "Paris, FR");
    assert_eq!(value["coordinates"], json!({"lat": 48.8534, "lon": 2.3488}));
    assert_eq!(value["forecast_count"], 2);
    assert_eq!(value["api_forecast_count"], 3);
    assert!(value.get("note").is_none());

    let forecasts = value["forecasts"].as_array().unwrap();
    assert_eq!(forecasts.len(), 2);
    assert_eq!(forecasts[0]["date"], "2024-03-01");
    assert_eq!(forecasts[0]["time"], "13:00");
    assert_eq!(forecasts[0]["conditions"], "Light Rain");
    assert_eq!(forecasts[0]["temperature"], 8.4);
    assert_eq!(forecasts[0]["weather_id"], 500);
    assert_eq!(forecasts[0]["weather_main"], "Rain");
    assert_eq!(forecasts[1]["date"], "2024-03-02");
    assert_eq!(forecasts[1]["time"], "16:00");
    assert_eq!(forecasts[1]["weather_id"], 800);
    assert_eq!(forecasts[1]["weather_main"], "Clear");
}

#[tokio::test]
async fn test_forecast_without_city_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cod": "200", "list": []})))
        .mount(&server)
        .await;

    let outcome = dispatch(
        &live_context(&server),
        "get_weather_forecast",
        &json!({"location": "Paris"}),
    )
    .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidResponse));
    let value = outcome.to_value();
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid location or API response:"));
    assert_eq!(value["location"], "Paris");
}

#[tokio::test]
async fn test_forecast_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = dispatch(
        &live_context(&server),
        "get_weather_forecast",
        &json!({"location": "Paris"}),
    )
    .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::Network));
    let value = outcome.to_value();
    assert_eq!(value["status"], "error");
    assert!(value["error"].as_str().unwrap().starts_with("Network error:"));
    assert_eq!(value["location"], "Paris");
}
