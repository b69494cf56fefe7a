//! End-to-end lookups through `Dashboard` against a mock OpenWeather server.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use weatherdash_core::{
    ApiKey, Coordinate, Dashboard, Endpoints, IconCategory, LookupOutcome, WeatherError,
    location::{GeolocationOptions, GeolocationSource, Unavailable},
    provider::openweather::OpenWeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const T0: i64 = 1792152000; // 2026-10-16T12:00:00Z

/// A location service the user refused access to.
#[derive(Debug)]
struct Denied;

#[async_trait]
impl GeolocationSource for Denied {
    async fn current_position(&self, _: &GeolocationOptions) -> Result<Coordinate, WeatherError> {
        Err(WeatherError::GeolocationDenied)
    }
}

fn dashboard_for(server: &MockServer) -> Dashboard<Utc> {
    dashboard_with_location(server, Arc::new(Unavailable))
}

fn dashboard_with_location(
    server: &MockServer,
    geolocation: Arc<dyn GeolocationSource>,
) -> Dashboard<Utc> {
    let provider = OpenWeatherProvider::new(
        ApiKey::new("test-key"),
        Endpoints {
            geo_base: format!("{}/geo/1.0", server.uri()),
            weather_base: format!("{}/data/2.5", server.uri()),
        },
    );
    Dashboard::with_time_zone(Arc::new(provider), geolocation, Utc)
}

fn current_body(name: &str, temp: f64, icon: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "dt": T0,
        "sys": {"country": "FR"},
        "main": {"temp": temp, "feels_like": temp - 1.0, "humidity": 70},
        "wind": {"speed": 3.0},
        "visibility": 10000,
        "weather": [{"main": "Clouds", "description": "broken clouds", "icon": icon}]
    })
}

fn forecast_body() -> serde_json::Value {
    let list: Vec<_> = (0..40)
        .map(|i| {
            let icon = if i < 8 { "04d" } else { "10d" };
            let main = if i < 8 { "Clouds" } else { "Rain" };
            let pop = if i < 8 { 0.0 } else { 0.55 };
            serde_json::json!({
                "dt": T0 + 10800 * i as i64,
                "main": {"temp": 15.2, "humidity": 75},
                "wind": {"speed": 2.6},
                "weather": [{"main": main, "description": main.to_lowercase(), "icon": icon}],
                "pop": pop
            })
        })
        .collect();
    serde_json::json!({"list": list})
}

async fn mount_geocode(server: &MockServer, q: &str, lat: f64, lon: f64, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", q))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"name": q, "lat": lat, "lon": lon, "country": "FR"}]))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

async fn mount_weather(server: &MockServer, lat: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", lat))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body(name, 15.2, "04d")))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", lat))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn paris_lookup_renders_daily_and_hourly() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Paris", 48.86, 2.35, Duration::ZERO).await;
    mount_weather(&server, "48.86", "Paris").await;

    let dash = dashboard_for(&server);
    let model = dash.search("Paris").await.unwrap().into_applied().unwrap();

    assert_eq!(model.current.place, "Paris, FR");
    assert_eq!(model.current.temperature, "15°C");
    assert_eq!(model.current.icon, IconCategory::Cloud);
    assert_eq!(model.current.visibility, "10.0 km");

    assert_eq!(model.daily.len(), 5);
    assert_eq!(model.daily[0].label, "Today");
    assert_eq!(model.daily[0].icon, IconCategory::Cloud);
    assert_eq!(model.daily[0].temperature, "15°C");
    assert_eq!(model.daily[1].label, "Saturday");
    assert_eq!(model.daily[1].icon, IconCategory::CloudSunRain);

    let hours = model.hourly(0);
    let t0 = Utc.timestamp_opt(T0, 0).unwrap();
    assert_eq!(hours.len(), 8);
    assert_eq!(hours[0].timestamp, t0);
    assert_eq!(hours[7].timestamp, t0 + chrono::Duration::hours(21));
    assert!(hours.iter().all(|h| !h.is_precipitating));

    let rainy = model.hourly(1);
    assert!(rainy.iter().all(|h| h.is_precipitating && h.precipitation == "55%"));

    let detail = dash.hourly(0).unwrap();
    assert_eq!(detail.title, "Hourly Weather - Today, Oct 16");
}

#[tokio::test]
async fn failed_forecast_leaves_nothing_rendered() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Paris", 48.86, 2.35, Duration::ZERO).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris", 15.2, "04d")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let dash = dashboard_for(&server);
    let err = dash.search("Paris").await.unwrap_err();

    assert!(matches!(err, WeatherError::Provider { status: 502, .. }));
    assert!(dash.session().active().is_none());
    assert!(dash.hourly(0).is_none());
}

#[tokio::test]
async fn denied_location_then_named_city_recovers() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Paris", 48.86, 2.35, Duration::ZERO).await;
    mount_weather(&server, "48.86", "Paris").await;

    let dash = dashboard_with_location(&server, Arc::new(Denied));

    let err = dash.locate().await.unwrap_err();
    assert!(matches!(err, WeatherError::GeolocationDenied), "got {err:?}");

    let outcome = dash.locate_or_search("Paris").await.unwrap();
    let LookupOutcome::Applied(model) = outcome else {
        panic!("fallback lookup was not applied");
    };
    assert_eq!(model.current.place, "Paris, FR");
}

#[tokio::test]
async fn unavailable_location_falls_back_to_named_city() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Paris", 48.86, 2.35, Duration::ZERO).await;
    mount_weather(&server, "48.86", "Paris").await;

    let dash = dashboard_for(&server);

    let err = dash.locate().await.unwrap_err();
    assert!(matches!(err, WeatherError::GeolocationUnavailable), "got {err:?}");

    let model = dash.locate_or_search("Paris").await.unwrap().into_applied().unwrap();
    assert_eq!(model.current.place, "Paris, FR");
}

#[tokio::test]
async fn invalid_api_key_is_reported_as_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let dash = dashboard_for(&server);
    let err = dash.search("Paris").await.unwrap_err();

    assert_eq!(err.to_string(), "Weather service error (401): Invalid API key");
    assert!(!matches!(err, WeatherError::Network(_)));
}

#[tokio::test]
async fn slow_earlier_search_does_not_clobber_newer_result() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Slowtown", 10.0, 10.0, Duration::from_millis(500)).await;
    mount_geocode(&server, "Fasttown", 20.0, 20.0, Duration::ZERO).await;
    mount_weather(&server, "10", "Slowtown").await;
    mount_weather(&server, "20", "Fasttown").await;

    let dash = Arc::new(dashboard_for(&server));

    let slow = {
        let dash = Arc::clone(&dash);
        tokio::spawn(async move { dash.search("Slowtown").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fast = dash.search("Fasttown").await.unwrap();
    assert!(matches!(fast, LookupOutcome::Applied(_)));

    let slow = slow.await.unwrap().unwrap();
    assert!(matches!(slow, LookupOutcome::Superseded));

    let active = dash.session().active().unwrap();
    assert_eq!(active.current.place_name, "Fasttown");
}
