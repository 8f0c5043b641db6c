use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use std::{fmt, time::Duration};
use tracing::{debug, instrument};

use crate::{ClothcastError, WeatherReading, config::ProviderSettings};

use super::WeatherProvider;

const GEOCODING_PATH: &str = "/geo/1.0/direct";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const MPS_TO_KMH: f64 = 3.6;

/// OpenWeatherMap client: geocoding followed by a current-conditions lookup.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, settings: &ProviderSettings) -> Result<Self, ClothcastError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                ClothcastError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn geocode(&self, location: &str) -> Result<OwGeoMatch, ClothcastError> {
        let url = format!("{}{GEOCODING_PATH}", self.base_url);
        debug!(%url, location, "geocoding location");

        let res = self
            .http
            .get(&url)
            .query(&[("q", location), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| upstream("Failed to fetch location data", &e))?;

        let matches: Vec<OwGeoMatch> = read_json(res, "Failed to fetch location data").await?;

        matches
            .into_iter()
            .next()
            .ok_or_else(|| ClothcastError::NotFound("Location not found".to_string()))
    }

    async fn fetch_current(&self, lat: f64, lon: f64) -> Result<OwCurrentResponse, ClothcastError> {
        let url = format!("{}{CURRENT_WEATHER_PATH}", self.base_url);
        debug!(%url, lat, lon, "fetching current conditions");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| upstream("Failed to fetch weather data", &e))?;

        read_json(res, "Failed to fetch weather data").await
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn fetch_weather(&self, location: &str) -> Result<WeatherReading, ClothcastError> {
        let place = self.geocode(location).await?;
        let current = self.fetch_current(place.lat, place.lon).await?;
        let reading = normalize(&place, current, Utc::now())?;

        debug!(
            location = %reading.location_label,
            temperature_c = reading.temperature_c,
            feels_like_c = reading.feels_like_c,
            wind_speed_kmh = reading.wind_speed_kmh,
            precipitation_mm = reading.precipitation_mm,
            "normalized weather reading"
        );

        Ok(reading)
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    lat: f64,
    lon: f64,
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwPrecipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    wind: OwWind,
    weather: Vec<OwWeather>,
    rain: Option<OwPrecipitation>,
    snow: Option<OwPrecipitation>,
}

fn normalize(
    place: &OwGeoMatch,
    current: OwCurrentResponse,
    fetched_at: DateTime<Utc>,
) -> Result<WeatherReading, ClothcastError> {
    let condition = current.weather.into_iter().next().ok_or_else(|| {
        ClothcastError::Upstream("Weather response contained no conditions".to_string())
    })?;

    // First non-zero hourly amount wins, rain before snow.
    let precipitation_mm = [current.rain, current.snow]
        .into_iter()
        .flatten()
        .filter_map(|p| p.one_hour)
        .find(|mm| *mm != 0.0)
        .unwrap_or(0.0);

    let observed_at = current
        .dt
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        .unwrap_or(fetched_at);

    Ok(WeatherReading {
        temperature_c: round_half_up(current.main.temp, "temperature")?,
        feels_like_c: round_half_up(current.main.feels_like, "feels-like temperature")?,
        humidity_pct: current.main.humidity,
        wind_speed_kmh: round_half_up(current.wind.speed * MPS_TO_KMH, "wind speed")?,
        description: condition.description,
        icon: condition.icon,
        precipitation_mm,
        location_label: format!("{}, {}", place.name, place.country),
        observed_at,
    })
}

/// Round to the nearest integer, halves toward positive infinity (-2.5 -> -2).
fn round_half_up(value: f64, field: &str) -> Result<i32, ClothcastError> {
    let rounded = (value + 0.5).floor();
    if !rounded.is_finite() || rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return Err(ClothcastError::Validation(format!(
            "Provider returned an invalid {field}: {value}"
        )));
    }
    Ok(rounded as i32)
}

async fn read_json<T: DeserializeOwned>(res: Response, what: &str) -> Result<T, ClothcastError> {
    let status = res.status();
    let body = res.text().await.map_err(|e| upstream(what, &e))?;

    if !status.is_success() {
        return Err(ClothcastError::Upstream(format!(
            "{what}: status {status}: {}",
            truncate_body(&body)
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| ClothcastError::Upstream(format!("{what}: unexpected response: {e}")))
}

fn upstream(what: &str, err: &reqwest::Error) -> ClothcastError {
    if err.is_timeout() {
        ClothcastError::Upstream(format!("{what}: request timed out"))
    } else {
        ClothcastError::Upstream(format!("{what}: {err}"))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> OwGeoMatch {
        OwGeoMatch { lat: 48.85, lon: 2.35, name: "Paris".into(), country: "FR".into() }
    }

    fn current(json: serde_json::Value) -> OwCurrentResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn rounds_halves_up() {
        assert_eq!(round_half_up(21.5, "t").unwrap(), 22);
        assert_eq!(round_half_up(21.49, "t").unwrap(), 21);
        assert_eq!(round_half_up(-2.5, "t").unwrap(), -2);
        assert_eq!(round_half_up(-2.51, "t").unwrap(), -3);
        assert!(round_half_up(f64::NAN, "t").is_err());
        assert!(round_half_up(1e12, "t").is_err());
    }

    #[test]
    fn normalizes_units_and_label() {
        let raw = current(serde_json::json!({
            "dt": 1_700_000_000,
            "main": {"temp": 22.4, "feels_like": 20.6, "humidity": 60},
            "wind": {"speed": 3.0},
            "weather": [{"description": "clear sky", "icon": "01d"}]
        }));

        let reading = normalize(&paris(), raw, DateTime::<Utc>::UNIX_EPOCH).unwrap();
        assert_eq!(reading.temperature_c, 22);
        assert_eq!(reading.feels_like_c, 21);
        assert_eq!(reading.wind_speed_kmh, 11);
        assert_eq!(reading.humidity_pct, 60);
        assert_eq!(reading.description, "clear sky");
        assert_eq!(reading.icon, "01d");
        assert_eq!(reading.precipitation_mm, 0.0);
        assert_eq!(reading.location_label, "Paris, FR");
        assert_eq!(reading.observed_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn precipitation_prefers_rain_then_snow() {
        let base = serde_json::json!({
            "main": {"temp": 1.0, "feels_like": 1.0, "humidity": 90},
            "wind": {"speed": 1.0},
            "weather": [{"description": "snow", "icon": "13d"}]
        });

        let mut both = base.clone();
        both["rain"] = serde_json::json!({"1h": 0.7});
        both["snow"] = serde_json::json!({"1h": 2.0});
        let reading = normalize(&paris(), current(both), Utc::now()).unwrap();
        assert_eq!(reading.precipitation_mm, 0.7);

        let mut snow_only = base.clone();
        snow_only["snow"] = serde_json::json!({"1h": 2.0});
        let reading = normalize(&paris(), current(snow_only), Utc::now()).unwrap();
        assert_eq!(reading.precipitation_mm, 2.0);

        let mut zero_rain = base;
        zero_rain["rain"] = serde_json::json!({"1h": 0.0});
        zero_rain["snow"] = serde_json::json!({"1h": 0.3});
        let reading = normalize(&paris(), current(zero_rain), Utc::now()).unwrap();
        assert_eq!(reading.precipitation_mm, 0.3);
    }

    #[test]
    fn missing_wind_and_dt_use_defaults() {
        let raw = current(serde_json::json!({
            "main": {"temp": 5.0, "feels_like": 2.0, "humidity": 40},
            "weather": [{"description": "mist", "icon": "50n"}]
        }));
        let fetched_at = DateTime::<Utc>::from_timestamp(42, 0).unwrap();
        let reading = normalize(&paris(), raw, fetched_at).unwrap();
        assert_eq!(reading.wind_speed_kmh, 0);
        assert_eq!(reading.observed_at, fetched_at);
    }

    #[test]
    fn empty_condition_list_is_upstream_error() {
        let raw = current(serde_json::json!({
            "main": {"temp": 5.0, "feels_like": 2.0, "humidity": 40},
            "wind": {"speed": 1.0},
            "weather": []
        }));
        let err = normalize(&paris(), raw, Utc::now()).unwrap_err();
        assert_eq!(err.kind(), "upstream");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn debug_redacts_api_key() {
        let provider =
            OpenWeatherProvider::new("SECRET".into(), &ProviderSettings::default()).unwrap();
        let dbg = format!("{provider:?}");
        assert!(!dbg.contains("SECRET"));
    }
}
