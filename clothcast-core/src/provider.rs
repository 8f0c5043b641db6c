use crate::{
    Config, ClothcastError, WeatherReading, config::API_KEY_ENV,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions for a free-text location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, location: &str) -> Result<WeatherReading, ClothcastError>;
}

/// Construct the OpenWeather provider from config.
///
/// Fails before any network traffic when no API key is available.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, ClothcastError> {
    let api_key = config.api_key().ok_or_else(|| {
        ClothcastError::Configuration(format!(
            "Weather API key not configured.\n\
             Hint: run `clothcast configure` or set {API_KEY_ENV}."
        ))
    })?;

    let provider = OpenWeatherProvider::new(api_key.to_owned(), &config.provider)?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert_eq!(err.kind(), "configuration");
        assert!(err.to_string().contains("Weather API key not configured"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(provider_from_config(&cfg).is_err());
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        assert!(provider_from_config(&cfg).is_ok());
    }
}
