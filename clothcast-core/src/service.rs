//! Request boundary: fetch, then recommend, and never let an error escape.

use serde::{Serialize, Serializer, ser::SerializeStruct};
use tracing::{info, warn};

use crate::{
    ClothcastError, Config, Recommendation, UserPreferences, WeatherProvider, WeatherReading,
    engine, provider::provider_from_config,
};

/// Result handed to the presentation layer.
///
/// Serializes as `{"success": true, "weather": .., "recommendations": [..]}` or
/// `{"success": false, "error": ".."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    Success {
        weather: WeatherReading,
        recommendations: Vec<Recommendation>,
    },
    Failure {
        error: String,
    },
}

impl RecommendationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RecommendationOutcome::Success { .. })
    }
}

impl Serialize for RecommendationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecommendationOutcome::Success { weather, recommendations } => {
                let mut st = serializer.serialize_struct("RecommendationOutcome", 3)?;
                st.serialize_field("success", &true)?;
                st.serialize_field("weather", weather)?;
                st.serialize_field("recommendations", recommendations)?;
                st.end()
            }
            RecommendationOutcome::Failure { error } => {
                let mut st = serializer.serialize_struct("RecommendationOutcome", 2)?;
                st.serialize_field("success", &false)?;
                st.serialize_field("error", error)?;
                st.end()
            }
        }
    }
}

/// Build a provider from `config`, fetch weather for `location` and recommend.
///
/// Every failure, including a missing API key, comes back as
/// [`RecommendationOutcome::Failure`] carrying the error message.
pub async fn generate_recommendations(
    config: &Config,
    location: &str,
    preferences: &UserPreferences,
) -> RecommendationOutcome {
    let result = match provider_from_config(config) {
        Ok(provider) => recommend_with(provider.as_ref(), location, preferences).await,
        Err(e) => Err(e),
    };

    match result {
        Ok((weather, recommendations)) => {
            RecommendationOutcome::Success { weather, recommendations }
        }
        Err(e) => {
            warn!(kind = e.kind(), retryable = e.is_retryable(), "recommendation failed: {e}");
            RecommendationOutcome::Failure { error: e.to_string() }
        }
    }
}

/// Typed variant of [`generate_recommendations`] for callers that hold a provider.
pub async fn recommend_with(
    provider: &dyn WeatherProvider,
    location: &str,
    preferences: &UserPreferences,
) -> Result<(WeatherReading, Vec<Recommendation>), ClothcastError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(ClothcastError::Validation("Please enter a location".to_string()));
    }

    let weather = provider.fetch_weather(location).await?;
    weather.validate()?;

    let recommendations = engine::recommend(&weather, preferences);
    info!(
        location = %weather.location_label,
        style = %preferences.style,
        count = recommendations.len(),
        "generated recommendations"
    );

    Ok((weather, recommendations))
}
