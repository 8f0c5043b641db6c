//! Core library for the `clothcast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its OpenWeatherMap implementation
//! - The rule-based clothing recommendation engine
//! - The request boundary that turns every failure into a plain message
//!
//! It is used by `clothcast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;

pub use config::{Config, ProviderSettings};
pub use engine::recommend;
pub use error::ClothcastError;
pub use model::{AgeGroup, Category, Gender, Recommendation, Style, UserPreferences, WeatherReading};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use service::{RecommendationOutcome, generate_recommendations, recommend_with};
