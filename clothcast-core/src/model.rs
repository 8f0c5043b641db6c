use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ClothcastError;

/// Current conditions at a resolved location, normalized to Celsius and km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub humidity_pct: u8,
    pub wind_speed_kmh: i32,
    pub description: String,
    pub icon: String,
    pub precipitation_mm: f64,
    pub location_label: String,
    pub observed_at: DateTime<Utc>,
}

impl WeatherReading {
    /// Reject readings the engine cannot reason about.
    pub fn validate(&self) -> Result<(), ClothcastError> {
        if !self.precipitation_mm.is_finite() || self.precipitation_mm < 0.0 {
            return Err(ClothcastError::Validation(format!(
                "Invalid precipitation amount: {}",
                self.precipitation_mm
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub const fn all() -> &'static [Gender] {
        &[Gender::Male, Gender::Female, Gender::Other]
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Gender {
    type Error = ClothcastError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ClothcastError::Validation(format!(
                "Unknown gender '{value}'. Expected one of: male, female, other."
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Teen,
    #[default]
    Adult,
    Senior,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Teen => "teen",
            AgeGroup::Adult => "adult",
            AgeGroup::Senior => "senior",
        }
    }

    pub const fn all() -> &'static [AgeGroup] {
        &[AgeGroup::Teen, AgeGroup::Adult, AgeGroup::Senior]
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgeGroup {
    type Error = ClothcastError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "teen" => Ok(AgeGroup::Teen),
            "adult" => Ok(AgeGroup::Adult),
            "senior" => Ok(AgeGroup::Senior),
            _ => Err(ClothcastError::Validation(format!(
                "Unknown age group '{value}'. Expected one of: teen, adult, senior."
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Basic,
    Sporty,
    #[default]
    Casual,
    Professional,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Basic => "basic",
            Style::Sporty => "sporty",
            Style::Casual => "casual",
            Style::Professional => "professional",
        }
    }

    pub const fn all() -> &'static [Style] {
        &[Style::Basic, Style::Sporty, Style::Casual, Style::Professional]
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Style {
    type Error = ClothcastError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "basic" => Ok(Style::Basic),
            "sporty" => Ok(Style::Sporty),
            "casual" => Ok(Style::Casual),
            "professional" => Ok(Style::Professional),
            _ => Err(ClothcastError::Validation(format!(
                "Unknown style '{value}'. Expected one of: basic, sporty, casual, professional."
            ))),
        }
    }
}

/// Who the outfit is for.
///
/// Only `style` changes the suggested items today; `gender` and `age_group`
/// are validated and carried along but no rule reads them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub gender: Gender,
    pub age_group: AgeGroup,
    pub style: Style,
}

impl UserPreferences {
    /// Build preferences from raw text, e.g. form or CLI input.
    pub fn parse(gender: &str, age_group: &str, style: &str) -> Result<Self, ClothcastError> {
        Ok(Self {
            gender: Gender::try_from(gender)?,
            age_group: AgeGroup::try_from(age_group)?,
            style: Style::try_from(style)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Base Layer")]
    BaseLayer,
    #[serde(rename = "Outerwear")]
    Outerwear,
    #[serde(rename = "Main Clothing")]
    MainClothing,
    #[serde(rename = "Accessories")]
    Accessories,
    #[serde(rename = "Comfort Note")]
    ComfortNote,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::BaseLayer => "Base Layer",
            Category::Outerwear => "Outerwear",
            Category::MainClothing => "Main Clothing",
            Category::Accessories => "Accessories",
            Category::ComfortNote => "Comfort Note",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One group of suggested items and why they were suggested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: Category,
    pub items: Vec<String>,
    pub reasoning: String,
}

impl Recommendation {
    pub fn new<I, S>(category: Category, items: I, reasoning: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category,
            items: items.into_iter().map(Into::into).collect(),
            reasoning: reasoning.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(precipitation_mm: f64) -> WeatherReading {
        WeatherReading {
            temperature_c: 12,
            feels_like_c: 11,
            humidity_pct: 50,
            wind_speed_kmh: 5,
            description: "few clouds".into(),
            icon: "02d".into(),
            precipitation_mm,
            location_label: "Oslo, NO".into(),
            observed_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn enum_as_str_roundtrip() {
        for g in Gender::all() {
            assert_eq!(Gender::try_from(g.as_str()).unwrap(), *g);
        }
        for a in AgeGroup::all() {
            assert_eq!(AgeGroup::try_from(a.as_str()).unwrap(), *a);
        }
        for s in Style::all() {
            assert_eq!(Style::try_from(s.as_str()).unwrap(), *s);
        }
    }

    #[test]
    fn parsing_ignores_case_and_padding() {
        assert_eq!(Style::try_from(" Sporty ").unwrap(), Style::Sporty);
        assert_eq!(AgeGroup::try_from("SENIOR").unwrap(), AgeGroup::Senior);
    }

    #[test]
    fn unknown_style_is_a_validation_error() {
        let err = Style::try_from("goth").unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(err.to_string().contains("Unknown style 'goth'"));
    }

    #[test]
    fn preferences_parse_reports_first_bad_field() {
        let err = UserPreferences::parse("female", "toddler", "basic").unwrap_err();
        assert!(err.to_string().contains("Unknown age group"));

        let prefs = UserPreferences::parse("female", "teen", "basic").unwrap();
        assert_eq!(prefs.gender, Gender::Female);
        assert_eq!(prefs.age_group, AgeGroup::Teen);
        assert_eq!(prefs.style, Style::Basic);
    }

    #[test]
    fn default_preferences() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.gender, Gender::Other);
        assert_eq!(prefs.age_group, AgeGroup::Adult);
        assert_eq!(prefs.style, Style::Casual);
    }

    #[test]
    fn validate_rejects_bad_precipitation() {
        assert!(reading(0.0).validate().is_ok());
        assert!(reading(1.5).validate().is_ok());
        assert!(reading(-0.1).validate().is_err());
        assert!(reading(f64::NAN).validate().is_err());
        assert!(reading(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn category_serializes_as_display_name() {
        let rec = Recommendation::new(Category::ComfortNote, ["x"], "y");
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["category"], "Comfort Note");
        assert_eq!(Category::BaseLayer.to_string(), "Base Layer");
    }
}
