//! Rule-based clothing recommendations.
//!
//! Rules run in a fixed order and each contributes at most one entry, so the
//! output order is stable: base layer, main clothing, accessories, comfort note.

use crate::model::{Category, Recommendation, Style, UserPreferences, WeatherReading};

const WINDY_KMH: i32 = 20;
const HUMID_PCT: u8 = 70;
const SUNNY_C: i32 = 25;
const COLD_EXTREMITIES_C: i32 = 5;
const COMFORT_DELTA_C: u32 = 3;

/// A reading plus the booleans every rule shares.
struct Conditions<'a> {
    weather: &'a WeatherReading,
    is_raining: bool,
    is_windy: bool,
    is_humid: bool,
}

impl<'a> Conditions<'a> {
    fn new(weather: &'a WeatherReading) -> Self {
        Self {
            weather,
            is_raining: weather.precipitation_mm > 0.0,
            is_windy: weather.wind_speed_kmh > WINDY_KMH,
            is_humid: weather.humidity_pct > HUMID_PCT,
        }
    }
}

type Rule = fn(&Conditions<'_>, &UserPreferences) -> Option<Recommendation>;

const RULES: [Rule; 4] = [base_layer, main_clothing, accessories, comfort_note];

/// Suggest clothing for the given conditions.
///
/// Always returns at least the main clothing (or outerwear) entry.
pub fn recommend(weather: &WeatherReading, preferences: &UserPreferences) -> Vec<Recommendation> {
    let conditions = Conditions::new(weather);
    RULES
        .iter()
        .filter_map(|rule| rule(&conditions, preferences))
        .collect()
}

fn base_layer(c: &Conditions<'_>, _: &UserPreferences) -> Option<Recommendation> {
    match c.weather.temperature_c {
        t if t <= 0 => Some(Recommendation::new(
            Category::BaseLayer,
            ["Thermal underwear", "Wool base layer", "Warm socks"],
            "Freezing temperatures require insulating base layers",
        )),
        t if t <= 10 => Some(Recommendation::new(
            Category::BaseLayer,
            ["Long-sleeve shirt", "Warm undergarments"],
            "Cold weather needs warm base layers",
        )),
        _ => None,
    }
}

fn main_clothing(c: &Conditions<'_>, prefs: &UserPreferences) -> Option<Recommendation> {
    let style = prefs.style;

    let (category, items, reasoning): (Category, &[&str], &str) = match c.weather.temperature_c {
        i32::MIN..=0 => (
            Category::Outerwear,
            match style {
                Style::Sporty => &["Insulated jacket", "Thermal leggings/pants", "Winter boots"],
                _ => &["Heavy winter coat", "Warm pants", "Insulated boots"],
            },
            "Freezing temperatures require heavy insulation",
        ),
        1..=10 => (
            Category::MainClothing,
            match style {
                Style::Sporty => &["Fleece jacket", "Track pants", "Running shoes"],
                _ => &["Warm jacket", "Jeans or warm pants", "Closed shoes"],
            },
            "Cold weather needs warm, layered clothing",
        ),
        11..=20 => (
            Category::MainClothing,
            match style {
                Style::Sporty => &["Light hoodie", "Athletic pants", "Sneakers"],
                Style::Professional => &["Blazer", "Dress pants/skirt", "Dress shoes"],
                Style::Basic | Style::Casual => &["Light sweater", "Jeans", "Comfortable shoes"],
            },
            "Mild temperatures are perfect for light layers",
        ),
        21..=30 => (
            Category::MainClothing,
            match style {
                Style::Sporty => &["T-shirt", "Shorts", "Athletic shoes"],
                Style::Professional => &["Light shirt", "Lightweight pants", "Breathable shoes"],
                Style::Basic | Style::Casual => {
                    &["T-shirt", "Shorts or light pants", "Sandals or sneakers"]
                }
            },
            "Warm weather calls for light, breathable clothing",
        ),
        _ => (
            Category::MainClothing,
            &["Light, loose clothing", "Shorts", "Sandals", "Hat for sun protection"],
            "Hot weather requires minimal, breathable clothing",
        ),
    };

    Some(Recommendation::new(category, items.iter().copied(), reasoning))
}

fn accessories(c: &Conditions<'_>, _: &UserPreferences) -> Option<Recommendation> {
    let temp = c.weather.temperature_c;
    let mut items: Vec<&str> = Vec::new();
    let mut reasoning = String::new();

    if c.is_raining {
        items.extend(["Umbrella", "Waterproof jacket", "Water-resistant shoes"]);
        reasoning.push_str("Rain protection is essential. ");
    }

    if c.is_windy {
        items.extend(["Windbreaker", "Secure hat or avoid loose items"]);
        reasoning.push_str("Windy conditions require secure clothing. ");
    }

    // Literal substring match on the provider's wording.
    if c.weather.description.contains("sun") || temp > SUNNY_C {
        items.extend(["Sunglasses", "Sunscreen", "Hat"]);
        reasoning.push_str("Sun protection recommended. ");
    }

    if temp <= COLD_EXTREMITIES_C {
        items.extend(["Warm hat", "Gloves", "Scarf"]);
        reasoning.push_str("Extremities need extra protection in cold. ");
    }

    if items.is_empty() {
        return None;
    }

    Some(Recommendation::new(Category::Accessories, items, reasoning.trim_end()))
}

fn comfort_note(c: &Conditions<'_>, _: &UserPreferences) -> Option<Recommendation> {
    let feels_like = c.weather.feels_like_c;
    if c.weather.temperature_c.abs_diff(feels_like) <= COMFORT_DELTA_C {
        return None;
    }

    // Binary attribution: humid air reads as "humidity", anything else as wind chill.
    let cause = if c.is_humid { "humidity" } else { "wind chill" };

    Some(Recommendation::new(
        Category::ComfortNote,
        [format!("Feels like {feels_like}°C due to {cause}")],
        "Consider how the weather actually feels, not just the temperature",
    ))
}
