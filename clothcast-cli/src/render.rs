use chrono::Local;
use clothcast_core::{Recommendation, WeatherReading};
use std::fmt::Write;

/// Plain-text report for a successful lookup.
pub fn report(weather: &WeatherReading, recommendations: &[Recommendation]) -> String {
    let mut out = String::new();

    let observed = weather.observed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    let _ = writeln!(out, "{} ({observed})", weather.location_label);
    let _ = writeln!(
        out,
        "  {}°C, feels like {}°C, {}",
        weather.temperature_c, weather.feels_like_c, weather.description
    );
    let _ = writeln!(
        out,
        "  humidity {}%, wind {} km/h, precipitation {} mm",
        weather.humidity_pct, weather.wind_speed_kmh, weather.precipitation_mm
    );

    for rec in recommendations {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rec.category);
        for item in &rec.items {
            let _ = writeln!(out, "  - {item}");
        }
        let _ = writeln!(out, "  {}", rec.reasoning);
    }

    out
}
