use serde::{Deserialize, Serialize};
use std::fmt;

use crate::numfmt::display_float;

/// A single question/answer record from the FAQ corpus.
///
/// The persisted shape is a JSON array of these objects; order is significant
/// (first match wins for substring containment, first-seen wins score ties).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FaqEntry {
    /// The canonical question text matched against user input.
    pub question: String,
    /// The answer returned when the question matches.
    pub answer: String,
}

/// Raw meteorological inputs extracted from user text.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    /// Air temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Relative humidity in percent.
    pub humidity_percent: f64,
    /// Wind speed in km/h.
    pub wind_kmh: f64,
}

/// Derived weather metrics, built once per request and never mutated.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReport {
    /// Input temperature, rounded to 2 decimals.
    pub temperature_c: f64,
    /// Input humidity, rounded to 2 decimals.
    pub humidity_percent: f64,
    /// Magnus-formula dew point approximation.
    pub dew_point_c: f64,
    /// NOAA Rothfusz regression heat index.
    pub heat_index_c: f64,
    /// Environment-Canada wind chill (equals temperature outside cold/windy conditions).
    pub wind_chill_c: f64,
    /// One-line textual summary picking the dominant metric.
    pub feels_like: String,
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Temperature: {}°C\nRelative Humidity: {}%\nDew Point: {}°C\nHeat Index (approx): {}°C\nWind Chill (approx): {}°C\n{}",
            display_float(self.temperature_c),
            display_float(self.humidity_percent),
            display_float(self.dew_point_c),
            display_float(self.heat_index_c),
            display_float(self.wind_chill_c),
            self.feels_like
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faq_entry_json_shape() {
        let raw = r#"{"question": "reset password", "answer": "Use the settings page."}"#;
        let entry: FaqEntry = serde_json::from_str(raw).expect("valid entry");
        assert_eq!(entry.question, "reset password");
        assert_eq!(entry.answer, "Use the settings page.");
    }

    #[test]
    fn test_report_display_pads_floats() {
        let report = WeatherReport {
            temperature_c: 32.0,
            humidity_percent: 65.0,
            dew_point_c: 24.66,
            heat_index_c: 37.3,
            wind_chill_c: 32.0,
            feels_like: "Heat index: 37.3°C (dew point 24.66°C)".to_string(),
        };
        let text = report.to_string();
        assert!(text.contains("Temperature: 32.0°C"));
        assert!(text.contains("Relative Humidity: 65.0%"));
        assert!(text.contains("Dew Point: 24.66°C"));
        assert!(text.ends_with("Heat index: 37.3°C (dew point 24.66°C)"));
    }
}
