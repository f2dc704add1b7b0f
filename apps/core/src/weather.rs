//! Derived meteorological quantities.
//!
//! Pure functions over temperature (°C), relative humidity (%) and wind
//! speed (km/h). No I/O and no failure modes: out-of-range humidity is
//! tolerated (clamped before the logarithm) rather than rejected, and the
//! heat index regression runs unguarded over its full input range. Every
//! result is rounded to 2 decimal places.

use crate::models::{WeatherReading, WeatherReport};
use crate::numfmt::display_float;

/// Wind speeds at or below this (km/h) make wind chill meaningless.
const CALM_WIND_KMH: f64 = 4.8;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Magnus-formula dew point approximation.
///
/// Humidity is clamped to a minimum of 0.0001 before the logarithm, so
/// non-physical inputs (<= 0) degrade gracefully instead of producing NaN.
pub fn dew_point_c(t_c: f64, rh_percent: f64) -> f64 {
    const A: f64 = 17.27;
    const B: f64 = 237.7;
    let alpha = (A * t_c) / (B + t_c) + (rh_percent.max(0.0001) / 100.0).ln();
    round2((B * alpha) / (A - alpha))
}

/// NOAA Rothfusz regression heat index, computed in Fahrenheit and
/// converted back to Celsius.
pub fn heat_index_c(t_c: f64, rh_percent: f64) -> f64 {
    let t_f = t_c * 9.0 / 5.0 + 32.0;
    let rh = rh_percent;
    let hi_f = -42.379 + 2.04901523 * t_f + 10.14333127 * rh
        - 0.22475541 * t_f * rh
        - 0.00683783 * t_f * t_f
        - 0.05481717 * rh * rh
        + 0.00122874 * t_f * t_f * rh
        + 0.00085282 * t_f * rh * rh
        - 0.00000199 * t_f * t_f * rh * rh;
    round2((hi_f - 32.0) * 5.0 / 9.0)
}

/// Environment-Canada wind chill. Returns the temperature unchanged when the
/// wind is calm (<= 4.8 km/h) or the air is warmer than 10 °C.
pub fn wind_chill_c(t_c: f64, wind_kmh: f64) -> f64 {
    if wind_kmh <= CALM_WIND_KMH || t_c > 10.0 {
        return round2(t_c);
    }
    let v = wind_kmh.powf(0.16);
    round2(13.12 + 0.6215 * t_c - 11.37 * v + 0.3965 * t_c * v)
}

/// One-line summary picking the dominant metric. The three bands are
/// mutually exclusive and exhaustive: hot (>= 27 °C) reports heat index,
/// cold and windy (<= 10 °C, wind > 4.8 km/h) reports wind chill, everything
/// else reports the plain temperature. Dew point rides along in all bands.
pub fn feels_like(t_c: f64, rh_percent: f64, wind_kmh: f64) -> String {
    let hi = heat_index_c(t_c, rh_percent);
    let wc = wind_chill_c(t_c, wind_kmh);
    let dp = dew_point_c(t_c, rh_percent);
    if t_c >= 27.0 {
        format!(
            "Heat index: {}°C (dew point {}°C)",
            display_float(hi),
            display_float(dp)
        )
    } else if t_c <= 10.0 && wind_kmh > CALM_WIND_KMH {
        format!(
            "Wind chill: {}°C (dew point {}°C)",
            display_float(wc),
            display_float(dp)
        )
    } else {
        format!(
            "Feels like: {}°C (dew point {}°C)",
            display_float(t_c),
            display_float(dp)
        )
    }
}

/// Composes all derived metrics into one immutable report.
pub fn build_report(reading: &WeatherReading) -> WeatherReport {
    let WeatherReading {
        temperature_c: t_c,
        humidity_percent: rh,
        wind_kmh: wind,
    } = *reading;
    WeatherReport {
        temperature_c: round2(t_c),
        humidity_percent: round2(rh),
        dew_point_c: dew_point_c(t_c, rh),
        heat_index_c: heat_index_c(t_c, rh),
        wind_chill_c: wind_chill_c(t_c, wind),
        feels_like: feels_like(t_c, rh, wind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dew_point_known_value() {
        assert_eq!(dew_point_c(20.0, 50.0), 9.25);
    }

    #[test]
    fn test_dew_point_is_pure() {
        let first = dew_point_c(20.0, 50.0);
        for _ in 0..10 {
            assert_eq!(dew_point_c(20.0, 50.0), first);
        }
    }

    #[test]
    fn test_dew_point_tolerates_non_physical_humidity() {
        // Clamped before the logarithm instead of rejected.
        assert!(dew_point_c(20.0, 0.0).is_finite());
        assert!(dew_point_c(20.0, -5.0).is_finite());
    }

    #[test]
    fn test_heat_index_exceeds_temperature_when_hot_and_humid() {
        let hi = heat_index_c(32.0, 65.0);
        assert!(hi > 32.0, "heat index {} should exceed 32", hi);
    }

    #[test]
    fn test_wind_chill_guards() {
        // Warm air: unchanged regardless of wind.
        assert_eq!(wind_chill_c(15.0, 10.0), 15.0);
        // Calm wind: unchanged regardless of temperature.
        assert_eq!(wind_chill_c(-5.0, 4.8), -5.0);
    }

    #[test]
    fn test_wind_chill_is_colder_than_air() {
        let wc = wind_chill_c(-5.0, 20.0);
        assert!(wc < -5.0, "wind chill {} should be below -5", wc);
    }

    #[test]
    fn test_feels_like_bands() {
        assert!(feels_like(30.0, 70.0, 5.0).starts_with("Heat index:"));
        assert!(feels_like(5.0, 60.0, 20.0).starts_with("Wind chill:"));
        assert!(feels_like(15.0, 60.0, 20.0).starts_with("Feels like: 15.0°C"));
        // Ambient band covers calm cold air too (wind guard fails).
        assert!(feels_like(5.0, 60.0, 2.0).starts_with("Feels like: 5.0°C"));
    }

    #[test]
    fn test_build_report_composes_all_metrics() {
        let reading = WeatherReading {
            temperature_c: 32.0,
            humidity_percent: 65.0,
            wind_kmh: 8.0,
        };
        let report = build_report(&reading);
        assert_eq!(report.temperature_c, 32.0);
        assert_eq!(report.humidity_percent, 65.0);
        assert_eq!(report.dew_point_c, dew_point_c(32.0, 65.0));
        // Warm air: wind chill collapses to the temperature.
        assert_eq!(report.wind_chill_c, 32.0);
        assert!(report.feels_like.starts_with("Heat index:"));
    }
}
