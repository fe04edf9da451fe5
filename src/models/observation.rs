use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub date: NaiveDate,
    pub city: String,
    pub temperature_c: f64,
    pub humidity: f64,
    pub rainfall_mm: f64,
}

impl WeatherObservation {
    pub fn new(
        date: NaiveDate,
        city: impl Into<String>,
        temperature_c: f64,
        humidity: f64,
        rainfall_mm: f64,
    ) -> Self {
        Self {
            date,
            city: city.into(),
            temperature_c,
            humidity,
            rainfall_mm,
        }
    }

    /// Lower-cased city used for case-insensitive matching and the indexed
    /// `city_key` column.
    pub fn city_key(&self) -> String {
        normalize_city(&self.city)
    }
}

impl fmt::Display for WeatherObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}C", self.city, self.date, self.temperature_c)
    }
}

pub fn normalize_city(city: &str) -> String {
    city.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_city_date_temperature() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let obs = WeatherObservation::new(date, "Paris", 5.5, 80.0, 1.2);

        assert_eq!(obs.to_string(), "Paris 2024-01-10 5.5C");
    }

    #[test]
    fn test_city_key_is_case_folded() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let obs = WeatherObservation::new(date, "MÜNCHEN", 0.0, 0.0, 0.0);

        assert_eq!(obs.city_key(), "münchen");
    }

    #[test]
    fn test_serializes_date_as_iso_string() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let obs = WeatherObservation::new(date, "Oslo", -2.0, 70.0, 0.0);

        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["city"], "Oslo");
    }
}
