use crate::models::{RawRow, WeatherObservation};
use crate::utils::constants::{
    COLUMN_CITY, COLUMN_DATE, COLUMN_HUMIDITY, COLUMN_RAINFALL, COLUMN_TEMPERATURE,
    MEASUREMENT_DEFAULT,
};
use crate::utils::dates::parse_iso_date;
use chrono::NaiveDate;
use thiserror::Error;

/// Why a single row was left out of a batch. Never propagated past the
/// ingestion loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    #[error("missing date")]
    MissingDate,

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("missing city column")]
    MissingCity,

    #[error("malformed row: {0}")]
    Malformed(String),
}

/// How a missing `city` cell is treated; the two ingestion entry points
/// differ here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Command-line loader: an absent city becomes an empty string.
    #[default]
    Lenient,
    /// Upload loader: an absent city column rejects the row.
    RequireCityColumn,
}

/// Strict calendar-date parse of `YYYY-MM-DD`, ignoring surrounding
/// whitespace.
pub fn parse_observation_date(value: &str) -> Option<NaiveDate> {
    parse_iso_date(value.trim())
}

/// Coerce a raw cell to a finite float, falling back to `0.0`.
pub fn coerce_measurement(value: Option<&str>) -> f64 {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return MEASUREMENT_DEFAULT;
    };

    match raw.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed,
        _ => {
            tracing::trace!("Coercing unparseable measurement '{}' to {}", raw, MEASUREMENT_DEFAULT);
            MEASUREMENT_DEFAULT
        }
    }
}

pub fn build_observation(
    row: &RawRow,
    policy: RowPolicy,
) -> Result<WeatherObservation, RowRejection> {
    let raw_date = row
        .get(COLUMN_DATE)
        .filter(|v| !v.trim().is_empty())
        .ok_or(RowRejection::MissingDate)?;
    let date = parse_observation_date(raw_date)
        .ok_or_else(|| RowRejection::InvalidDate(raw_date.to_string()))?;

    let city = match (row.get(COLUMN_CITY), policy) {
        (Some(city), _) => city.trim().to_string(),
        (None, RowPolicy::Lenient) => String::new(),
        (None, RowPolicy::RequireCityColumn) => return Err(RowRejection::MissingCity),
    };

    Ok(WeatherObservation {
        date,
        city,
        temperature_c: coerce_measurement(row.get(COLUMN_TEMPERATURE)),
        humidity: coerce_measurement(row.get(COLUMN_HUMIDITY)),
        rainfall_mm: coerce_measurement(row.get(COLUMN_RAINFALL)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_build_complete_row() {
        let raw = row(&[
            ("date", "2024-01-10"),
            ("city", "  Paris "),
            ("temperature_c", "5.5"),
            ("humidity", "81"),
            ("rainfall_mm", "0.4"),
        ]);

        let obs = build_observation(&raw, RowPolicy::Lenient).unwrap();

        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(obs.city, "Paris");
        assert_eq!(obs.temperature_c, 5.5);
        assert_eq!(obs.humidity, 81.0);
        assert_eq!(obs.rainfall_mm, 0.4);
    }

    #[test]
    fn test_numeric_failure_defaults_to_zero() {
        let raw = row(&[
            ("date", "2024-01-10"),
            ("city", "Paris"),
            ("temperature_c", "abc"),
            ("humidity", ""),
        ]);

        let obs = build_observation(&raw, RowPolicy::Lenient).unwrap();

        assert_eq!(obs.temperature_c, 0.0);
        assert_eq!(obs.humidity, 0.0);
        assert_eq!(obs.rainfall_mm, 0.0);
    }

    #[test]
    fn test_non_finite_measurements_default_to_zero() {
        assert_eq!(coerce_measurement(Some("nan")), 0.0);
        assert_eq!(coerce_measurement(Some("inf")), 0.0);
        assert_eq!(coerce_measurement(Some(" -3.25 ")), -3.25);
        assert_eq!(coerce_measurement(Some("1e2")), 100.0);
        assert_eq!(coerce_measurement(None), 0.0);
    }

    #[test]
    fn test_missing_or_invalid_date_rejects_row() {
        let missing = row(&[("city", "Paris"), ("temperature_c", "5")]);
        assert_eq!(
            build_observation(&missing, RowPolicy::Lenient),
            Err(RowRejection::MissingDate)
        );

        let blank = row(&[("date", "  "), ("city", "Paris")]);
        assert_eq!(
            build_observation(&blank, RowPolicy::Lenient),
            Err(RowRejection::MissingDate)
        );

        let impossible = row(&[("date", "2024-02-30"), ("city", "Paris")]);
        assert_eq!(
            build_observation(&impossible, RowPolicy::Lenient),
            Err(RowRejection::InvalidDate("2024-02-30".to_string()))
        );

        let garbage = row(&[("date", "yesterday"), ("city", "Paris")]);
        assert!(matches!(
            build_observation(&garbage, RowPolicy::Lenient),
            Err(RowRejection::InvalidDate(_))
        ));
    }

    #[test]
    fn test_date_parser_accepts_padded_whitespace() {
        assert_eq!(
            parse_observation_date(" 2024-07-04 "),
            NaiveDate::from_ymd_opt(2024, 7, 4)
        );
        assert_eq!(parse_observation_date("2024/07/04"), None);
        assert_eq!(parse_observation_date("2024-07-04T10:00:00"), None);
    }

    #[test]
    fn test_year_must_be_four_unsigned_digits() {
        for date in ["24-01-10", "+10000-01-01", "-0044-03-15"] {
            let raw = row(&[("date", date), ("city", "Paris")]);
            assert_eq!(
                build_observation(&raw, RowPolicy::Lenient),
                Err(RowRejection::InvalidDate(date.to_string()))
            );
        }
    }

    #[test]
    fn test_city_policy() {
        let no_city = row(&[("date", "2024-01-10"), ("temperature_c", "5")]);

        let lenient = build_observation(&no_city, RowPolicy::Lenient).unwrap();
        assert_eq!(lenient.city, "");

        assert_eq!(
            build_observation(&no_city, RowPolicy::RequireCityColumn),
            Err(RowRejection::MissingCity)
        );

        let empty_city = row(&[("date", "2024-01-10"), ("city", "")]);
        let obs = build_observation(&empty_city, RowPolicy::RequireCityColumn).unwrap();
        assert_eq!(obs.city, "");
    }
}
