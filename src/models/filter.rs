use crate::error::{ProcessingError, Result};
use crate::models::observation::{normalize_city, WeatherObservation};
use crate::utils::dates::parse_iso_date;
use chrono::NaiveDate;

/// Upstream selection applied before aggregation.
///
/// All supplied criteria must hold: case-insensitive exact city match and
/// inclusive date bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationFilter {
    pub city: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ObservationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from presentation-layer query strings. Blank values mean
    /// "not filtered"; a non-blank date that does not parse is an error.
    pub fn from_params(city: Option<&str>, start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(Self {
            city: non_blank(city).map(str::to_string),
            start: parse_bound("start", start)?,
            end: parse_bound("end", end)?,
        })
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    pub fn city_key(&self) -> Option<String> {
        self.city.as_deref().map(normalize_city)
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.start.is_none() && self.end.is_none()
    }

    pub fn matches(&self, observation: &WeatherObservation) -> bool {
        if let Some(key) = self.city_key() {
            if observation.city_key() != key {
                return false;
            }
        }
        if let Some(start) = self.start {
            if observation.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if observation.date > end {
                return false;
            }
        }
        true
    }

    pub fn apply<'a, I>(&self, observations: I) -> Vec<WeatherObservation>
    where
        I: IntoIterator<Item = &'a WeatherObservation>,
    {
        observations
            .into_iter()
            .filter(|o| self.matches(o))
            .cloned()
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bound(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    non_blank(value)
        .map(|v| {
            parse_iso_date(v).ok_or_else(|| {
                ProcessingError::InvalidFilter(format!("{} date '{}' is not YYYY-MM-DD", name, v))
            })
        })
        .transpose()
}
