use crate::models::{DerivedStats, WeatherObservation};
use crate::utils::constants::DATE_FORMAT;
use serde::Serialize;

/// JSON document handed to the charting front end.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardPayload {
    pub times: Vec<String>,
    pub temps: Vec<f64>,
    pub monthly_labels: Vec<String>,
    pub monthly_temps: Vec<f64>,
    pub rain_labels: Vec<String>,
    pub rain_values: Vec<f64>,
    pub hottest: Option<WeatherObservation>,
    pub coldest: Option<WeatherObservation>,
    pub cities: Vec<String>,
}

impl DashboardPayload {
    pub fn new(stats: &DerivedStats, cities: Vec<String>) -> Self {
        Self {
            times: stats
                .daily
                .dates
                .iter()
                .map(|d| d.format(DATE_FORMAT).to_string())
                .collect(),
            temps: stats.daily.temperature_c.clone(),
            monthly_labels: stats.monthly_mean_temp.labels(),
            monthly_temps: stats.monthly_mean_temp.values(),
            rain_labels: stats.monthly_rainfall_sum.labels(),
            rain_values: stats.monthly_rainfall_sum.values(),
            hottest: stats.hottest.clone(),
            coldest: stats.coldest.clone(),
            cities,
        }
    }

    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
