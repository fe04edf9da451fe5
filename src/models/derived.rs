use crate::models::{MonthKey, WeatherObservation};
use chrono::NaiveDate;
use serde::Serialize;

/// Chronological daily series as parallel vectors, ready for charting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySeries {
    pub dates: Vec<NaiveDate>,
    pub temperature_c: Vec<f64>,
    pub humidity: Vec<f64>,
    pub rainfall_mm: Vec<f64>,
}

impl DailySeries {
    pub fn push(&mut self, observation: &WeatherObservation) {
        self.dates.push(observation.date);
        self.temperature_c.push(observation.temperature_c);
        self.humidity.push(observation.humidity);
        self.rainfall_mm.push(observation.rainfall_mm);
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyValue {
    pub month: MonthKey,
    pub value: f64,
}

/// Per-month values in chronological month order. Months without
/// observations are absent rather than zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub points: Vec<MonthlyValue>,
}

impl MonthlySeries {
    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.month.to_string()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn get(&self, month: MonthKey) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.month == month)
            .map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedStats {
    pub daily: DailySeries,
    pub monthly_mean_temp: MonthlySeries,
    pub monthly_rainfall_sum: MonthlySeries,
    pub hottest: Option<WeatherObservation>,
    pub coldest: Option<WeatherObservation>,
}

impl DerivedStats {
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No observations match the current filter".to_string();
        }

        let first = self.daily.dates.first().copied();
        let last = self.daily.dates.last().copied();
        let range = match (first, last) {
            (Some(first), Some(last)) => format!("{} to {}", first, last),
            _ => "n/a".to_string(),
        };
        let describe = |obs: &Option<WeatherObservation>| match obs {
            Some(o) => format!("{:.1}°C in {} on {}", o.temperature_c, o.city, o.date),
            None => "No valid measurements".to_string(),
        };

        let mut summary = format!(
            "Observations: {}\n\
            Date Range: {}\n\
            Hottest: {}\n\
            Coldest: {}\n\n\
            Month    Mean °C   Rain mm\n",
            self.daily.len(),
            range,
            describe(&self.hottest),
            describe(&self.coldest),
        );

        for point in &self.monthly_mean_temp.points {
            let rain = self.monthly_rainfall_sum.get(point.month).unwrap_or_default();
            summary.push_str(&format!(
                "{}  {:>7.2}  {:>8.2}\n",
                point.month, point.value, rain
            ));
        }

        summary
    }
}
