use crate::models::{
    DailySeries, DerivedStats, MonthKey, MonthlySeries, MonthlyValue, WeatherObservation,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Round to two decimals, ties to even on the scaled value.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[derive(Debug, Default, Clone, Copy)]
struct MonthAccumulator {
    temperature_sum: f64,
    rainfall_sum: f64,
    count: usize,
}

/// Derives chart series and extremes from an already-filtered observation set.
pub struct ObservationAnalyzer;

impl ObservationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, observations: &[WeatherObservation]) -> DerivedStats {
        if observations.is_empty() {
            return DerivedStats::default();
        }

        let (monthly_mean_temp, monthly_rainfall_sum) = self.monthly_series(observations);

        DerivedStats {
            daily: self.daily_series(observations),
            monthly_mean_temp,
            monthly_rainfall_sum,
            hottest: self.extreme(observations, Ordering::Greater).cloned(),
            coldest: self.extreme(observations, Ordering::Less).cloned(),
        }
    }

    /// Observations sorted by date; `sort_by_key` is stable so same-day
    /// records keep their input order.
    fn daily_series(&self, observations: &[WeatherObservation]) -> DailySeries {
        let mut sorted: Vec<&WeatherObservation> = observations.iter().collect();
        sorted.sort_by_key(|o| o.date);

        let mut series = DailySeries::default();
        for observation in sorted {
            series.push(observation);
        }
        series
    }

    fn monthly_series(&self, observations: &[WeatherObservation]) -> (MonthlySeries, MonthlySeries) {
        let mut months: BTreeMap<MonthKey, MonthAccumulator> = BTreeMap::new();
        for observation in observations {
            let acc = months.entry(MonthKey::from_date(observation.date)).or_default();
            acc.temperature_sum += observation.temperature_c;
            acc.rainfall_sum += observation.rainfall_mm;
            acc.count += 1;
        }

        let mut mean_temp = MonthlySeries::default();
        let mut rainfall = MonthlySeries::default();
        for (month, acc) in months {
            mean_temp.points.push(MonthlyValue {
                month,
                value: round2(acc.temperature_sum / acc.count as f64),
            });
            rainfall.points.push(MonthlyValue {
                month,
                value: round2(acc.rainfall_sum),
            });
        }

        (mean_temp, rainfall)
    }

    /// First observation whose temperature beats every earlier one in the
    /// `wanted` direction. Ties keep the earlier record; NaN never wins.
    fn extreme<'a>(
        &self,
        observations: &'a [WeatherObservation],
        wanted: Ordering,
    ) -> Option<&'a WeatherObservation> {
        observations
            .iter()
            .filter(|o| !o.temperature_c.is_nan())
            .fold(None::<&'a WeatherObservation>, |best, candidate| match best {
                Some(current)
                    if candidate.temperature_c.partial_cmp(&current.temperature_c)
                        != Some(wanted) =>
                {
                    Some(current)
                }
                _ => Some(candidate),
            })
    }
}

impl Default for ObservationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
