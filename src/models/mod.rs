pub mod dashboard;
pub mod derived;
pub mod filter;
pub mod month_key;
pub mod observation;
pub mod raw_row;

pub use dashboard::DashboardPayload;
pub use derived::{DailySeries, DerivedStats, MonthlySeries, MonthlyValue};
pub use filter::ObservationFilter;
pub use month_key::MonthKey;
pub use observation::{normalize_city, WeatherObservation};
pub use raw_row::RawRow;
