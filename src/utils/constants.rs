/// CSV column names
pub const COLUMN_DATE: &str = "date";
pub const COLUMN_CITY: &str = "city";
pub const COLUMN_TEMPERATURE: &str = "temperature_c";
pub const COLUMN_HUMIDITY: &str = "humidity";
pub const COLUMN_RAINFALL: &str = "rainfall_mm";

/// Output format for stored and displayed dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage
pub const OBSERVATIONS_TABLE: &str = "weather_observations";
pub const DEFAULT_DATABASE_PATH: &str = "weather.db";

/// Processing defaults
pub const DEFAULT_BATCH_SIZE: usize = 1000;
/// Rows per multi-row INSERT; six bound parameters each must stay under
/// SQLite's 32766 limit.
pub const MAX_BATCH_SIZE: usize = 5_000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Value substituted for missing or unparseable measurements
pub const MEASUREMENT_DEFAULT: f64 = 0.0;

/// Configuration
pub const ENV_PREFIX: &str = "WEATHER";
pub const DEFAULT_LOG_LEVEL: &str = "info";
