use crate::error::Result;
use crate::models::{ObservationFilter, WeatherObservation};
use crate::utils::constants::{DATE_FORMAT, MAX_BATCH_SIZE, OBSERVATIONS_TABLE};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

pub const SCHEMA_VERSION: i32 = 1;

const INSERT_COLUMNS: [&str; 6] = [
    "date",
    "city",
    "city_key",
    "temperature_c",
    "humidity",
    "rainfall_mm",
];

/// Default `SQLITE_MAX_VARIABLE_NUMBER` of the bundled SQLite (3.32+).
const MAX_BOUND_PARAMETERS: usize = 32_766;

const _: () = assert!(MAX_BATCH_SIZE * INSERT_COLUMNS.len() <= MAX_BOUND_PARAMETERS);

/// SQLite-backed observation store.
///
/// Rows come back in insertion order, which the aggregation tie-breaks rely
/// on.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Insert all observations in a single transaction, one multi-row
    /// `INSERT` per chunk of `batch_size` rows (capped at `MAX_BATCH_SIZE`).
    /// With `truncate`, existing rows are deleted inside the same
    /// transaction, so a failed insert leaves the previous data intact.
    pub fn insert_observations(
        &mut self,
        observations: &[WeatherObservation],
        truncate: bool,
        batch_size: usize,
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;

        if truncate {
            let deleted = tx.execute(&format!("DELETE FROM {}", OBSERVATIONS_TABLE), [])?;
            tracing::debug!("Truncated {} existing observations", deleted);
        }

        let mut inserted = 0;
        for (batch, chunk) in observations
            .chunks(batch_size.clamp(1, MAX_BATCH_SIZE))
            .enumerate()
        {
            // Full chunks share one cached statement; only the tail differs.
            let mut stmt = tx.prepare_cached(&insert_sql(chunk.len()))?;
            inserted += stmt.execute(params_from_iter(chunk.iter().flat_map(insert_values)))?;
            tracing::debug!("Wrote batch {} ({} rows)", batch + 1, chunk.len());
        }

        tx.commit()?;
        Ok(inserted)
    }

    pub fn truncate(&mut self) -> Result<usize> {
        let deleted = self
            .conn
            .execute(&format!("DELETE FROM {}", OBSERVATIONS_TABLE), [])?;
        Ok(deleted)
    }

    /// Observations matching `filter`, in insertion order.
    pub fn query(&self, filter: &ObservationFilter) -> Result<Vec<WeatherObservation>> {
        let mut sql = format!(
            "SELECT date, city, temperature_c, humidity, rainfall_mm FROM {}",
            OBSERVATIONS_TABLE
        );
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(key) = filter.city_key() {
            clauses.push("city_key = ?");
            values.push(Value::Text(key));
        }
        if let Some(start) = filter.start {
            clauses.push("date >= ?");
            values.push(Value::Text(iso_date(start)));
        }
        if let Some(end) = filter.end {
            clauses.push("date <= ?");
            values.push(Value::Text(iso_date(end)));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok(WeatherObservation {
                date: row.get(0)?,
                city: row.get(1)?,
                temperature_c: row.get(2)?,
                humidity: row.get(3)?,
                rainfall_mm: row.get(4)?,
            })
        })?;

        let observations = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(observations)
    }

    /// Distinct city labels, sorted, for the dashboard city selector.
    pub fn distinct_cities(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT city FROM {} ORDER BY city",
            OBSERVATIONS_TABLE
        ))?;
        let cities = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(cities)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", OBSERVATIONS_TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn info(&self) -> Result<StoreInfo> {
        let info = self.conn.query_row(
            &format!(
                "SELECT COUNT(*), COUNT(DISTINCT city), MIN(date), MAX(date) FROM {}",
                OBSERVATIONS_TABLE
            ),
            [],
            |row| {
                Ok(StoreInfo {
                    total_rows: row.get::<_, i64>(0)? as usize,
                    city_count: row.get::<_, i64>(1)? as usize,
                    first_date: row.get(2)?,
                    last_date: row.get(3)?,
                })
            },
        )?;
        Ok(info)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInfo {
    pub total_rows: usize,
    pub city_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl StoreInfo {
    pub fn summary(&self) -> String {
        let range = match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => format!("{} to {}", first, last),
            _ => "empty".to_string(),
        };

        format!(
            "Observations: {}\nCities: {}\nDate Range: {}",
            self.total_rows, self.city_count, range
        )
    }
}

fn insert_sql(rows: usize) -> String {
    let placeholders = vec!["?"; INSERT_COLUMNS.len()].join(", ");
    let values = vec![format!("({})", placeholders); rows].join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES {}",
        OBSERVATIONS_TABLE,
        INSERT_COLUMNS.join(", "),
        values
    )
}

fn insert_values(obs: &WeatherObservation) -> [Value; 6] {
    [
        Value::Text(iso_date(obs.date)),
        Value::Text(obs.city.clone()),
        Value::Text(obs.city_key()),
        Value::Real(obs.temperature_c),
        Value::Real(obs.humidity),
        Value::Real(obs.rainfall_mm),
    ]
}

fn iso_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let current_version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::debug!(
        "Database schema version: {} (target: {})",
        current_version,
        SCHEMA_VERSION
    );

    if current_version < 1 {
        tracing::info!("Running migration v1: initial schema");
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                city TEXT NOT NULL,
                city_key TEXT NOT NULL,
                temperature_c REAL NOT NULL,
                humidity REAL NOT NULL,
                rainfall_mm REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_city ON {table}(city);
            CREATE INDEX IF NOT EXISTS idx_{table}_city_key ON {table}(city_key);
            PRAGMA user_version = 1;
            "#,
            table = OBSERVATIONS_TABLE
        ))?;
    }

    Ok(())
}
