use crate::error::Result;
use crate::models::{RawRow, WeatherObservation};
use crate::processors::row_builder::{build_observation, RowPolicy, RowRejection};
use crate::readers::{CsvRowReader, UploadReader};
use crate::utils::constants::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE};
use crate::utils::progress::ProgressReporter;
use crate::writers::SqliteStore;
use std::path::Path;

/// A data row (0-based, header excluded) left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub index: usize,
    pub reason: RowRejection,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub total_rows: usize,
    pub inserted: usize,
    pub skipped: Vec<SkippedRow>,
    pub truncated: bool,
}

impl IngestReport {
    pub fn rejected(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inserted == 0
    }

    pub fn summary(&self) -> String {
        let mut summary = format!("Loaded {} records.", self.inserted);
        if !self.skipped.is_empty() {
            summary.push_str(&format!(
                " Skipped {} of {} rows.",
                self.skipped.len(),
                self.total_rows
            ));
        }
        summary
    }

    /// Lines printed after a command-line load: the summary, then up to
    /// `max_listed` skipped rows with their reasons.
    pub fn report_lines(&self, max_listed: usize) -> Vec<String> {
        let mut lines = vec![self.summary()];
        lines.extend(
            self.skipped
                .iter()
                .take(max_listed)
                .map(|s| format!("  row {}: {}", s.index, s.reason)),
        );
        if self.skipped.len() > max_listed {
            lines.push(format!("  ... and {} more", self.skipped.len() - max_listed));
        }
        lines
    }
}

/// Result of the upload entry point. An upload with no usable rows is a
/// successful-but-empty outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Imported { count: usize },
    NoValidRows,
}

impl UploadOutcome {
    pub fn message(&self) -> String {
        match self {
            UploadOutcome::Imported { count } => format!("Imported {} records.", count),
            UploadOutcome::NoValidRows => "No valid rows found in CSV.".to_string(),
        }
    }

    pub fn inserted(&self) -> usize {
        match self {
            UploadOutcome::Imported { count } => *count,
            UploadOutcome::NoValidRows => 0,
        }
    }
}

/// Turns raw CSV rows into observations and bulk-persists them.
#[derive(Debug, Clone, Copy)]
pub struct Ingestor {
    batch_size: usize,
    policy: RowPolicy,
}

impl Ingestor {
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            policy: RowPolicy::default(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    pub fn with_row_policy(mut self, policy: RowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Build observations from a row source. Rejected rows are collected,
    /// never raised.
    pub fn build_observations<I>(&self, rows: I) -> (Vec<WeatherObservation>, Vec<SkippedRow>)
    where
        I: IntoIterator<Item = std::result::Result<RawRow, RowRejection>>,
    {
        let mut observations = Vec::new();
        let mut skipped = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            match row.and_then(|raw| build_observation(&raw, self.policy)) {
                Ok(observation) => observations.push(observation),
                Err(reason) => {
                    tracing::debug!("Skipping row {}: {}", index, reason);
                    skipped.push(SkippedRow { index, reason });
                }
            }
        }

        (observations, skipped)
    }

    /// Core ingestion contract: build every row, then insert the survivors in
    /// one transaction, deleting existing observations first when `truncate`
    /// is set.
    pub fn ingest<I>(&self, store: &mut SqliteStore, rows: I, truncate: bool) -> Result<IngestReport>
    where
        I: IntoIterator<Item = std::result::Result<RawRow, RowRejection>>,
    {
        let (observations, skipped) = self.build_observations(rows);
        self.persist(store, observations, skipped, truncate)
    }

    /// Command-line entry point: tolerant of bad rows, fails only when the
    /// file itself cannot be opened or read.
    pub fn load_file(
        &self,
        store: &mut SqliteStore,
        path: &Path,
        truncate: bool,
        progress: Option<&ProgressReporter>,
    ) -> Result<IngestReport> {
        if let Some(p) = progress {
            p.set_message(&format!("Reading {}...", path.display()));
        }

        let mut rows = CsvRowReader::new().open(path)?;
        let (observations, skipped) = self
            .with_row_policy(RowPolicy::Lenient)
            .build_observations(rows.by_ref());
        rows.finish()?;

        if let Some(p) = progress {
            p.set_message(&format!("Writing {} observations...", observations.len()));
        }

        let report = self.persist(store, observations, skipped, truncate)?;

        if let Some(p) = progress {
            p.finish_with_message(&format!("Finished {}", path.display()));
        }

        Ok(report)
    }

    /// Upload entry point: the whole input must parse before anything is
    /// built; per-row failures are then tolerated. Never truncates.
    pub fn import_upload(&self, store: &mut SqliteStore, bytes: &[u8]) -> Result<UploadOutcome> {
        let rows = UploadReader::new().parse(bytes)?;
        let (observations, skipped) = self
            .with_row_policy(RowPolicy::RequireCityColumn)
            .build_observations(rows.into_iter().map(Ok));

        if observations.is_empty() {
            tracing::warn!(
                "Upload contained no valid rows ({} rejected)",
                skipped.len()
            );
            return Ok(UploadOutcome::NoValidRows);
        }

        let report = self.persist(store, observations, skipped, false)?;
        Ok(UploadOutcome::Imported {
            count: report.inserted,
        })
    }

    fn persist(
        &self,
        store: &mut SqliteStore,
        observations: Vec<WeatherObservation>,
        skipped: Vec<SkippedRow>,
        truncate: bool,
    ) -> Result<IngestReport> {
        let inserted = store.insert_observations(&observations, truncate, self.batch_size)?;

        tracing::info!(
            "Ingested {} observations, skipped {} rows{}",
            inserted,
            skipped.len(),
            if truncate { " (store truncated)" } else { "" }
        );

        Ok(IngestReport {
            total_rows: observations.len() + skipped.len(),
            inserted,
            skipped,
            truncated: truncate,
        })
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ObservationFilter;
    use pretty_assertions::assert_eq;

    fn row(pairs: &[(&str, &str)]) -> std::result::Result<RawRow, RowRejection> {
        Ok(pairs.iter().copied().collect())
    }

    fn sample_rows() -> Vec<std::result::Result<RawRow, RowRejection>> {
        vec![
            row(&[("date", "2024-01-10"), ("city", "Paris"), ("temperature_c", "5.0")]),
            row(&[("city", "Paris"), ("temperature_c", "7.0")]),
            row(&[("date", "2024-01-11"), ("city", "Paris"), ("temperature_c", "abc")]),
            Err(RowRejection::Malformed("bad quoting".to_string())),
            row(&[("date", "not-a-date"), ("city", "Oslo")]),
        ]
    }

    #[test]
    fn test_inserted_equals_total_minus_rejected() -> Result<()> {
        let mut store = SqliteStore::in_memory()?;

        let report = Ingestor::new().ingest(&mut store, sample_rows(), false)?;

        assert_eq!(report.total_rows, 5);
        assert_eq!(report.inserted, report.total_rows - report.rejected());
        assert_eq!(report.inserted, 2);
        assert_eq!(store.count()?, 2);

        let indices: Vec<usize> = report.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 3, 4]);
        assert_eq!(report.skipped[0].reason, RowRejection::MissingDate);

        Ok(())
    }

    #[test]
    fn test_numeric_failure_is_inserted_as_zero() -> Result<()> {
        let mut store = SqliteStore::in_memory()?;

        Ingestor::new().ingest(&mut store, sample_rows(), false)?;

        let stored = store.query(&ObservationFilter::new())?;
        assert_eq!(stored[1].date.to_string(), "2024-01-11");
        assert_eq!(stored[1].temperature_c, 0.0);

        Ok(())
    }

    #[test]
    fn test_truncate_replaces_existing_rows() -> Result<()> {
        let mut store = SqliteStore::in_memory()?;
        let ingestor = Ingestor::new().with_batch_size(1);

        ingestor.ingest(&mut store, sample_rows(), false)?;
        ingestor.ingest(&mut store, sample_rows(), false)?;
        assert_eq!(store.count()?, 4);

        let report = ingestor.ingest(&mut store, sample_rows(), true)?;
        assert!(report.truncated);
        assert_eq!(store.count()?, 2);

        Ok(())
    }

    #[test]
    fn test_upload_with_no_valid_rows() -> Result<()> {
        let mut store = SqliteStore::in_memory()?;
        let data = b"date,city,temperature_c\nnope,Paris,1\n,Oslo,2\n";

        let outcome = Ingestor::new().import_upload(&mut store, data)?;

        assert_eq!(outcome, UploadOutcome::NoValidRows);
        assert_eq!(outcome.message(), "No valid rows found in CSV.");
        assert_eq!(store.count()?, 0);

        Ok(())
    }

    #[test]
    fn test_upload_without_city_column_rejects_every_row() -> Result<()> {
        let mut store = SqliteStore::in_memory()?;
        let data = b"date,temperature_c\n2024-01-10,1\n2024-01-11,2\n";

        let outcome = Ingestor::new().import_upload(&mut store, data)?;

        assert_eq!(outcome, UploadOutcome::NoValidRows);
        Ok(())
    }

    #[test]
    fn test_batch_size_is_clamped() {
        assert_eq!(Ingestor::new().with_batch_size(0).batch_size(), 1);
        assert_eq!(
            Ingestor::new().with_batch_size(usize::MAX).batch_size(),
            MAX_BATCH_SIZE
        );
    }

    #[test]
    fn test_report_summary() {
        let report = IngestReport {
            total_rows: 3,
            inserted: 2,
            skipped: vec![SkippedRow {
                index: 1,
                reason: RowRejection::MissingDate,
            }],
            truncated: false,
        };

        assert_eq!(report.summary(), "Loaded 2 records. Skipped 1 of 3 rows.");
    }

    #[test]
    fn test_report_lines_list_skipped_rows() {
        let report = IngestReport {
            total_rows: 5,
            inserted: 2,
            skipped: vec![
                SkippedRow {
                    index: 1,
                    reason: RowRejection::MissingDate,
                },
                SkippedRow {
                    index: 3,
                    reason: RowRejection::MissingCity,
                },
                SkippedRow {
                    index: 4,
                    reason: RowRejection::InvalidDate("2024-02-30".to_string()),
                },
            ],
            truncated: false,
        };

        let lines = report.report_lines(2);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Loaded 2 records. Skipped 3 of 5 rows.");
        assert_eq!(lines[1], "  row 1: missing date");
        assert_eq!(lines[2], "  row 3: missing city column");
        assert_eq!(lines[3], "  ... and 1 more");
    }

    #[test]
    fn test_report_lines_without_skips() {
        let report = IngestReport {
            total_rows: 4,
            inserted: 4,
            skipped: Vec::new(),
            truncated: true,
        };

        assert_eq!(report.report_lines(10), vec!["Loaded 4 records.".to_string()]);
    }
}
