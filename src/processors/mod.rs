pub mod ingestor;
pub mod row_builder;

pub use ingestor::{IngestReport, Ingestor, SkippedRow, UploadOutcome};
pub use row_builder::{
    build_observation, coerce_measurement, parse_observation_date, RowPolicy, RowRejection,
};
