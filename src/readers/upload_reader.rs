use crate::error::{ProcessingError, Result};
use crate::models::RawRow;
use crate::utils::constants::COLUMN_DATE;
use csv::{ReaderBuilder, Trim};
use encoding_rs::UTF_8;

/// All-or-nothing parser for uploaded CSV bytes.
///
/// Any structural problem with the input as a whole fails the parse before a
/// single row is built: undecodable bytes, an empty document, a header
/// without a `date` column, a csv syntax error, or a row wider than the
/// header. Rows narrower than the header are padded with empty cells.
pub struct UploadReader;

impl UploadReader {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<Vec<RawRow>> {
        let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
        if had_errors {
            return Err(ProcessingError::WholeFileParse(
                "input is not valid UTF-8".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Err(ProcessingError::WholeFileParse(
                "no columns to parse from file".to_string(),
            ));
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(text.as_bytes());
        let headers = reader.headers().map_err(whole_file)?.clone();

        if !headers.iter().any(|h| h == COLUMN_DATE) {
            return Err(ProcessingError::WholeFileParse(format!(
                "missing required '{}' column",
                COLUMN_DATE
            )));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(whole_file)?;

            if record.len() > headers.len() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(ProcessingError::WholeFileParse(format!(
                    "expected {} fields in line {}, saw {}",
                    headers.len(),
                    line,
                    record.len()
                )));
            }

            let mut row = RawRow::from_record(&headers, &record);
            for name in headers.iter().skip(record.len()) {
                row.insert(name, "");
            }
            rows.push(row);
        }

        tracing::debug!("Parsed {} uploaded rows", rows.len());
        Ok(rows)
    }
}

impl Default for UploadReader {
    fn default() -> Self {
        Self::new()
    }
}

fn whole_file(e: csv::Error) -> ProcessingError {
    ProcessingError::WholeFileParse(e.to_string())
}
