use crate::error::Result;
use crate::models::RawRow;
use crate::processors::RowRejection;
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Row-tolerant CSV reader used by the command-line loader.
///
/// Short and long rows are accepted. A record the parser cannot decode is
/// yielded as a rejection and reading carries on; only I/O failures stop the
/// stream (see [`RawRowIterator::finish`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRowReader;

impl CsvRowReader {
    pub fn new() -> Self {
        Self
    }

    pub fn open(&self, path: &Path) -> Result<RawRowIterator<File>> {
        let file = File::open(path)?;
        self.from_reader(file)
    }

    /// Reads the header row eagerly; a header that cannot be read is a
    /// file-level error.
    pub fn from_reader<R: Read>(&self, reader: R) -> Result<RawRowIterator<R>> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .buffer_capacity(DEFAULT_BUFFER_SIZE)
            .from_reader(reader);
        let headers = reader.headers()?.clone();

        Ok(RawRowIterator {
            reader,
            headers,
            record: StringRecord::new(),
            fatal: None,
        })
    }
}

pub struct RawRowIterator<R> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    record: StringRecord,
    fatal: Option<csv::Error>,
}

impl<R: Read> RawRowIterator<R> {
    /// Surface the I/O error that ended the stream early, if any.
    pub fn finish(self) -> Result<()> {
        match self.fatal {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl<R: Read> Iterator for RawRowIterator<R> {
    type Item = std::result::Result<RawRow, RowRejection>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fatal.is_some() {
            return None;
        }

        match self.reader.read_record(&mut self.record) {
            Ok(true) => Some(Ok(RawRow::from_record(&self.headers, &self.record))),
            Ok(false) => None,
            Err(e) if e.is_io_error() => {
                tracing::error!("Stopped reading CSV: {}", e);
                self.fatal = Some(e);
                None
            }
            Err(e) => Some(Err(RowRejection::Malformed(e.to_string()))),
        }
    }
}
