pub mod csv_reader;
pub mod upload_reader;

pub use csv_reader::{CsvRowReader, RawRowIterator};
pub use upload_reader::UploadReader;
