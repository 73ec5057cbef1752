//! Record sources feeding the column store
use crate::data::error::ReadError;
use std::collections::VecDeque;
use std::io::Read;

/// Yields one record (row of raw fields) at a time.
///
/// `Ok(None)` signals end of input; it is not an error and may be returned
/// repeatedly.
pub trait RecordSource {
    fn read_record(&mut self) -> Result<Option<Vec<String>>, ReadError>;
}

/// Delimiter and whitespace options for [`CsvRecordSource`]
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub trim_leading_space: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim_leading_space: true,
        }
    }
}

/// Record source backed by the `csv` crate
pub struct CsvRecordSource<R: Read> {
    reader: csv::Reader<R>,
    record: csv::StringRecord,
    exhausted: bool,
}

impl<R: Read> CsvRecordSource<R> {
    pub fn new(input: R, options: CsvOptions) -> Self {
        let trim = if options.trim_leading_space {
            csv::Trim::Fields
        } else {
            csv::Trim::None
        };
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(options.delimiter)
            .trim(trim)
            .flexible(false)
            .from_reader(input);
        Self {
            reader,
            record: csv::StringRecord::new(),
            exhausted: false,
        }
    }
}

impl<R: Read> RecordSource for CsvRecordSource<R> {
    fn read_record(&mut self) -> Result<Option<Vec<String>>, ReadError> {
        if self.exhausted {
            return Ok(None);
        }
        if self.reader.read_record(&mut self.record)? {
            Ok(Some(self.record.iter().map(str::to_string).collect()))
        } else {
            self.exhausted = true;
            Ok(None)
        }
    }
}

/// In-memory source, mainly for tests and benchmarks
#[derive(Debug, Default, Clone)]
pub struct VecRecordSource {
    records: VecDeque<Vec<String>>,
}

impl VecRecordSource {
    pub fn new<I, R, S>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            records: records
                .into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl RecordSource for VecRecordSource {
    fn read_record(&mut self) -> Result<Option<Vec<String>>, ReadError> {
        Ok(self.records.pop_front())
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn read_record(&mut self) -> Result<Option<Vec<String>>, ReadError> {
        (**self).read_record()
    }
}
