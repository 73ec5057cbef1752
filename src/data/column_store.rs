//! Lazily populated column storage
//!
//! The store pulls records from a [`RecordSource`] only when asked to, so an
//! arbitrarily large input is read no further than the user has scrolled.
use crate::data::column::{normalize_cell, Column, ColumnKind, EMPTY_CELL};
use crate::data::error::{ConversionError, ReadError, StoreError};
use crate::data::record_source::RecordSource;
use tracing::{debug, info};

pub struct ColumnStore<S: RecordSource> {
    source: S,
    columns: Vec<Column>,
    /// Records consumed from the source, header included
    records_read: usize,
    exhausted: bool,
}

impl<S: RecordSource> ColumnStore<S> {
    /// Read the first record and build one text column per field.
    ///
    /// With `header_present` the record supplies the headers; otherwise it
    /// becomes the first data row and every header is a blank placeholder.
    pub fn initialize(mut source: S, header_present: bool) -> Result<Self, StoreError> {
        let first = source.read_record()?.ok_or(StoreError::EmptyInput)?;
        if first.is_empty() {
            return Err(StoreError::EmptyInput);
        }

        let store = if header_present {
            let columns = first
                .iter()
                .map(|field| Column::text(normalize_cell(field)))
                .collect();
            Self {
                source,
                columns,
                records_read: 1,
                exhausted: false,
            }
        } else {
            let columns = first.iter().map(|_| Column::text(EMPTY_CELL)).collect();
            let mut store = Self {
                source,
                columns,
                records_read: 0,
                exhausted: false,
            };
            store.append_record(first)?;
            store
        };

        info!(target: "column_store",
              "Initialized {} columns (header_present={})",
              store.columns.len(), header_present);
        Ok(store)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_mut(&mut self, index: usize) -> Option<&mut Column> {
        self.columns.get_mut(index)
    }

    /// Whether the source has reported end of input
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Read up to `n` records, returning how many were appended.
    ///
    /// Running out of input is not an error; the count is simply short.
    pub fn feed_rows(&mut self, n: usize) -> Result<usize, StoreError> {
        let mut read = 0;
        while read < n {
            if !self.feed_one()? {
                break;
            }
            read += 1;
        }
        if read > 0 {
            debug!(target: "column_store",
                   "Fed {} of {} requested rows, {} loaded", read, n, self.row_count());
        }
        Ok(read)
    }

    /// Read every remaining record. Calling it again is a no-op.
    pub fn feed_all(&mut self) -> Result<usize, StoreError> {
        let mut read = 0;
        while self.feed_one()? {
            read += 1;
        }
        if read > 0 {
            info!(target: "column_store",
                  "Fed all remaining rows: {} new, {} loaded", read, self.row_count());
        }
        Ok(read)
    }

    /// Replace the column at `index` with a copy converted to `kind`.
    ///
    /// On failure the existing column is untouched. Returns `Ok(false)` for
    /// an out-of-range index.
    pub fn convert_column(
        &mut self,
        index: usize,
        kind: ColumnKind,
    ) -> Result<bool, ConversionError> {
        let Some(column) = self.columns.get(index) else {
            return Ok(false);
        };
        if column.kind() == kind {
            return Ok(true);
        }
        let converted = column.convert_to(kind)?;
        debug!(target: "column_store",
               "Converted column {} '{}' to {}", index, converted.header(), kind);
        self.columns[index] = converted;
        Ok(true)
    }

    fn feed_one(&mut self) -> Result<bool, StoreError> {
        if self.exhausted {
            return Ok(false);
        }
        match self.source.read_record()? {
            Some(record) => {
                self.append_record(record)?;
                Ok(true)
            }
            None => {
                debug!(target: "column_store",
                       "End of input after {} records", self.records_read);
                self.exhausted = true;
                Ok(false)
            }
        }
    }

    /// Append one record across all columns, or nothing at all
    fn append_record(&mut self, record: Vec<String>) -> Result<(), StoreError> {
        self.records_read += 1;
        if record.len() != self.columns.len() {
            return Err(ReadError::FieldCount {
                record: self.records_read,
                expected: self.columns.len(),
                found: record.len(),
            }
            .into());
        }
        for (column, field) in self.columns.iter().zip(&record) {
            column.validate(field)?;
        }
        for (column, field) in self.columns.iter_mut().zip(&record) {
            column.append(field)?;
        }
        Ok(())
    }
}
