//! Data layer
//!
//! Records are pulled lazily from a [`record_source::RecordSource`] into
//! typed, column-oriented storage owned by [`column_store::ColumnStore`].

pub mod column;
pub mod column_store;
pub mod error;
pub mod record_source;
