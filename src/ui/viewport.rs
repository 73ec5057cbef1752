//! Horizontal viewport layout
//!
//! Decides which contiguous run of columns fits in the available terminal
//! width and where each one starts:
//! ColumnStore (column widths + visibility)
//!     → compute_visible_range (offsets for one starting column)
//!         → scroll_to_cursor (moves the start until the cursor fits)
//!             → TableRenderer (cells on screen)
use std::ops::Range;
use tracing::trace;

use crate::data::column::Column;

/// Cells between two adjacent columns, occupied by the separator glyph
pub const SEPARATOR_WIDTH: usize = 1;

/// Width a column occupies on screen: hidden columns collapse to one cell
pub fn effective_width(column: &Column) -> usize {
    if column.is_hidden() {
        1
    } else {
        column.width()
    }
}

/// Result of a layout pass: a half-open column range plus screen offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleColumns {
    begin: usize,
    end: usize,
    /// Offset of each column in `begin..end`, relative to the left edge
    offsets: Vec<usize>,
}

impl VisibleColumns {
    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.begin
    }

    pub fn contains(&self, column: usize) -> bool {
        self.range().contains(&column)
    }

    /// Screen offset of `column`, if it is visible
    pub fn offset(&self, column: usize) -> Option<usize> {
        if self.contains(column) {
            self.offsets.get(column - self.begin).copied()
        } else {
            None
        }
    }

    /// `(column index, offset)` pairs from left to right
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.range().zip(self.offsets.iter().copied())
    }
}

/// Lay out columns starting at `begin` within `available_width` cells.
///
/// `begin` is always shown at offset 0, even if it alone is wider than the
/// available space. Every following column is included while its starting
/// offset is still inside the width; it may be clipped on the right.
pub fn compute_visible_range(
    columns: &[Column],
    begin: usize,
    available_width: usize,
) -> VisibleColumns {
    if columns.is_empty() {
        return VisibleColumns {
            begin: 0,
            end: 0,
            offsets: Vec::new(),
        };
    }

    let begin = begin.min(columns.len() - 1);
    let mut offsets = vec![0];
    let mut end = begin + 1;

    for i in begin + 1..columns.len() {
        let previous = offsets[i - 1 - begin];
        let offset = previous + effective_width(&columns[i - 1]) + SEPARATOR_WIDTH;
        if offset >= available_width {
            break;
        }
        offsets.push(offset);
        end = i + 1;
    }

    VisibleColumns {
        begin,
        end,
        offsets,
    }
}

/// Choose the starting column so that `cursor` lies inside the visible range.
///
/// A cursor left of `begin` becomes the new start; a cursor at or past the
/// end advances the start one column at a time until it fits.
pub fn scroll_to_cursor(
    columns: &[Column],
    begin: usize,
    cursor: usize,
    available_width: usize,
) -> VisibleColumns {
    let cursor = cursor.min(columns.len().saturating_sub(1));
    let mut begin = begin;
    if cursor < begin {
        begin = cursor;
    }

    let mut visible = compute_visible_range(columns, begin, available_width);
    while cursor >= visible.end() && visible.begin() < cursor {
        begin = visible.begin() + 1;
        visible = compute_visible_range(columns, begin, available_width);
    }

    trace!(target: "viewport",
           "cursor={} width={} visible={:?}", cursor, available_width, visible.range());
    visible
}
