use crate::data::error::ConversionError;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use unicode_width::UnicodeWidthStr;

/// Placeholder stored for empty cells so no column ever renders zero-width
pub const EMPTY_CELL: &str = " ";

/// Discriminant of the value representation held by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Text,
    Integer,
}

impl ColumnKind {
    pub fn short_name(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Integer => "int",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Integer => write!(f, "integer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    /// Collapsed to a single character cell
    Hidden,
}

impl Visibility {
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Visible => Visibility::Hidden,
            Visibility::Hidden => Visibility::Visible,
        }
    }
}

/// Typed cell storage, one entry per row in insertion order
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Text(Vec<String>),
    Integer(Vec<i64>),
}

impl ColumnValues {
    fn empty(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Text => ColumnValues::Text(Vec::new()),
            ColumnKind::Integer => ColumnValues::Integer(Vec::new()),
        }
    }

    fn len(&self) -> usize {
        match self {
            ColumnValues::Text(v) => v.len(),
            ColumnValues::Integer(v) => v.len(),
        }
    }
}

/// Trim surrounding whitespace, substituting the placeholder for empty cells
pub fn normalize_cell(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        EMPTY_CELL
    } else {
        trimmed
    }
}

/// Number of terminal cells a rendered value occupies
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// One table column: header, display metadata and typed values
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    header: String,
    width: usize,
    visibility: Visibility,
    values: ColumnValues,
}

impl Column {
    /// Create an empty text column sized to its header
    pub fn text(header: impl Into<String>) -> Self {
        let header = header.into();
        Self {
            width: display_width(&header),
            header,
            visibility: Visibility::Visible,
            values: ColumnValues::empty(ColumnKind::Text),
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_hidden(&self) -> bool {
        self.visibility == Visibility::Hidden
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn toggle_visibility(&mut self) {
        self.visibility = self.visibility.toggled();
    }

    pub fn kind(&self) -> ColumnKind {
        match self.values {
            ColumnValues::Text(_) => ColumnKind::Text,
            ColumnValues::Integer(_) => ColumnKind::Integer,
        }
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that `raw` would be accepted by [`Column::append`] without storing it
    pub fn validate(&self, raw: &str) -> Result<(), ConversionError> {
        match self.values {
            ColumnValues::Text(_) => Ok(()),
            ColumnValues::Integer(_) => self
                .parse_integer(normalize_cell(raw), self.len())
                .map(|_| ()),
        }
    }

    /// Append one cell. On failure the column is left untouched.
    pub fn append(&mut self, raw: &str) -> Result<(), ConversionError> {
        let cell = normalize_cell(raw);
        let rendered_width = match self.values {
            ColumnValues::Text(ref mut values) => {
                values.push(cell.to_string());
                display_width(cell)
            }
            ColumnValues::Integer(_) => {
                let number = self.parse_integer(cell, self.len())?;
                if let ColumnValues::Integer(ref mut values) = self.values {
                    values.push(number);
                }
                display_width(&number.to_string())
            }
        };
        self.width = self.width.max(rendered_width);
        Ok(())
    }

    /// Text form of the value at `row`
    pub fn render(&self, row: usize) -> Option<Cow<'_, str>> {
        match &self.values {
            ColumnValues::Text(values) => values.get(row).map(|s| Cow::Borrowed(s.as_str())),
            ColumnValues::Integer(values) => values.get(row).map(|n| Cow::Owned(n.to_string())),
        }
    }

    /// Permutation of `0..len()` ordering rows by value.
    ///
    /// The sort is stable in both directions, so equal values keep their
    /// insertion order.
    pub fn sorted_order(&self, ascending: bool) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        match &self.values {
            ColumnValues::Text(values) => {
                order.sort_by(|&a, &b| directed(values[a].cmp(&values[b]), ascending))
            }
            ColumnValues::Integer(values) => {
                order.sort_by(|&a, &b| directed(values[a].cmp(&values[b]), ascending))
            }
        }
        order
    }

    /// Build a copy of this column holding values of `kind`.
    ///
    /// Header, width and visibility carry over. Fails without side effects
    /// on the first value that does not parse.
    pub fn convert_to(&self, kind: ColumnKind) -> Result<Column, ConversionError> {
        let values = match kind {
            ColumnKind::Text => ColumnValues::Text(
                (0..self.len())
                    .filter_map(|row| self.render(row).map(Cow::into_owned))
                    .collect(),
            ),
            ColumnKind::Integer => match &self.values {
                ColumnValues::Integer(values) => ColumnValues::Integer(values.clone()),
                ColumnValues::Text(values) => ColumnValues::Integer(
                    values
                        .iter()
                        .enumerate()
                        .map(|(row, value)| self.parse_integer(value, row))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
            },
        };

        let mut converted = Column {
            header: self.header.clone(),
            width: self.width,
            visibility: self.visibility,
            values,
        };
        for row in 0..converted.len() {
            if let Some(rendered) = converted.render(row) {
                let w = display_width(&rendered);
                converted.width = converted.width.max(w);
            }
        }
        Ok(converted)
    }

    fn parse_integer(&self, value: &str, row: usize) -> Result<i64, ConversionError> {
        value.parse::<i64>().map_err(|_| ConversionError {
            header: self.header.clone(),
            row,
            value: value.to_string(),
            kind: ColumnKind::Integer,
        })
    }
}

fn directed(ordering: Ordering, ascending: bool) -> Ordering {
    if ascending {
        ordering
    } else {
        ordering.reverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_column(header: &str, values: &[&str]) -> Column {
        let mut column = Column::text(header);
        for v in values {
            column.append(v).unwrap();
        }
        column
    }

    #[test]
    fn test_append_normalizes_cells() {
        let column = text_column("name", &["  alice ", "", "bob"]);
        assert_eq!(column.len(), 3);
        assert_eq!(column.render(0).unwrap(), "alice");
        assert_eq!(column.render(1).unwrap(), " ");
        assert_eq!(column.render(2).unwrap(), "bob");
    }

    #[test]
    fn test_width_tracks_widest_value_and_header() {
        let mut column = text_column("id", &["1"]);
        assert_eq!(column.width(), 2);
        column.append("12345").unwrap();
        assert_eq!(column.width(), 5);
        column.append("7").unwrap();
        assert_eq!(column.width(), 5);
    }

    #[test]
    fn test_wide_characters_count_double() {
        let column = text_column("x", &["日本"]);
        assert_eq!(column.width(), 4);
    }

    #[test]
    fn test_integer_append_rejects_text_atomically() {
        let column = text_column("n", &["1", "2"]);
        let mut ints = column.convert_to(ColumnKind::Integer).unwrap();
        let err = ints.append("abc").unwrap_err();
        assert_eq!(err.row, 2);
        assert_eq!(ints.len(), 2);
        assert!(ints.validate("42").is_ok());
        assert!(ints.validate("4.2").is_err());
    }

    #[test]
    fn test_sorted_order_text_is_codepoint_order() {
        let column = text_column("s", &["b", "B", "a", "ä"]);
        assert_eq!(column.sorted_order(true), vec![1, 2, 0, 3]);
        assert_eq!(column.sorted_order(false), vec![3, 0, 2, 1]);
    }

    #[test]
    fn test_sorted_order_integer_is_numeric() {
        let column = text_column("n", &["10", "9", "-3", "100"])
            .convert_to(ColumnKind::Integer)
            .unwrap();
        assert_eq!(column.sorted_order(true), vec![2, 1, 0, 3]);
        // as text the order would be lexicographic
        let text = column.convert_to(ColumnKind::Text).unwrap();
        assert_eq!(text.sorted_order(true), vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_sorted_order_is_stable_for_duplicates() {
        let column = text_column("k", &["x", "a", "x", "a"]);
        assert_eq!(column.sorted_order(true), vec![1, 3, 0, 2]);
        assert_eq!(column.sorted_order(false), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_convert_failure_leaves_column_unchanged() {
        let column = text_column("v", &["1", "x", "3"]);
        let before = column.clone();
        let err = column.convert_to(ColumnKind::Integer).unwrap_err();
        assert_eq!(err.row, 1);
        assert_eq!(err.value, "x");
        assert_eq!(err.kind, ColumnKind::Integer);
        assert_eq!(column, before);
    }

    #[test]
    fn test_convert_preserves_metadata() {
        let mut column = text_column("count", &["007", "+5", "-2"]);
        column.toggle_visibility();
        let ints = column.convert_to(ColumnKind::Integer).unwrap();
        assert_eq!(ints.kind(), ColumnKind::Integer);
        assert_eq!(ints.header(), "count");
        assert_eq!(ints.width(), 5);
        assert!(ints.is_hidden());

        // leading zeros and explicit plus signs do not survive the round trip
        let back = ints.convert_to(ColumnKind::Text).unwrap();
        assert_eq!(back.render(0).unwrap(), "7");
        assert_eq!(back.render(1).unwrap(), "5");
        assert_eq!(back.render(2).unwrap(), "-2");
    }

    #[test]
    fn test_visibility_toggle() {
        let mut column = Column::text("a");
        assert_eq!(column.visibility(), Visibility::Visible);
        column.toggle_visibility();
        assert!(column.is_hidden());
        column.toggle_visibility();
        assert!(!column.is_hidden());
    }
}
