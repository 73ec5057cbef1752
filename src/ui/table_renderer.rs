// Pure table rendering: draws a SessionState onto any Canvas
// Nothing here mutates the session or reads from the record source

use unicode_width::UnicodeWidthChar;

use crate::data::column::Column;
use crate::data::column_store::ColumnStore;
use crate::data::record_source::RecordSource;
use crate::ui::canvas::{Canvas, CellRole};
use crate::ui::session::SessionState;

/// Glyph drawn between adjacent columns
pub const DEFAULT_SEPARATOR: char = '|';

/// Stands in for a hidden column's first character when that is wider than one cell
pub const HIDDEN_WIDE_PLACEHOLDER: char = '~';

/// Draw the whole screen and flush it
pub fn render_table<S: RecordSource, C: Canvas>(
    canvas: &mut C,
    state: &SessionState,
    store: &ColumnStore<S>,
    separator: char,
) -> anyhow::Result<()> {
    canvas.clear();
    let (width, _) = canvas.size();
    let width = width as usize;

    let header_lines = state.header_height();
    let first_row = state.cursor_row;
    let last_row = (first_row + state.body_height()).min(store.row_count());
    let body_lines = last_row.saturating_sub(first_row);
    let used_lines = header_lines + body_lines;

    for (index, offset) in state.visible().iter() {
        let Some(column) = store.column(index) else {
            continue;
        };

        if offset > 0 {
            for y in 0..used_lines {
                put_char(canvas, offset - 1, y, separator, width, CellRole::Default);
            }
        }

        if state.header_visible {
            draw_cell(canvas, column, column.header(), offset, 0, width, CellRole::HeaderEmphasis);
        }

        let role = if index == state.cursor_column {
            CellRole::SelectedColumn
        } else {
            CellRole::Default
        };
        for (line, position) in (first_row..last_row).enumerate() {
            let row = state.display_row(position);
            if let Some(value) = column.render(row) {
                draw_cell(canvas, column, &value, offset, header_lines + line, width, role);
            }
        }
    }

    if state.status_height() > 0 {
        let (_, height) = canvas.size();
        let status = status_line(state, store);
        draw_text(canvas, &status, 0, height as usize - 1, width, CellRole::Default);
    }

    canvas.flush()
}

/// Text shown on the bottom line
pub fn status_line<S: RecordSource>(state: &SessionState, store: &ColumnStore<S>) -> String {
    if let Some(message) = &state.status_message {
        return message.clone();
    }

    let rows = store.row_count();
    let row = if rows == 0 { 0 } else { state.cursor_row + 1 };
    let more = if store.is_exhausted() { "" } else { "+" };
    let mut status = format!("row {}/{}{}", row, rows, more);

    // Sort state stays ahead of the column details
    if let Some(sort) = &state.sort {
        let header = store.column(sort.column).map(|c| c.header().trim()).unwrap_or("");
        status.push_str(&format!(
            "  sorted by {} {}",
            header,
            sort.direction.display_name()
        ));
    }
    if let Some(column) = store.column(state.cursor_column) {
        status.push_str(&format!(
            "  col {}/{} {} [{}]",
            state.cursor_column + 1,
            store.column_count(),
            column.header().trim(),
            column.kind().short_name()
        ));
    }
    status
}

/// Draw one cell value; hidden columns show only their first character,
/// never more than one cell wide
fn draw_cell<C: Canvas>(
    canvas: &mut C,
    column: &Column,
    text: &str,
    x: usize,
    y: usize,
    max_x: usize,
    role: CellRole,
) {
    if column.is_hidden() {
        if let Some(ch) = text.chars().next() {
            let ch = if ch.width() == Some(1) {
                ch
            } else {
                HIDDEN_WIDE_PLACEHOLDER
            };
            put_char(canvas, x, y, ch, max_x, role);
        }
    } else {
        draw_text(canvas, text, x, y, max_x, role);
    }
}

/// Draw text from `x`, clipping at `max_x`
fn draw_text<C: Canvas>(canvas: &mut C, text: &str, x: usize, y: usize, max_x: usize, role: CellRole) {
    let mut x = x;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if w == 0 {
            continue;
        }
        if x + w > max_x {
            break;
        }
        put_char(canvas, x, y, ch, max_x, role);
        x += w;
    }
}

fn put_char<C: Canvas>(canvas: &mut C, x: usize, y: usize, ch: char, max_x: usize, role: CellRole) {
    if x >= max_x {
        return;
    }
    if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) {
        canvas.set_cell(x, y, ch, role);
    }
}
