//! Session state and the transition function
//!
//! All cursor, viewport and sort state lives in [`SessionState`]. Each input
//! action is applied by [`handle_action`], which may pull more rows from the
//! store but never touches a canvas; rendering happens afterwards from the
//! resulting state.
use anyhow::Result;
use tracing::{debug, info, warn};

use crate::data::column::ColumnKind;
use crate::data::column_store::ColumnStore;
use crate::data::record_source::RecordSource;
use crate::ui::actions::{Action, NavigateAction, SortDirection};
use crate::ui::viewport::{scroll_to_cursor, VisibleColumns};

/// Outcome of applying one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Continue,
    Quit,
}

/// Active row ordering produced by sorting one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
    /// Display slot `i` shows underlying row `order[i]`
    pub order: Vec<usize>,
}

/// Layout options fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub show_status_line: bool,
    /// Rows moved by a half-page jump; `None` means half the screen height
    pub page_rows: Option<usize>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            show_status_line: true,
            page_rows: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub cursor_column: usize,
    /// Display position (in sorted order, if any) of the top body line
    pub cursor_row: usize,
    pub header_visible: bool,
    pub sort: Option<SortState>,
    /// Transient message shown on the status line until the next action
    pub status_message: Option<String>,
    screen_width: u16,
    screen_height: u16,
    visible: VisibleColumns,
    options: SessionOptions,
}

impl SessionState {
    pub fn new(screen_width: u16, screen_height: u16, header_visible: bool) -> Self {
        Self::with_options(
            screen_width,
            screen_height,
            header_visible,
            SessionOptions::default(),
        )
    }

    pub fn with_options(
        screen_width: u16,
        screen_height: u16,
        header_visible: bool,
        options: SessionOptions,
    ) -> Self {
        Self {
            cursor_column: 0,
            cursor_row: 0,
            header_visible,
            sort: None,
            status_message: None,
            screen_width,
            screen_height,
            visible: scroll_to_cursor(&[], 0, 0, screen_width as usize),
            options,
        }
    }

    pub fn screen_size(&self) -> (u16, u16) {
        (self.screen_width, self.screen_height)
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Columns on screen as of the last refresh
    pub fn visible(&self) -> &VisibleColumns {
        &self.visible
    }

    pub fn window_begin(&self) -> usize {
        self.visible.begin()
    }

    pub fn window_end(&self) -> usize {
        self.visible.end()
    }

    pub fn header_height(&self) -> usize {
        usize::from(self.header_visible)
    }

    pub fn status_height(&self) -> usize {
        usize::from(self.options.show_status_line && self.screen_height > 1)
    }

    /// Screen lines available for data rows
    pub fn body_height(&self) -> usize {
        (self.screen_height as usize).saturating_sub(self.header_height() + self.status_height())
    }

    /// Map a display position to the underlying row index
    pub fn display_row(&self, position: usize) -> usize {
        match &self.sort {
            Some(sort) => sort.order.get(position).copied().unwrap_or(position),
            None => position,
        }
    }

    fn page_rows(&self) -> usize {
        self.options
            .page_rows
            .unwrap_or(self.screen_height as usize / 2)
            .max(1)
    }

    fn page_columns(&self) -> usize {
        (self.visible.len() / 2).max(1)
    }

    /// Clamp the cursor, load enough rows to fill the body and recompute the
    /// visible columns. Run after every transition.
    pub fn refresh<S: RecordSource>(&mut self, store: &mut ColumnStore<S>) -> Result<()> {
        self.clamp_cursor(store);

        let wanted = self.cursor_row + self.body_height();
        if wanted > store.row_count() {
            store.feed_rows(wanted - store.row_count())?;
        }

        self.visible = scroll_to_cursor(
            store.columns(),
            self.visible.begin(),
            self.cursor_column,
            self.screen_width as usize,
        );
        Ok(())
    }

    fn clamp_cursor<S: RecordSource>(&mut self, store: &ColumnStore<S>) {
        self.cursor_column = self
            .cursor_column
            .min(store.column_count().saturating_sub(1));
        self.cursor_row = self.cursor_row.min(store.row_count().saturating_sub(1));
    }

    fn move_column<S: RecordSource>(&mut self, store: &ColumnStore<S>, delta: isize) {
        let last = store.column_count().saturating_sub(1);
        self.cursor_column = self.cursor_column.saturating_add_signed(delta).min(last);
    }

    fn move_row<S: RecordSource>(
        &mut self,
        store: &mut ColumnStore<S>,
        delta: isize,
    ) -> Result<()> {
        let target = self.cursor_row.saturating_add_signed(delta);
        if target >= store.row_count() {
            store.feed_rows((target - store.row_count()).saturating_add(1))?;
        }
        self.cursor_row = target.min(store.row_count().saturating_sub(1));
        Ok(())
    }
}

/// Apply one action to the session, then refresh derived state
pub fn handle_action<S: RecordSource>(
    state: &mut SessionState,
    store: &mut ColumnStore<S>,
    action: Action,
) -> Result<Transition> {
    debug!(target: "session", "Action: {:?}", action);
    if action.needs_full_input() && !store.is_exhausted() {
        info!(target: "session", "{:?} reads the remaining input", action);
    }
    state.status_message = None;

    match action {
        Action::Navigate(nav) => navigate(state, store, nav)?,
        Action::ToggleColumnVisibility => {
            if let Some(column) = store.column_mut(state.cursor_column) {
                column.toggle_visibility();
            }
        }
        Action::FeedAll => {
            let read = store.feed_all()?;
            state.status_message = Some(format!(
                "Loaded {} more rows ({} total)",
                read,
                store.row_count()
            ));
        }
        Action::ConvertColumnToInteger => {
            store.feed_all()?;
            if let Err(e) = store.convert_column(state.cursor_column, ColumnKind::Integer) {
                warn!(target: "session", "Integer conversion failed: {}", e);
                state.status_message = Some(e.to_string());
            }
        }
        Action::ConvertAllToText => {
            store.feed_all()?;
            for index in 0..store.column_count() {
                store.convert_column(index, ColumnKind::Text)?;
            }
            state.sort = None;
        }
        Action::Sort(direction) => {
            store.feed_all()?;
            if let Some(column) = store.column(state.cursor_column) {
                let order = column.sorted_order(direction.is_ascending());
                info!(target: "session",
                      "Sorted {} rows by column {} ({})",
                      order.len(), state.cursor_column, direction.display_name());
                state.sort = Some(SortState {
                    column: state.cursor_column,
                    direction,
                    order,
                });
            }
        }
        Action::ToggleHeader => state.header_visible = !state.header_visible,
        Action::Resize(width, height) => {
            state.screen_width = width;
            state.screen_height = height;
        }
        Action::Quit => return Ok(Transition::Quit),
    }

    state.refresh(store)?;
    Ok(Transition::Continue)
}

fn navigate<S: RecordSource>(
    state: &mut SessionState,
    store: &mut ColumnStore<S>,
    nav: NavigateAction,
) -> Result<()> {
    match nav {
        NavigateAction::Left(n) => state.move_column(store, backward(n)),
        NavigateAction::Right(n) => state.move_column(store, forward(n)),
        NavigateAction::PageLeft => state.move_column(store, backward(state.page_columns())),
        NavigateAction::PageRight => state.move_column(store, forward(state.page_columns())),
        NavigateAction::Up(n) => state.move_row(store, backward(n))?,
        NavigateAction::Down(n) => state.move_row(store, forward(n))?,
        NavigateAction::PageUp => state.move_row(store, backward(state.page_rows()))?,
        NavigateAction::PageDown => state.move_row(store, forward(state.page_rows()))?,
        NavigateAction::FirstRow => state.cursor_row = 0,
        NavigateAction::LastRow => {
            store.feed_all()?;
            state.cursor_row = store.row_count().saturating_sub(1);
        }
    }
    Ok(())
}

/// Signed delta for a move of `n` toward higher indices, saturating
fn forward(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

fn backward(n: usize) -> isize {
    forward(n).saturating_neg()
}
