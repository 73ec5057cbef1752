// Blocking input loop: poll an event, map it, apply it, redraw

use anyhow::{Context, Result};
use tracing::{debug, info, trace, warn};

use crate::config::config::Config;
use crate::data::column_store::ColumnStore;
use crate::data::record_source::RecordSource;
use crate::ui::actions::Action;
use crate::ui::canvas::{Canvas, CrosstermEvents, EventSource, Palette, TerminalCanvas};
use crate::ui::key_mapper::KeyMapper;
use crate::ui::session::{handle_action, SessionState, Transition};
use crate::ui::table_renderer::render_table;

pub struct App<S: RecordSource> {
    store: ColumnStore<S>,
    state: SessionState,
    key_mapper: KeyMapper,
    palette: Palette,
    separator: char,
}

impl<S: RecordSource> App<S> {
    pub fn new(store: ColumnStore<S>, header_visible: bool, config: &Config) -> Result<Self> {
        Ok(Self {
            store,
            state: SessionState::with_options(0, 0, header_visible, config.session_options()),
            key_mapper: KeyMapper::new(config.keybindings.vim_mode),
            palette: config.palette()?,
            separator: config.display.column_separator,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &ColumnStore<S> {
        &self.store
    }

    /// Run on the real terminal until the user quits
    pub fn run(&mut self) -> Result<()> {
        let mut canvas = TerminalCanvas::open(self.palette)?;
        let res = self.run_with(&mut canvas, &mut CrosstermEvents);

        // Always restore terminal, even on error
        if let Err(e) = canvas.close() {
            warn!(target: "app", "Failed to restore terminal: {}", e);
        }

        res.context("Viewer error")
    }

    /// Run against any canvas and event source
    pub fn run_with<C: Canvas, E: EventSource>(
        &mut self,
        canvas: &mut C,
        events: &mut E,
    ) -> Result<()> {
        let (width, height) = canvas.size();
        handle_action(
            &mut self.state,
            &mut self.store,
            Action::Resize(width, height),
        )?;
        info!(target: "app", "Viewer started at {}x{} with {} columns",
              width, height, self.store.column_count());

        render_table(canvas, &self.state, &self.store, self.separator)?;

        loop {
            let event = events.poll_event()?;
            trace!(target: "app", "Event: {:?}", event);

            let Some(action) = self.key_mapper.map_event(&event) else {
                continue;
            };

            if let Action::Resize(width, height) = action {
                canvas.resize(width, height);
            }

            match handle_action(&mut self.state, &mut self.store, action)? {
                Transition::Quit => {
                    debug!(target: "app", "Quit with {} rows loaded", self.store.row_count());
                    return Ok(());
                }
                Transition::Continue => {
                    render_table(canvas, &self.state, &self.store, self.separator)?;
                }
            }
        }
    }
}
