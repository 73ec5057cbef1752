//! Character-cell drawing surfaces
//!
//! The renderer only ever talks to [`Canvas`]. [`BufferCanvas`] keeps cells
//! in a ratatui [`Buffer`] and is what tests draw into; [`TerminalCanvas`]
//! wraps the same buffer and pushes it to the real terminal on flush.
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    Terminal,
};
use std::io::{self, Stdout};
use tracing::{debug, warn};

/// The only styling decisions the table renderer makes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Default,
    HeaderEmphasis,
    SelectedColumn,
}

/// Colors assigned to each [`CellRole`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub header: Color,
    pub selected: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            header: Color::Cyan,
            selected: Color::Red,
        }
    }
}

impl Palette {
    pub fn style(&self, role: CellRole) -> Style {
        match role {
            CellRole::Default => Style::default(),
            CellRole::HeaderEmphasis => Style::default()
                .fg(self.header)
                .add_modifier(Modifier::BOLD),
            CellRole::SelectedColumn => Style::default().fg(self.selected),
        }
    }
}

/// A grid of character cells addressed from the top-left corner
pub trait Canvas {
    /// `(width, height)` in cells
    fn size(&self) -> (u16, u16);

    fn clear(&mut self);

    /// Change the dimensions; contents are discarded
    fn resize(&mut self, width: u16, height: u16);

    /// Out-of-bounds writes are ignored
    fn set_cell(&mut self, x: u16, y: u16, ch: char, role: CellRole);

    fn flush(&mut self) -> Result<()>;
}

/// Blocking source of terminal input events
pub trait EventSource {
    fn poll_event(&mut self) -> Result<Event>;
}

/// In-memory canvas backed by a ratatui buffer
#[derive(Debug, Clone)]
pub struct BufferCanvas {
    buffer: Buffer,
    palette: Palette,
}

impl BufferCanvas {
    pub fn new(width: u16, height: u16, palette: Palette) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            palette,
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Symbol stored at a cell, `None` outside the canvas
    pub fn symbol(&self, x: u16, y: u16) -> Option<&str> {
        self.buffer.cell((x, y)).map(|cell| cell.symbol())
    }

    /// Foreground color stored at a cell
    pub fn foreground(&self, x: u16, y: u16) -> Option<Color> {
        self.buffer.cell((x, y)).map(|cell| cell.fg)
    }

    /// Content of one line with trailing blanks removed
    pub fn line(&self, y: u16) -> String {
        let (width, _) = self.size();
        let line: String = (0..width)
            .filter_map(|x| self.symbol(x, y))
            .collect();
        line.trim_end().to_string()
    }
}

impl Canvas for BufferCanvas {
    fn size(&self) -> (u16, u16) {
        (self.buffer.area.width, self.buffer.area.height)
    }

    fn clear(&mut self) {
        self.buffer.reset();
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.buffer.resize(Rect::new(0, 0, width, height));
        self.buffer.reset();
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, role: CellRole) {
        let style = self.palette.style(role);
        if let Some(cell) = self.buffer.cell_mut((x, y)) {
            cell.set_char(ch).set_style(style);
        }
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Canvas drawing to the controlling terminal through crossterm
pub struct TerminalCanvas {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    canvas: BufferCanvas,
    closed: bool,
}

impl TerminalCanvas {
    /// Switch the terminal to raw mode on the alternate screen
    pub fn open(palette: Palette) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => {
                let _ = disable_raw_mode();
                return Err(e).context("Failed to create terminal");
            }
        };
        terminal.hide_cursor()?;

        let size = terminal.size()?;
        debug!(target: "canvas", "Terminal opened at {}x{}", size.width, size.height);
        Ok(Self {
            terminal,
            canvas: BufferCanvas::new(size.width, size.height, palette),
            closed: false,
        })
    }

    /// Restore the terminal. Called automatically on drop.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Canvas for TerminalCanvas {
    fn size(&self) -> (u16, u16) {
        self.canvas.size()
    }

    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn resize(&mut self, width: u16, height: u16) {
        debug!(target: "canvas", "Terminal resized to {}x{}", width, height);
        self.canvas.resize(width, height);
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, role: CellRole) {
        self.canvas.set_cell(x, y, ch, role);
    }

    fn flush(&mut self) -> Result<()> {
        let source = &self.canvas.buffer;
        self.terminal.draw(|frame| {
            let target = frame.buffer_mut();
            let area = target.area.intersection(source.area);
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let (Some(src), Some(dst)) = (source.cell((x, y)), target.cell_mut((x, y))) {
                        *dst = src.clone();
                    }
                }
            }
        })?;
        Ok(())
    }
}

impl Drop for TerminalCanvas {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(target: "canvas", "Failed to restore terminal: {}", e);
        }
    }
}

/// Blocking reader of crossterm events
#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll_event(&mut self) -> Result<Event> {
        Ok(event::read()?)
    }
}
