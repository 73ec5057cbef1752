//! User interface layer
//!
//! Input mapping, session state, layout and drawing of the table viewer.

pub mod actions;
pub mod app;
pub mod canvas;
pub mod key_mapper;
pub mod session;
pub mod table_renderer;
pub mod viewport;
