//! Configuration module
//!
//! User settings read from `config.toml`: separator, colors, status line,
//! vim bindings and paging.

pub mod config;
