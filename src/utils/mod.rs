//! Utility functions and helpers
//!
//! Per-user directories and log setup.

pub mod app_paths;
pub mod logging;
