// Export our modules for use in the binary and tests
pub mod api;
pub mod app;
pub mod charts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod event;
pub mod format;
pub mod telemetry;
pub mod terminal;
pub mod ui;

pub use domain::{Dimension, FilterState};
