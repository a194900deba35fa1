//! Terminal front end for the mission monitor.
mod app;
mod config;
mod ui;

pub use app::run_app;
