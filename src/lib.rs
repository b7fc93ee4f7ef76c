//! Process inventory and termination engine: snapshot the process table
//! with the platform's own tools, group it by executable name, and kill
//! by PID or by name.

pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
pub mod logging;
pub mod system;
pub mod ui;
