//! Command handlers and terminal rendering

pub mod convert;
pub mod setup;
pub mod ui;
