//! Per-command presentation layer

pub mod calc;
pub mod chart;
pub mod convert;
pub mod history;
pub mod setup;
pub mod ticker;
pub mod ui;
