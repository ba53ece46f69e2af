//! `sales-chart` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - the series preparation is testable without spawning processes
//! - the chart can be rendered from other tools (notebooks, batch jobs)

pub mod app;
pub mod chart;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod series;
