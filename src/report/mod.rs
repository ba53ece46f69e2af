//! Reporting utilities: run summary and predicted-vs-actual tables.

pub mod format;

pub use format::*;
