//! Input/output helpers.
//!
//! - CSV ingest + schema check (`ingest`)
//! - prepared-series exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
