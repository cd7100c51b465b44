//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the data banks an indicator can be requested from (`DataBank`)
//! - observation periods (`Period`) and `(period, value)` pairs (`Observation`)
//! - the flattened response table (`IndicatorTable`, `IndicatorRow`)

pub mod types;

pub use types::*;
