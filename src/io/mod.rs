//! Input/output helpers.
//!
//! - indicator table exports (CSV) (`export`)

pub mod export;

pub use export::*;
