//! Terminal output for fetched tables and calculation results.
//!
//! Formatting lives here so the client and calculators stay free of
//! presentation concerns.

pub mod format;

pub use format::*;
