//! Derived calculations on top of indicator series.
//!
//! - inflation compounding of a peso amount (`actualization`)
//! - minimum-wage workforce vs. poverty line (`poverty`)

pub mod actualization;
pub mod poverty;

pub use actualization::{Actualization, Compounding, actualize, actualize_amount, compound_factor};
pub use poverty::{PovertyInput, PovertyReport, workforce_poverty};
