//! `inegi-indicators` library crate.
//!
//! The binary (`inegi`) is a thin wrapper around this library so that:
//!
//! - the compounding and poverty calculations are testable without network access
//! - the HTTP client can be pointed at recorded responses
//! - modules are reusable outside the CLI

pub mod app;
pub mod calc;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
