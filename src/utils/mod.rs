//! Utilities Module
//!
//! Logging and generation configuration shared across the crate.

pub mod config;
pub mod logging;
