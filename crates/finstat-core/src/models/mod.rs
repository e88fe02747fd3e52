//! Data models shared across extraction, analysis and the CLI.

pub mod config;
pub mod field;
pub mod financials;
pub mod mapping;
