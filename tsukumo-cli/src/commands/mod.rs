//! CLI command implementations.

pub mod config;
pub mod packages;
pub mod serve;
