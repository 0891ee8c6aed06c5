//! Command handlers.

pub mod analyze;
pub mod config;
pub mod serve;
