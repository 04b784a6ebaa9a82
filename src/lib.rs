//! geomancy: dotenv loading and environment checks (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod checks;
pub mod config;
pub mod constants;
pub mod dotenv;
pub mod env;
pub mod logger;
pub mod output;
pub mod paths;
