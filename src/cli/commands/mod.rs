//! CLI command implementations.

mod config;
mod serve;

pub use config::run_config;
pub use serve::run_serve;
