//! Schema module - Configuration and genome types for circle evolution.

mod config;
mod genome;

pub use config::*;
pub use genome::*;
