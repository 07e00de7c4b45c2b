//! mapconf - render configuration for a Minecraft map renderer
//!
//! Loads a two-tier configuration document: a global tier with defaults for
//! worlds and maps, and named world and map sections that override them.
//! Every problem in the document is collected before anything is reported.

pub mod cli;
pub mod config;
pub mod logging;

pub use config::*;

/// Result type alias for mapconf operations
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to mapconf operations
#[derive(thiserror::Error, Debug)]
pub enum MapconfError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Map not found: {0}")]
    MapNotFound(String),
}
