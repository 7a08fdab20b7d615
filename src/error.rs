//! Errors for loading configuration and seed data.
//!
//! Extraction itself never fails; a snippet that yields nothing is simply
//! dropped.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("seed data error: {0}")]
    Seed(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
