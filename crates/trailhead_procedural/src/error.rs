//! # Terrain Error Types
//!
//! Everything that can fail while configuring a world or building geometry.
//! Oracle queries themselves never fail; see [`crate::height::SENTINEL_HEIGHT`].

use thiserror::Error;

/// Errors that can occur while building a world or its derived geometry.
#[derive(Error, Debug)]
pub enum TerrainError {
    /// The configuration file could not be read.
    #[error("failed to read world config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("failed to parse world config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered back to TOML.
    #[error("failed to serialize world config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A configured constant is outside its legal range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Grid or ribbon parameters cannot produce geometry.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}

/// Result type for terrain operations.
pub type TerrainResult<T> = Result<T, TerrainError>;
