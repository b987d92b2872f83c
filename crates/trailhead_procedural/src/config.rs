//! # World Configuration
//!
//! The named scalar constants behind one world, loaded once at startup.
//!
//! Every field has a default, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! seed = 2024
//!
//! [trail]
//! width_base = 6.5
//!
//! [terrain.hills]
//! amplitude = 11.0
//! fractal = { octaves = 5, persistence = 0.5, lacunarity = 2.0, base_frequency = 0.012 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TerrainResult;
use crate::height::{TerrainConfig, TrailConfig};
use crate::noise::WorldSeed;
use crate::path::PathCurve;

/// Every constant that shapes a world.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Sole source of randomness.
    pub seed: WorldSeed,
    /// Off-path terrain layers.
    pub terrain: TerrainConfig,
    /// Trail cross-section.
    pub trail: TrailConfig,
    /// Trail centerline.
    pub path: PathCurve,
}

impl WorldConfig {
    /// Default constants with a different seed.
    #[must_use]
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed: WorldSeed::new(seed),
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TerrainError::Parse`] for malformed TOML and
    /// [`crate::TerrainError::InvalidConfig`] for out-of-range constants.
    pub fn from_toml_str(source: &str) -> TerrainResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TerrainError::Io`] if the file cannot be read, plus
    /// everything [`WorldConfig::from_toml_str`] can return.
    pub fn load(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), seed = config.seed.value(), "loaded world config");
        Ok(config)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TerrainError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> TerrainResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every constant is within its legal range.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TerrainError::InvalidConfig`] describing the first
    /// offending constant.
    pub fn validate(&self) -> TerrainResult<()> {
        self.terrain.validate()?;
        self.trail.validate()?;
        self.path.validate()
    }
}
