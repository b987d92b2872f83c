//! # World
//!
//! One seeded world: noise tables plus the height field formula, exposing
//! the query surface every consumer uses.
//!
//! ## Initialization barrier
//!
//! Noise tables are built inside [`World::new`]; a `World` value cannot exist
//! before they are complete, so no query can observe a half-built field.
//! Consumers that prefer lazy construction share [`World::shared_default`],
//! which is built exactly once no matter how many threads race to it.
//!
//! ## Example
//!
//! ```rust
//! use trailhead_procedural::{World, WorldConfig};
//!
//! let world = World::new(WorldConfig::default()).expect("default config is valid");
//! let z = 50.0;
//! let on_trail = world.height_at(world.path_center_at(z), z);
//! let normal = world.normal_at(3.0, z);
//! assert!(on_trail.is_finite());
//! assert!((normal.length() - 1.0).abs() < 1e-6);
//! ```

use std::sync::OnceLock;

use crate::config::WorldConfig;
use crate::error::TerrainResult;
use crate::height::{HeightField, HeightSample, PathProfile};
use crate::math::Vec3;
use crate::noise::{NoiseField, SeededRng, WorldSeed};

/// An immutable, seeded world. `Send + Sync`; share it by reference or `Arc`.
#[derive(Clone, Debug)]
pub struct World {
    config: WorldConfig,
    field: NoiseField,
    height: HeightField,
}

impl World {
    /// Validates `config` and builds the noise tables.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TerrainError::InvalidConfig`] if any constant is out
    /// of range.
    pub fn new(config: WorldConfig) -> TerrainResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        let field = NoiseField::new(config.seed);
        let height = HeightField::new(
            config.terrain.clone(),
            config.trail,
            config.path.clone(),
        );

        tracing::debug!(
            seed = config.seed.value(),
            path_bound = config.path.amplitude_bound(),
            relief_bound = config.terrain.amplitude_bound(),
            "world built"
        );

        Self {
            config,
            field,
            height,
        }
    }

    /// Default constants with the given seed.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in defaults; the `Result` mirrors
    /// [`World::new`].
    pub fn from_seed(seed: u32) -> TerrainResult<Self> {
        Self::new(WorldConfig::with_seed(seed))
    }

    /// Process-wide default world, built on first use.
    ///
    /// The default constants are covered by `WorldConfig::validate` tests, so
    /// this skips validation.
    #[must_use]
    pub fn shared_default() -> &'static World {
        static DEFAULT_WORLD: OnceLock<World> = OnceLock::new();
        DEFAULT_WORLD.get_or_init(|| World::build(WorldConfig::default()))
    }

    /// The constants this world was built from.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The world seed.
    #[must_use]
    pub fn seed(&self) -> WorldSeed {
        self.config.seed
    }

    /// The shared noise field.
    #[must_use]
    pub fn noise(&self) -> &NoiseField {
        &self.field
    }

    /// The height field formula.
    #[must_use]
    pub fn height_field(&self) -> &HeightField {
        &self.height
    }

    /// A fresh random stream for `purpose`, independent of the noise tables.
    #[must_use]
    pub fn rng(&self, purpose: u32) -> SeededRng {
        SeededRng::new(self.config.seed.derive(purpose))
    }

    /// Elevation at `(x, z)`.
    #[inline]
    #[must_use]
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        self.height.height_at(&self.field, x, z)
    }

    /// Lateral position of the trail centre at `z`.
    #[inline]
    #[must_use]
    pub fn path_center_at(&self, z: f64) -> f64 {
        self.height.curve().center_at(&self.field, z)
    }

    /// Unit surface normal at `(x, z)`.
    #[inline]
    #[must_use]
    pub fn normal_at(&self, x: f64, z: f64) -> Vec3 {
        self.height.normal_at(&self.field, x, z)
    }

    /// Lowest elevation in a five-point footprint of `radius` around `(x, z)`.
    #[inline]
    #[must_use]
    pub fn min_height_in_footprint(&self, x: f64, z: f64, radius: f64) -> f64 {
        self.height.min_height_in_footprint(&self.field, x, z, radius)
    }

    /// Raw noise in `[-1, 1]`, used by placement for clustering.
    #[inline]
    #[must_use]
    pub fn noise_at(&self, x: f64, z: f64) -> f64 {
        self.field.sample(x, z)
    }

    /// Wild terrain elevation, ignoring the trail.
    #[must_use]
    pub fn wild_height_at(&self, x: f64, z: f64) -> f64 {
        self.height.wild_height(&self.field, x, z)
    }

    /// Path surface elevation, as if `(x, z)` were on the trail.
    #[must_use]
    pub fn path_surface_at(&self, x: f64, z: f64) -> f64 {
        self.height.path_surface_height(&self.field, x, z)
    }

    /// Trail cross-section at `z`.
    #[must_use]
    pub fn path_profile_at(&self, z: f64) -> PathProfile {
        self.height.profile_at(&self.field, z)
    }

    /// Full breakdown of the oracle at `(x, z)`.
    #[must_use]
    pub fn sample(&self, x: f64, z: f64) -> HeightSample {
        self.height.sample(&self.field, x, z)
    }

    /// Unit tangent of the trail centerline at `z`, as `(dx, dz)`.
    #[must_use]
    pub fn path_tangent_at(&self, z: f64) -> (f64, f64) {
        self.height.curve().tangent_at(&self.field, z)
    }
}
