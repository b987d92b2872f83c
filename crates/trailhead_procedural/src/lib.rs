//! # TRAILHEAD Procedural Terrain
//!
//! Deterministic elevation for a winding hiking trail through hills.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same terrain
//! 2. **Stateless queries**: Elevation is a pure function of `(x, z)`, never
//!    a stored table
//! 3. **One oracle**: Mesh, normals, scatter and the path ribbon all read the
//!    same `height_at`, so nothing floats or sinks
//! 4. **Shareable**: A built [`World`] is immutable and `Send + Sync`
//!
//! ## Core Components
//!
//! - `SeededRng` / `NoiseField`: Mulberry32 stream and seeded simplex noise
//! - `FractalParams`: FBM and ridged multifractal composition
//! - `PathCurve`: the trail centerline, a sum of sinusoids plus meander
//! - `HeightField`: blends wild terrain into a flattened trail bed
//! - `World`: the query facade (`height_at`, `path_center_at`, `normal_at`,
//!   `min_height_in_footprint`)
//! - `TerrainMesh`, `PathRibbon`, `scatter`: CPU-side consumers
//! - `HeightTileCache`: optional lattice memoization
//!
//! ## Example
//!
//! ```rust
//! use trailhead_procedural::{World, WorldConfig};
//!
//! let world = World::new(WorldConfig::with_seed(12345)).expect("valid config");
//!
//! let z = 50.0;
//! let trail_x = world.path_center_at(z);
//! let ground = world.height_at(trail_x, z);
//! let up = world.normal_at(trail_x, z);
//!
//! assert!(ground.is_finite());
//! assert!(up.y > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod fractal;
pub mod height;
pub mod math;
pub mod mesh;
pub mod noise;
pub mod path;
pub mod ribbon;
pub mod scatter;
pub mod surface;
pub mod tiles;
pub mod world;

pub use config::WorldConfig;
pub use error::{TerrainError, TerrainResult};
pub use fractal::FractalParams;
pub use height::{HeightField, HeightSample, PathProfile, TerrainConfig, TrailConfig, SENTINEL_HEIGHT};
pub use math::Vec3;
pub use mesh::{LatticeHeights, TerrainGrid, TerrainMesh, TerrainVertex};
pub use noise::{NoiseField, SeededRng, WorldSeed};
pub use path::{PathCurve, PathWave};
pub use ribbon::{PathRibbon, RibbonSpec};
pub use scatter::{region_seed, scatter, Placement, RejectionSampler, Rgb, ScatterBounds, ScatterRule};
pub use surface::NORMAL_EPSILON;
pub use tiles::{HeightTileCache, TileCoord};
pub use world::World;
