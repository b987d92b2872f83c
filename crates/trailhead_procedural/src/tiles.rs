//! # Elevation Tiles
//!
//! Optional memoization of the oracle on a fixed lattice.
//!
//! The lattice vertex `(ix, iz)` sits at world `(ix * spacing, iz * spacing)`.
//! Tiles of `TILE_SIZE x TILE_SIZE` vertices are filled on first touch and
//! kept behind a read-write lock. Only exact lattice vertices are served, so
//! a cached height is bit-identical to [`World::height_at`] at that vertex.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{TerrainError, TerrainResult};
use crate::world::World;

/// Vertices along one tile edge.
pub const TILE_SIZE: usize = 32;

/// Tile coordinate (identifies a tile in the lattice, not a world position).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// X coordinate (in tiles).
    pub x: i64,
    /// Z coordinate (in tiles).
    pub z: i64,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i64, z: i64) -> Self {
        Self { x, z }
    }

    /// Tile owning lattice vertex `(ix, iz)`.
    #[inline]
    #[must_use]
    pub const fn of_vertex(ix: i64, iz: i64) -> Self {
        Self {
            x: ix.div_euclid(TILE_SIZE as i64),
            z: iz.div_euclid(TILE_SIZE as i64),
        }
    }

    /// Chebyshev distance in tiles.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> u64 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }
}

/// Oracle heights for one tile, row-major along z.
#[derive(Debug)]
pub struct HeightTile {
    coord: TileCoord,
    heights: Box<[f64]>,
}

impl HeightTile {
    /// Evaluates the oracle at every vertex of the tile.
    fn generate(world: &World, coord: TileCoord, spacing: f64) -> Self {
        let size = TILE_SIZE as i64;
        let mut heights = Vec::with_capacity(TILE_SIZE * TILE_SIZE);
        for local_z in 0..size {
            let iz = coord.z * size + local_z;
            for local_x in 0..size {
                let ix = coord.x * size + local_x;
                heights.push(world.height_at(lattice_coord(ix, spacing), lattice_coord(iz, spacing)));
            }
        }
        Self {
            coord,
            heights: heights.into_boxed_slice(),
        }
    }

    /// The tile's coordinate.
    #[must_use]
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Height at local vertex `(x, z)`, both in `0..TILE_SIZE`.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, z: usize) -> f64 {
        self.heights[z * TILE_SIZE + x]
    }
}

/// World position of lattice index `i`.
#[inline]
#[must_use]
pub fn lattice_coord(i: i64, spacing: f64) -> f64 {
    i as f64 * spacing
}

/// Thread-safe, lazily filled elevation tiles over one world.
pub struct HeightTileCache {
    world: Arc<World>,
    spacing: f64,
    tiles: RwLock<HashMap<TileCoord, Arc<HeightTile>>>,
}

impl std::fmt::Debug for HeightTileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightTileCache")
            .field("spacing", &self.spacing)
            .field("tiles", &self.tile_count())
            .finish_non_exhaustive()
    }
}

impl HeightTileCache {
    /// Creates an empty cache with the given lattice spacing.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidGrid`] if `spacing` is not a positive,
    /// finite number.
    pub fn new(world: Arc<World>, spacing: f64) -> TerrainResult<Self> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(TerrainError::InvalidGrid(format!(
                "tile spacing must be positive, got {spacing}"
            )));
        }
        Ok(Self {
            world,
            spacing,
            tiles: RwLock::new(HashMap::new()),
        })
    }

    /// Lattice spacing in world units.
    #[must_use]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// The world behind the cache.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Oracle height at lattice vertex `(ix, iz)`.
    #[must_use]
    pub fn vertex_height(&self, ix: i64, iz: i64) -> f64 {
        let coord = TileCoord::of_vertex(ix, iz);
        let tile = self.tile(coord);
        let size = TILE_SIZE as i64;
        tile.get(ix.rem_euclid(size) as usize, iz.rem_euclid(size) as usize)
    }

    /// The tile at `coord`, generating it if needed.
    #[must_use]
    pub fn tile(&self, coord: TileCoord) -> Arc<HeightTile> {
        if let Some(tile) = self.tiles.read().get(&coord) {
            return Arc::clone(tile);
        }

        // Generate outside the lock; a racing thread may do the same work,
        // and whichever inserts first wins
        let generated = Arc::new(HeightTile::generate(&self.world, coord, self.spacing));
        let mut tiles = self.tiles.write();
        let tile = tiles.entry(coord).or_insert_with(|| {
            tracing::debug!(x = coord.x, z = coord.z, "height tile generated");
            generated
        });
        Arc::clone(tile)
    }

    /// Number of resident tiles.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.read().len()
    }

    /// Drops every tile farther than `radius` tiles from `center`. A
    /// negative radius drops everything.
    ///
    /// Returns how many tiles were evicted.
    pub fn evict_outside(&self, center: TileCoord, radius: i64) -> usize {
        let mut tiles = self.tiles.write();
        let before = tiles.len();
        match u64::try_from(radius) {
            Ok(radius) => tiles.retain(|coord, _| coord.distance(center) <= radius),
            Err(_) => tiles.clear(),
        }
        before - tiles.len()
    }

    /// Drops every tile.
    pub fn clear(&self) {
        self.tiles.write().clear();
    }
}
