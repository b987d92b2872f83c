//! # Terrain Mesh
//!
//! Tessellates the oracle over a square grid.
//!
//! Heights are sampled first, one `height_at` per vertex. Normals are then
//! computed in a separate pass from the finished heights: every triangle adds
//! its unnormalized (area-weighted) face normal to its three vertices, and the
//! sums are normalized at the end. This matches what a renderer would compute
//! for the same triangles, so lighting never disagrees with the geometry.
//!
//! Vertex positions are exact lattice points (`index * spacing`), which lets
//! a [`HeightTileCache`] with the same spacing serve them unchanged.

use bytemuck::{Pod, Zeroable};

use crate::error::{TerrainError, TerrainResult};
use crate::math::Vec3;
use crate::tiles::{lattice_coord, HeightTileCache};
use crate::world::World;

/// Upper bound on grid segments per side; keeps indices inside `u32`.
pub const MAX_SEGMENTS: u32 = 4096;

/// Largest lattice index magnitude a grid may touch. Integers up to `2^52`
/// are exact in `f64`, and the margin keeps `origin + segments` in `i64`.
pub const MAX_LATTICE_INDEX: i64 = 1 << 52;

/// Anything that can report the oracle's height at a lattice vertex.
pub trait LatticeHeights: Sync {
    /// Height at lattice vertex `(ix, iz)` for a lattice of `spacing`.
    fn lattice_height(&self, ix: i64, iz: i64, spacing: f64) -> f64;
}

impl LatticeHeights for World {
    #[inline]
    fn lattice_height(&self, ix: i64, iz: i64, spacing: f64) -> f64 {
        self.height_at(lattice_coord(ix, spacing), lattice_coord(iz, spacing))
    }
}

impl LatticeHeights for HeightTileCache {
    fn lattice_height(&self, ix: i64, iz: i64, spacing: f64) -> f64 {
        if spacing.to_bits() == self.spacing().to_bits() {
            self.vertex_height(ix, iz)
        } else {
            self.world().lattice_height(ix, iz, spacing)
        }
    }
}

/// A square, lattice-aligned grid of `(segments + 1)^2` vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainGrid {
    /// Distance between neighbouring vertices.
    pub spacing: f64,
    /// Quads per side.
    pub segments: u32,
    /// Lattice index of the first vertex, `[ix, iz]`.
    pub origin: [i64; 2],
}

impl TerrainGrid {
    /// A grid of side `size` split into `segments` quads, centred as close to
    /// `center` as the lattice allows.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidGrid`] if `size` is not positive and
    /// finite, `center` is non-finite or beyond [`MAX_LATTICE_INDEX`]
    /// lattice steps, or `segments` is outside `1..=MAX_SEGMENTS`.
    pub fn centered(center: [f64; 2], size: f64, segments: u32) -> TerrainResult<Self> {
        if !(size.is_finite() && size > 0.0) {
            return Err(TerrainError::InvalidGrid(format!(
                "grid size must be positive, got {size}"
            )));
        }
        if !(center[0].is_finite() && center[1].is_finite()) {
            return Err(TerrainError::InvalidGrid(format!(
                "grid centre must be finite, got {center:?}"
            )));
        }
        let spacing = size / f64::from(segments.max(1));
        let half = i64::from(segments / 2);
        let snapped = [(center[0] / spacing).round(), (center[1] / spacing).round()];
        if snapped.iter().any(|c| c.abs() > MAX_LATTICE_INDEX as f64) {
            return Err(TerrainError::InvalidGrid(format!(
                "grid centre {center:?} is too far from the origin for spacing {spacing}"
            )));
        }
        let grid = Self {
            spacing,
            segments,
            origin: [snapped[0] as i64 - half, snapped[1] as i64 - half],
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Checks the grid can produce a mesh.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidGrid`] describing the problem.
    pub fn validate(&self) -> TerrainResult<()> {
        if self.segments == 0 || self.segments > MAX_SEGMENTS {
            return Err(TerrainError::InvalidGrid(format!(
                "segments must be in 1..={MAX_SEGMENTS}, got {}",
                self.segments
            )));
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(TerrainError::InvalidGrid(format!(
                "spacing must be positive, got {}",
                self.spacing
            )));
        }
        let span = i64::from(self.segments);
        if self
            .origin
            .iter()
            .any(|&o| !(-MAX_LATTICE_INDEX..=MAX_LATTICE_INDEX - span).contains(&o))
        {
            return Err(TerrainError::InvalidGrid(format!(
                "origin {:?} puts the grid beyond lattice index {MAX_LATTICE_INDEX}",
                self.origin
            )));
        }
        Ok(())
    }

    /// Vertices per side.
    #[inline]
    #[must_use]
    pub fn side(&self) -> usize {
        self.segments as usize + 1
    }

    /// Total vertex count.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.side() * self.side()
    }

    /// Lattice index of vertex `(col, row)`.
    #[inline]
    #[must_use]
    pub fn lattice_index(&self, col: usize, row: usize) -> (i64, i64) {
        (self.origin[0] + col as i64, self.origin[1] + row as i64)
    }

    /// World `(x, z)` of vertex `(col, row)`.
    #[inline]
    #[must_use]
    pub fn position(&self, col: usize, row: usize) -> (f64, f64) {
        let (ix, iz) = self.lattice_index(col, row);
        (lattice_coord(ix, self.spacing), lattice_coord(iz, self.spacing))
    }
}

/// Vertex layout handed to a GPU uploader.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    /// World position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
    /// Texture coordinate, `[0, 1]` across the grid.
    pub uv: [f32; 2],
}

impl TerrainVertex {
    /// Size of a vertex in bytes
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// A tessellated terrain patch.
#[derive(Clone, Debug)]
pub struct TerrainMesh {
    grid: TerrainGrid,
    heights: Vec<f64>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    min_height: f64,
    max_height: f64,
}

impl TerrainMesh {
    /// Samples every grid vertex, then computes normals from the result.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidGrid`] if the grid is invalid.
    pub fn tessellate<H: LatticeHeights + ?Sized>(
        source: &H,
        grid: TerrainGrid,
    ) -> TerrainResult<Self> {
        grid.validate()?;
        let side = grid.side();
        let mut heights = vec![0.0; grid.vertex_count()];
        for (row, band) in heights.chunks_mut(side).enumerate() {
            fill_row(source, &grid, row, band);
        }
        Ok(Self::finish(grid, heights))
    }

    /// Like [`TerrainMesh::tessellate`], with rows sampled on `workers`
    /// scoped threads. The result is identical to the serial version.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidGrid`] if the grid is invalid.
    pub fn tessellate_parallel<H: LatticeHeights + ?Sized>(
        source: &H,
        grid: TerrainGrid,
        workers: usize,
    ) -> TerrainResult<Self> {
        grid.validate()?;
        let side = grid.side();
        let rows_per_worker = side.div_ceil(workers.max(1));
        let mut heights = vec![0.0; grid.vertex_count()];

        std::thread::scope(|scope| {
            for (chunk, band) in heights.chunks_mut(rows_per_worker * side).enumerate() {
                let grid = &grid;
                scope.spawn(move || {
                    let first_row = chunk * rows_per_worker;
                    for (offset, row) in band.chunks_mut(side).enumerate() {
                        fill_row(source, grid, first_row + offset, row);
                    }
                });
            }
        });

        Ok(Self::finish(grid, heights))
    }

    fn finish(grid: TerrainGrid, heights: Vec<f64>) -> Self {
        let side = grid.side();
        let indices = grid_indices(grid.segments as usize);

        let positions: Vec<Vec3> = heights
            .iter()
            .enumerate()
            .map(|(i, &h)| {
                let (x, z) = grid.position(i % side, i / side);
                Vec3::new(x, h, z)
            })
            .collect();
        let normals = vertex_normals(&positions, &indices);

        let (min_height, max_height) = heights
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)));

        tracing::debug!(
            segments = grid.segments,
            vertices = heights.len(),
            min_height,
            max_height,
            "terrain mesh tessellated"
        );

        Self {
            grid,
            heights,
            normals,
            indices,
            min_height,
            max_height,
        }
    }

    /// The grid this mesh covers.
    #[must_use]
    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    /// Heights in row-major order (rows along z).
    #[must_use]
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Per-vertex unit normals.
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Triangle list, two triangles per quad.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Lowest and highest vertex elevation.
    #[must_use]
    pub fn height_bounds(&self) -> (f64, f64) {
        (self.min_height, self.max_height)
    }

    /// World position of vertex `i`.
    #[must_use]
    pub fn position(&self, i: usize) -> Vec3 {
        let side = self.grid.side();
        let (x, z) = self.grid.position(i % side, i / side);
        Vec3::new(x, self.heights[i], z)
    }

    /// Interleaved vertex buffer.
    #[must_use]
    pub fn vertices(&self) -> Vec<TerrainVertex> {
        let side = self.grid.side();
        let span = self.grid.segments as f32;
        (0..self.heights.len())
            .map(|i| TerrainVertex {
                position: self.position(i).to_f32_array(),
                normal: self.normals[i].to_f32_array(),
                uv: [(i % side) as f32 / span, (i / side) as f32 / span],
            })
            .collect()
    }
}

fn fill_row<H: LatticeHeights + ?Sized>(source: &H, grid: &TerrainGrid, row: usize, out: &mut [f64]) {
    for (col, h) in out.iter_mut().enumerate() {
        let (ix, iz) = grid.lattice_index(col, row);
        *h = source.lattice_height(ix, iz, grid.spacing);
    }
}

/// Triangle indices for a `segments x segments` quad grid, wound so face
/// normals point up.
fn grid_indices(segments: usize) -> Vec<u32> {
    let side = segments + 1;
    let mut indices = Vec::with_capacity(segments * segments * 6);
    for row in 0..segments {
        for col in 0..segments {
            let a = (row * side + col) as u32;
            let b = a + 1;
            let c = a + side as u32;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    indices
}

/// Area-weighted vertex normals for an indexed triangle list.
pub(crate) fn vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut sums = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        sums[a] += face;
        sums[b] += face;
        sums[c] += face;
    }
    sums.into_iter().map(|n| n.normalize_or(Vec3::UP)).collect()
}
