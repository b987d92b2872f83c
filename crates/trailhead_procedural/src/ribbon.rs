//! # Path Ribbon
//!
//! A thin strip of geometry laid along the trail centerline, used for the
//! trodden-earth decal. Each cross-section sits at `height_at + lift` so the
//! strip never z-fights the terrain underneath.

use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};
use crate::math::Vec3;
use crate::mesh::vertex_normals;
use crate::world::World;

/// Most cross-sections a single ribbon may have.
pub const MAX_RIBBON_SECTIONS: usize = 1 << 20;

/// Parameters for [`PathRibbon::build`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonSpec {
    /// First sample along z.
    pub z_start: f64,
    /// Last sample along z.
    pub z_end: f64,
    /// Distance between cross-sections along z.
    pub step: f64,
    /// Full width of the strip.
    pub width: f64,
    /// Height above the terrain.
    pub lift: f64,
    /// Re-sample the terrain under each edge instead of copying the centre
    /// height. Keeps the strip on the ground across cambered sections.
    pub drape: bool,
}

impl Default for RibbonSpec {
    fn default() -> Self {
        Self {
            z_start: -300.0,
            z_end: 300.0,
            step: 0.5,
            width: 2.0,
            lift: 0.04,
            drape: true,
        }
    }
}

impl RibbonSpec {
    fn validate(&self) -> TerrainResult<usize> {
        let finite = [self.z_start, self.z_end, self.step, self.width, self.lift]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(TerrainError::InvalidGrid(format!("non-finite ribbon spec: {self:?}")));
        }
        if self.z_end <= self.z_start {
            return Err(TerrainError::InvalidGrid(format!(
                "ribbon z range is empty: {} ..= {}",
                self.z_start, self.z_end
            )));
        }
        if self.step <= 0.0 || self.width <= 0.0 {
            return Err(TerrainError::InvalidGrid(
                "ribbon step and width must be positive".to_owned(),
            ));
        }

        let segments = ((self.z_end - self.z_start) / self.step).ceil();
        if segments >= MAX_RIBBON_SECTIONS as f64 {
            return Err(TerrainError::InvalidGrid(format!(
                "ribbon needs {segments} sections, limit is {MAX_RIBBON_SECTIONS}"
            )));
        }
        Ok(segments as usize + 1)
    }
}

/// Ribbon geometry: two vertices (left, right) per cross-section.
#[derive(Clone, Debug)]
pub struct PathRibbon {
    centers: Vec<Vec3>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl PathRibbon {
    /// Samples the centerline and builds the strip.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidGrid`] for an empty or non-finite z
    /// range, a non-positive step or width, or too many sections.
    pub fn build(world: &World, spec: RibbonSpec) -> TerrainResult<Self> {
        let sections = spec.validate()?;

        let centers: Vec<Vec3> = (0..sections)
            .map(|i| {
                // The last section lands exactly on z_end
                let z = (spec.z_start + i as f64 * spec.step).min(spec.z_end);
                let x = world.path_center_at(z);
                Vec3::new(x, world.height_at(x, z) + spec.lift, z)
            })
            .collect();

        let half = spec.width * 0.5;
        let last = sections - 1;
        let mut positions = Vec::with_capacity(sections * 2);
        let mut uvs = Vec::with_capacity(sections * 2);

        for (i, &center) in centers.iter().enumerate() {
            let tangent = if i == 0 {
                centers[1] - center
            } else if i == last {
                center - centers[i - 1]
            } else {
                centers[i + 1] - centers[i - 1]
            };

            // Perpendicular in the ground plane, pointing toward +x
            let side = Vec3::UP.cross(tangent);
            let side = Vec3::new(side.x, 0.0, side.z).normalize_or(Vec3::new(1.0, 0.0, 0.0)) * half;

            let mut left = center - side;
            let mut right = center + side;
            if spec.drape {
                left.y = world.height_at(left.x, left.z) + spec.lift;
                right.y = world.height_at(right.x, right.z) + spec.lift;
            }

            let v = (i as f64 / last as f64) as f32;
            positions.push(left);
            positions.push(right);
            uvs.push([0.0, v]);
            uvs.push([1.0, v]);
        }

        let mut indices = Vec::with_capacity(last * 6);
        for i in 0..last {
            let base = (i * 2) as u32;
            indices.extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
        }

        let normals = vertex_normals(&positions, &indices);

        tracing::debug!(
            sections,
            z_start = spec.z_start,
            z_end = spec.z_end,
            "path ribbon built"
        );

        Ok(Self {
            centers,
            positions,
            normals,
            uvs,
            indices,
        })
    }

    /// Lifted centerline samples, one per cross-section.
    #[must_use]
    pub fn centers(&self) -> &[Vec3] {
        &self.centers
    }

    /// Vertex positions, left then right for each section.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-vertex unit normals.
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Texture coordinates: u across (0 left, 1 right), v along (0 to 1).
    #[must_use]
    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    /// Triangle list, two triangles per segment.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of cross-sections.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.centers.len()
    }
}
