//! # Surface Queries
//!
//! Derived queries built from [`HeightField::height_at`]:
//!
//! - [`HeightField::normal_at`]: central-difference surface normal
//! - [`HeightField::min_height_in_footprint`]: conservative grounding height
//!   for volumetric objects

use crate::height::{HeightField, SENTINEL_HEIGHT};
use crate::math::Vec3;
use crate::noise::NoiseField;

/// Half-step of the central difference used for normals, in world units.
pub const NORMAL_EPSILON: f64 = 0.1;

impl HeightField {
    /// Unit surface normal at `(x, z)`, pointing up (+y).
    ///
    /// Four height samples at `+/- NORMAL_EPSILON` along x and z give two
    /// tangents; their cross product is normalized. Non-finite input or a
    /// degenerate cross product yields [`Vec3::UP`].
    #[must_use]
    pub fn normal_at(&self, field: &NoiseField, x: f64, z: f64) -> Vec3 {
        if !(x.is_finite() && z.is_finite()) {
            tracing::trace!(x, z, "non-finite normal query");
            return Vec3::UP;
        }

        let e = NORMAL_EPSILON;
        let left = self.height_at(field, x - e, z);
        let right = self.height_at(field, x + e, z);
        let back = self.height_at(field, x, z - e);
        let front = self.height_at(field, x, z + e);

        let tangent_x = Vec3::new(2.0 * e, right - left, 0.0);
        let tangent_z = Vec3::new(0.0, front - back, 2.0 * e);

        // tangent_z x tangent_x points up for a right-handed, y-up frame
        tangent_z.cross(tangent_x).normalize_or(Vec3::UP)
    }

    /// Lowest elevation among the centre and the four cardinal points at
    /// `radius`.
    ///
    /// Never exceeds `height_at(x, z)`. Non-finite `x`/`z` yields
    /// [`SENTINEL_HEIGHT`]; a non-finite radius collapses the footprint to the
    /// centre sample.
    #[must_use]
    pub fn min_height_in_footprint(&self, field: &NoiseField, x: f64, z: f64, radius: f64) -> f64 {
        if !(x.is_finite() && z.is_finite()) {
            tracing::trace!(x, z, "non-finite footprint query");
            return SENTINEL_HEIGHT;
        }

        let center = self.height_at(field, x, z);
        if !radius.is_finite() {
            return center;
        }

        let r = radius.abs();
        [
            self.height_at(field, x + r, z),
            self.height_at(field, x - r, z),
            self.height_at(field, x, z + r),
            self.height_at(field, x, z - r),
        ]
        .into_iter()
        .fold(center, f64::min)
    }
}
