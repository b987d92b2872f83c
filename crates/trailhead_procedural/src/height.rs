//! # Height Field Oracle
//!
//! Elevation at any `(x, z)`, computed on demand and never stored.
//!
//! ## Pipeline (per query)
//!
//! 1. `path_x = center(z)`, `dist = |x - path_x|`
//! 2. **Wild** terrain: rolling FBM hills, plus ridged relief gated by a
//!    low-frequency mask so ridges appear in patches, plus finer FBM passes
//!    for micro detail
//! 3. **Profile**: path width and blend distance, each a base constant
//!    perturbed by low-frequency noise along `z`
//! 4. `blend = quintic(clamp((dist - width / 2) / blend_distance, 0, 1))`
//! 5. **Path surface**: the hill and ridge stacks resampled at `(path_x, z)`
//!    and heavily damped, plus a fine camber ripple and a narrow wear dip
//! 6. `height = wild * blend + surface * (1 - blend)`
//!
//! The path surface mixes ridges at a fixed weight rather than through the
//! ridge mask, so the two sides of the blend are not algebraically identical
//! where they meet. The quintic blend hides the difference.

use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};
use crate::fractal::FractalParams;
use crate::math::{quintic, saturate};
use crate::noise::NoiseField;
use crate::path::PathCurve;

/// Elevation returned for non-finite query coordinates.
pub const SENTINEL_HEIGHT: f64 = 0.0;

/// A fractal stack with the world-space amplitude it contributes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseLayer {
    /// Octave structure.
    pub fractal: FractalParams,
    /// Peak contribution in world units.
    pub amplitude: f64,
}

impl NoiseLayer {
    /// Creates a layer.
    #[must_use]
    pub const fn new(fractal: FractalParams, amplitude: f64) -> Self {
        Self { fractal, amplitude }
    }

    /// Normalized FBM scaled to the layer amplitude, in `[-amplitude, amplitude]`.
    #[inline]
    #[must_use]
    pub fn fbm(&self, field: &NoiseField, x: f64, z: f64) -> f64 {
        field.fbm_normalized(x, z, &self.fractal) * self.amplitude
    }

    /// Normalized ridged sum re-centred on zero and scaled, in
    /// `[-amplitude, amplitude]`.
    #[inline]
    #[must_use]
    pub fn ridged(&self, field: &NoiseField, x: f64, z: f64) -> f64 {
        (field.ridged_normalized(x, z, &self.fractal) * 2.0 - 1.0) * self.amplitude
    }

    fn validate(&self, label: &str) -> TerrainResult<()> {
        if !self.amplitude.is_finite() {
            return Err(TerrainError::InvalidConfig(format!(
                "{label}: amplitude must be finite"
            )));
        }
        self.fractal.validate(label)
    }
}

/// Patchy gate deciding where ridged relief shows through.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RidgeMask {
    /// Frequency of the gating noise.
    pub frequency: f64,
    /// Noise-space offset.
    pub offset: [f64; 2],
    /// Noise value at which the mask is half open.
    pub threshold: f64,
    /// Width, in noise units, of the transition from closed to open.
    pub softness: f64,
}

impl RidgeMask {
    /// Mask weight in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn weight(&self, field: &NoiseField, x: f64, z: f64) -> f64 {
        let n = field.sample(
            x * self.frequency + self.offset[0],
            z * self.frequency + self.offset[1],
        );
        quintic(saturate((n - self.threshold) / self.softness + 0.5))
    }
}

/// Off-path terrain constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Rolling hills: low frequency, largest amplitude.
    pub hills: NoiseLayer,
    /// Sharp ridged relief.
    pub ridges: NoiseLayer,
    /// Gate for `ridges`.
    pub ridge_mask: RidgeMask,
    /// Higher-frequency FBM passes summed on top, coarsest first.
    pub detail: Vec<NoiseLayer>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            hills: NoiseLayer::new(FractalParams::new(4, 0.5, 2.0, 0.015), 8.0),
            ridges: NoiseLayer::new(
                FractalParams::new(4, 0.5, 2.0, 0.02).with_offset(57.3, -211.9),
                6.0,
            ),
            ridge_mask: RidgeMask {
                frequency: 0.006,
                offset: [-433.1, 271.4],
                threshold: 0.1,
                softness: 0.6,
            },
            detail: vec![
                NoiseLayer::new(FractalParams::new(2, 0.5, 2.0, 0.08).with_offset(19.1, 7.7), 2.0),
                NoiseLayer::new(FractalParams::new(2, 0.5, 2.0, 0.3).with_offset(-61.7, 88.2), 0.5),
                NoiseLayer::new(FractalParams::new(1, 0.5, 2.0, 1.5).with_offset(3.3, -5.9), 0.1),
            ],
        }
    }
}

impl TerrainConfig {
    /// Upper bound on `|wild_height|`.
    #[must_use]
    pub fn amplitude_bound(&self) -> f64 {
        self.hills.amplitude.abs()
            + self.ridges.amplitude.abs()
            + self.detail.iter().map(|l| l.amplitude.abs()).sum::<f64>()
    }

    /// Validates every layer and the ridge mask.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfig`] for the first bad constant.
    pub fn validate(&self) -> TerrainResult<()> {
        self.hills.validate("terrain.hills")?;
        self.ridges.validate("terrain.ridges")?;
        for (i, layer) in self.detail.iter().enumerate() {
            layer.validate(&format!("terrain.detail[{i}]"))?;
        }
        let mask = &self.ridge_mask;
        if !(mask.frequency.is_finite() && mask.frequency > 0.0) {
            return Err(TerrainError::InvalidConfig(
                "terrain.ridge_mask: frequency must be positive".to_string(),
            ));
        }
        if !(mask.softness.is_finite() && mask.softness > 0.0) {
            return Err(TerrainError::InvalidConfig(
                "terrain.ridge_mask: softness must be positive".to_string(),
            ));
        }
        if !(mask.threshold.is_finite() && mask.offset.iter().all(|o| o.is_finite())) {
            return Err(TerrainError::InvalidConfig(
                "terrain.ridge_mask: threshold and offset must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trail cross-section constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Mean width of the flattened band.
    pub width_base: f64,
    /// Peak perturbation of the width.
    pub width_variation: f64,
    /// Frequency, along z, of the width perturbation.
    pub width_frequency: f64,
    /// Mean distance over which the band blends back into wild terrain.
    pub blend_base: f64,
    /// Peak perturbation of the blend distance.
    pub blend_variation: f64,
    /// Frequency, along z, of the blend perturbation.
    pub blend_frequency: f64,
    /// Scale applied to the resampled hill/ridge stack under the trail.
    pub surface_damping: f64,
    /// Fixed ridge weight used under the trail (no mask).
    pub surface_ridge_weight: f64,
    /// Amplitude of the fine ripple across the trail surface.
    pub camber_amplitude: f64,
    /// Frequency of the ripple.
    pub camber_frequency: f64,
    /// Depth of the trodden groove at the centerline.
    pub wear_depth: f64,
    /// Gaussian width of the groove.
    pub wear_width: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            width_base: 5.0,
            width_variation: 1.0,
            width_frequency: 0.1,
            blend_base: 10.0,
            blend_variation: 2.0,
            blend_frequency: 0.05,
            surface_damping: 0.35,
            surface_ridge_weight: 0.5,
            camber_amplitude: 0.15,
            camber_frequency: 0.5,
            wear_depth: 0.12,
            wear_width: 0.9,
        }
    }
}

impl TrailConfig {
    /// Validates that width and blend distance stay positive for every `z`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfig`] for the first bad constant.
    pub fn validate(&self) -> TerrainResult<()> {
        let all_finite = [
            self.width_base,
            self.width_variation,
            self.width_frequency,
            self.blend_base,
            self.blend_variation,
            self.blend_frequency,
            self.surface_damping,
            self.surface_ridge_weight,
            self.camber_amplitude,
            self.camber_frequency,
            self.wear_depth,
            self.wear_width,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(TerrainError::InvalidConfig(
                "trail: every constant must be finite".to_string(),
            ));
        }
        if self.width_base - self.width_variation.abs() <= 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "trail: width {} +/- {} can reach zero",
                self.width_base, self.width_variation
            )));
        }
        if self.blend_base - self.blend_variation.abs() <= 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "trail: blend distance {} +/- {} can reach zero",
                self.blend_base, self.blend_variation
            )));
        }
        if !(0.0..=1.0).contains(&self.surface_damping) {
            return Err(TerrainError::InvalidConfig(
                "trail: surface damping must be in [0, 1]".to_string(),
            ));
        }
        if self.wear_width <= 0.0 {
            return Err(TerrainError::InvalidConfig(
                "trail: wear width must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Widest reach, from the centerline, of any path influence.
    #[must_use]
    pub fn max_influence(&self) -> f64 {
        (self.width_base + self.width_variation.abs()) * 0.5
            + self.blend_base
            + self.blend_variation.abs()
    }
}

/// Trail cross-section at one `z`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathProfile {
    /// Centerline x.
    pub center: f64,
    /// Full width of the flattened band.
    pub width: f64,
    /// Distance over which the band blends into wild terrain.
    pub blend_distance: f64,
}

impl PathProfile {
    /// Blend factor at lateral distance `dist` from the centerline:
    /// 0 on the path, 1 in fully wild terrain.
    #[inline]
    #[must_use]
    pub fn blend(&self, dist: f64) -> f64 {
        quintic(saturate((dist - self.width * 0.5) / self.blend_distance))
    }
}

/// Every intermediate of one oracle evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightSample {
    /// Final elevation.
    pub height: f64,
    /// Wild terrain elevation at the query point.
    pub wild: f64,
    /// Path surface elevation at the query point.
    pub surface: f64,
    /// Blend factor (0 on path, 1 wild).
    pub blend: f64,
    /// Trail cross-section at the query's z.
    pub profile: PathProfile,
}

/// The height field formula: every constant the oracle needs, minus the
/// noise tables, which are passed in by reference on each query.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    terrain: TerrainConfig,
    trail: TrailConfig,
    curve: PathCurve,
}

impl HeightField {
    /// Assembles a height field. Validation is the caller's job; see
    /// [`crate::config::WorldConfig::validate`].
    #[must_use]
    pub fn new(terrain: TerrainConfig, trail: TrailConfig, curve: PathCurve) -> Self {
        Self {
            terrain,
            trail,
            curve,
        }
    }

    /// Off-path terrain constants.
    #[must_use]
    pub fn terrain(&self) -> &TerrainConfig {
        &self.terrain
    }

    /// Trail cross-section constants.
    #[must_use]
    pub fn trail(&self) -> &TrailConfig {
        &self.trail
    }

    /// Centerline.
    #[must_use]
    pub fn curve(&self) -> &PathCurve {
        &self.curve
    }

    /// Elevation at `(x, z)`.
    ///
    /// Returns [`SENTINEL_HEIGHT`] for non-finite input.
    #[must_use]
    pub fn height_at(&self, field: &NoiseField, x: f64, z: f64) -> f64 {
        if !(x.is_finite() && z.is_finite()) {
            tracing::trace!(x, z, "non-finite height query");
            return SENTINEL_HEIGHT;
        }

        let profile = self.profile_at(field, z);
        let dist = (x - profile.center).abs();
        let blend = profile.blend(dist);

        // Both ends of the blend skip the side weighted by zero
        let height = if blend >= 1.0 {
            self.wild_height(field, x, z)
        } else if blend <= 0.0 {
            self.surface_with_center(field, x, z, profile.center)
        } else {
            let wild = self.wild_height(field, x, z);
            let surface = self.surface_with_center(field, x, z, profile.center);
            wild * blend + surface * (1.0 - blend)
        };

        finite_or_sentinel(height)
    }

    /// Full breakdown of one evaluation. `sample(x, z).height` equals
    /// `height_at(x, z)` bit for bit.
    #[must_use]
    pub fn sample(&self, field: &NoiseField, x: f64, z: f64) -> HeightSample {
        if !(x.is_finite() && z.is_finite()) {
            return HeightSample {
                height: SENTINEL_HEIGHT,
                wild: SENTINEL_HEIGHT,
                surface: SENTINEL_HEIGHT,
                blend: 0.0,
                profile: PathProfile {
                    center: 0.0,
                    width: self.trail.width_base,
                    blend_distance: self.trail.blend_base,
                },
            };
        }

        let profile = self.profile_at(field, z);
        let dist = (x - profile.center).abs();
        let blend = profile.blend(dist);
        let wild = self.wild_height(field, x, z);
        let surface = self.surface_with_center(field, x, z, profile.center);

        let height = if blend >= 1.0 {
            wild
        } else if blend <= 0.0 {
            surface
        } else {
            wild * blend + surface * (1.0 - blend)
        };

        HeightSample {
            height: finite_or_sentinel(height),
            wild,
            surface,
            blend,
            profile,
        }
    }

    /// Trail cross-section at `z`: centre, organic width and blend distance.
    #[must_use]
    pub fn profile_at(&self, field: &NoiseField, z: f64) -> PathProfile {
        let trail = &self.trail;
        let width = trail.width_base
            + field.sample(z * trail.width_frequency, 0.0) * trail.width_variation;
        let blend_distance = trail.blend_base
            + field.sample(0.0, z * trail.blend_frequency) * trail.blend_variation;

        PathProfile {
            center: self.curve.center_at(field, z),
            width,
            blend_distance,
        }
    }

    /// Terrain as it would be with no trail.
    #[must_use]
    pub fn wild_height(&self, field: &NoiseField, x: f64, z: f64) -> f64 {
        let terrain = &self.terrain;

        let hills = terrain.hills.fbm(field, x, z);
        let mask = terrain.ridge_mask.weight(field, x, z);
        let ridges = if mask > 0.0 {
            terrain.ridges.ridged(field, x, z) * mask
        } else {
            0.0
        };
        let detail: f64 = terrain.detail.iter().map(|layer| layer.fbm(field, x, z)).sum();

        hills + ridges + detail
    }

    /// Path surface at `(x, z)`, as if the whole world were trail.
    #[must_use]
    pub fn path_surface_height(&self, field: &NoiseField, x: f64, z: f64) -> f64 {
        if !(x.is_finite() && z.is_finite()) {
            return SENTINEL_HEIGHT;
        }
        let center = self.curve.center_at(field, z);
        self.surface_with_center(field, x, z, center)
    }

    fn surface_with_center(&self, field: &NoiseField, x: f64, z: f64, center: f64) -> f64 {
        let terrain = &self.terrain;
        let trail = &self.trail;

        let base = trail.surface_damping
            * (terrain.hills.fbm(field, center, z)
                + trail.surface_ridge_weight * terrain.ridges.ridged(field, center, z));

        let camber = field.sample(x * trail.camber_frequency, z * trail.camber_frequency)
            * trail.camber_amplitude;

        let off = (x - center) / trail.wear_width;
        let wear = trail.wear_depth * (-off * off).exp();

        base + camber - wear
    }
}

#[inline]
fn finite_or_sentinel(height: f64) -> f64 {
    if height.is_finite() {
        height
    } else {
        SENTINEL_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WorldSeed;

    fn fixture() -> (NoiseField, HeightField) {
        (
            NoiseField::new(WorldSeed::new(12345)),
            HeightField::new(
                TerrainConfig::default(),
                TrailConfig::default(),
                PathCurve::default(),
            ),
        )
    }

    #[test]
    fn test_on_path_is_surface() {
        let (field, height) = fixture();
        for i in -50..50 {
            let z = f64::from(i) * 3.1;
            let center = height.curve().center_at(&field, z);
            let h = height.height_at(&field, center, z);
            let surface = height.path_surface_height(&field, center, z);
            assert_eq!(h, surface, "on-path height must be the path surface at z={z}");
        }
    }

    #[test]
    fn test_far_from_path_is_wild() {
        let (field, height) = fixture();
        let reach = height.trail().max_influence();
        for i in -50..50 {
            let z = f64::from(i) * 2.7;
            let center = height.curve().center_at(&field, z);
            for x in [center + reach + 0.5, center - reach - 3.0, center + 120.0] {
                assert_eq!(height.height_at(&field, x, z), height.wild_height(&field, x, z));
            }
        }
    }

    #[test]
    fn test_sample_matches_height_at() {
        let (field, height) = fixture();
        for i in -40..40 {
            let z = f64::from(i) * 1.3;
            for j in -40..40 {
                let x = f64::from(j) * 0.45;
                let s = height.sample(&field, x, z);
                assert_eq!(s.height.to_bits(), height.height_at(&field, x, z).to_bits());
                assert!((0.0..=1.0).contains(&s.blend));
            }
        }
    }

    #[test]
    fn test_profile_stays_positive() {
        let (field, height) = fixture();
        let trail = height.trail();
        for i in -5000..5000 {
            let profile = height.profile_at(&field, f64::from(i) * 0.7);
            assert!(profile.width >= trail.width_base - trail.width_variation);
            assert!(profile.width <= trail.width_base + trail.width_variation);
            assert!(profile.blend_distance >= trail.blend_base - trail.blend_variation);
            assert!(profile.blend_distance <= trail.blend_base + trail.blend_variation);
        }
    }

    #[test]
    fn test_blend_monotonic_across_edge() {
        let profile = PathProfile {
            center: 0.0,
            width: 5.0,
            blend_distance: 10.0,
        };
        assert_eq!(profile.blend(0.0), 0.0);
        assert_eq!(profile.blend(2.5), 0.0);
        assert_eq!(profile.blend(12.5), 1.0);
        assert_eq!(profile.blend(100.0), 1.0);
        assert!((profile.blend(7.5) - 0.5).abs() < 1e-12);

        let mut previous = 0.0;
        for i in 0..200 {
            let b = profile.blend(f64::from(i) * 0.1);
            assert!(b >= previous);
            previous = b;
        }
    }

    #[test]
    fn test_wild_height_bounded() {
        let (field, height) = fixture();
        let bound = height.terrain().amplitude_bound();
        for i in 0..2000 {
            let x = f64::from(i) * 1.7 - 1700.0;
            let z = f64::from(i) * -2.3 + 900.0;
            assert!(height.wild_height(&field, x, z).abs() <= bound);
        }
    }

    #[test]
    fn test_wear_dip_lowers_centerline() {
        let (field, _) = fixture();
        let flat = HeightField::new(
            TerrainConfig::default(),
            TrailConfig {
                camber_amplitude: 0.0,
                ..TrailConfig::default()
            },
            PathCurve::default(),
        );
        let z = 40.0;
        let center = flat.curve().center_at(&field, z);
        let mid = flat.path_surface_height(&field, center, z);
        let edge = flat.path_surface_height(&field, center + 2.0, z);
        assert!(mid < edge, "groove must sit below the trail shoulders");
        assert!((edge - mid - 0.12 * (1.0 - (-(2.0f64 / 0.9).powi(2)).exp())).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_inputs_return_sentinel() {
        let (field, height) = fixture();
        assert_eq!(height.height_at(&field, f64::NAN, 0.0), SENTINEL_HEIGHT);
        assert_eq!(height.height_at(&field, 0.0, f64::INFINITY), SENTINEL_HEIGHT);
        assert_eq!(height.sample(&field, f64::NEG_INFINITY, 1.0).height, SENTINEL_HEIGHT);
        assert_eq!(height.path_surface_height(&field, f64::NAN, 1.0), SENTINEL_HEIGHT);
    }

    #[test]
    fn test_trail_validation() {
        assert!(TrailConfig::default().validate().is_ok());
        let pinched = TrailConfig {
            width_base: 1.0,
            width_variation: 1.0,
            ..TrailConfig::default()
        };
        assert!(pinched.validate().is_err());
        let abrupt = TrailConfig {
            blend_base: 2.0,
            blend_variation: -3.0,
            ..TrailConfig::default()
        };
        assert!(abrupt.validate().is_err());
        let nan = TrailConfig {
            wear_depth: f64::NAN,
            ..TrailConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_terrain_validation() {
        assert!(TerrainConfig::default().validate().is_ok());
        let mut bad = TerrainConfig::default();
        bad.ridge_mask.softness = 0.0;
        assert!(bad.validate().is_err());
        let mut bad = TerrainConfig::default();
        bad.detail[1].fractal.octaves = 0;
        assert!(bad.validate().is_err());
    }
}
