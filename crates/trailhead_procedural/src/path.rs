//! # Path Centerline
//!
//! Maps a longitudinal coordinate `z` to the lateral offset of the trail:
//!
//! ```text
//! center(z) = sum_i sin(z * f_i) * a_i  +  meander(z)
//! ```
//!
//! The sinusoids use frequencies with no small common multiple so the wander
//! never visibly repeats; `meander` is a normalized low-frequency FBM scaled
//! to a wide amplitude for long-range drift. Every term is smooth, so finite
//! difference tangents taken by ribbon builders are stable.

use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};
use crate::fractal::FractalParams;
use crate::noise::NoiseField;

/// One sinusoidal term of the centerline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathWave {
    /// Angular frequency, radians per world unit.
    pub frequency: f64,
    /// Peak lateral displacement.
    pub amplitude: f64,
}

impl PathWave {
    /// Creates a wave term.
    #[must_use]
    pub const fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
        }
    }
}

/// Centerline parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathCurve {
    /// Large-scale wander.
    pub waves: Vec<PathWave>,
    /// Meander stack, sampled along the line `x = 0` in world space; its
    /// offset places that line somewhere uncorrelated with the terrain.
    pub meander: FractalParams,
    /// Scale applied to the normalized meander.
    pub meander_amplitude: f64,
}

impl Default for PathCurve {
    fn default() -> Self {
        Self {
            waves: vec![
                PathWave::new(0.043, 6.0),
                PathWave::new(0.017, 12.0),
                PathWave::new(0.009, 4.0),
            ],
            meander: FractalParams::new(2, 0.5, 2.0, 0.005).with_offset(100.0, 0.0),
            meander_amplitude: 15.0,
        }
    }
}

impl PathCurve {
    /// Step used for tangent estimation.
    pub const TANGENT_EPSILON: f64 = 0.05;

    /// Lateral offset of the trail centre at `z`.
    ///
    /// Returns 0.0 for non-finite `z`.
    #[must_use]
    pub fn center_at(&self, field: &NoiseField, z: f64) -> f64 {
        if !z.is_finite() {
            return 0.0;
        }

        let wander: f64 = self
            .waves
            .iter()
            .map(|wave| (z * wave.frequency).sin() * wave.amplitude)
            .sum();

        wander + self.meander(field, z)
    }

    /// The noise-driven drift term alone.
    #[must_use]
    pub fn meander(&self, field: &NoiseField, z: f64) -> f64 {
        field.fbm_normalized(0.0, z, &self.meander) * self.meander_amplitude
    }

    /// `d(center)/dz` by central difference.
    #[must_use]
    pub fn slope_at(&self, field: &NoiseField, z: f64) -> f64 {
        if !z.is_finite() {
            return 0.0;
        }
        let h = Self::TANGENT_EPSILON;
        (self.center_at(field, z + h) - self.center_at(field, z - h)) / (2.0 * h)
    }

    /// Unit tangent of the centerline in the ground plane, as `(dx, dz)`.
    #[must_use]
    pub fn tangent_at(&self, field: &NoiseField, z: f64) -> (f64, f64) {
        let slope = self.slope_at(field, z);
        let len = (slope * slope + 1.0).sqrt();
        (slope / len, 1.0 / len)
    }

    /// Upper bound on `|center_at(z)|`: the sum of all configured amplitudes.
    #[must_use]
    pub fn amplitude_bound(&self) -> f64 {
        self.waves.iter().map(|w| w.amplitude.abs()).sum::<f64>() + self.meander_amplitude.abs()
    }

    /// Checks every term is finite and the meander stack is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfig`] for non-finite wave terms or
    /// meander amplitude, or an invalid meander stack.
    pub fn validate(&self) -> TerrainResult<()> {
        for (i, wave) in self.waves.iter().enumerate() {
            if !(wave.frequency.is_finite() && wave.amplitude.is_finite()) {
                return Err(TerrainError::InvalidConfig(format!(
                    "path wave {i} must have finite frequency and amplitude"
                )));
            }
        }
        if !self.meander_amplitude.is_finite() {
            return Err(TerrainError::InvalidConfig(
                "path meander amplitude must be finite".to_string(),
            ));
        }
        self.meander.validate("path.meander")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WorldSeed;

    #[test]
    fn test_bounded_by_amplitudes() {
        let field = NoiseField::new(WorldSeed::new(12345));
        let curve = PathCurve::default();
        let bound = curve.amplitude_bound();
        assert!((bound - 37.0).abs() < 1e-12);

        for i in -20_000..20_000 {
            let z = f64::from(i) * 0.5;
            let x = curve.center_at(&field, z);
            assert!(x.abs() <= bound, "center {x} at z={z} exceeds {bound}");
        }
    }

    #[test]
    fn test_first_meander_octave_follows_reference_lane() {
        // One octave of meander is the raw field along x = 100 in noise space
        let field = NoiseField::new(WorldSeed::new(12345));
        let curve = PathCurve {
            waves: Vec::new(),
            meander: FractalParams::new(1, 0.5, 2.0, 0.005).with_offset(100.0, 0.0),
            meander_amplitude: 15.0,
        };
        for i in 0..20 {
            let z = f64::from(i) * 13.0;
            let expected = field.sample(100.0, z * 0.005) * 15.0;
            assert!((curve.center_at(&field, z) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_waves_only() {
        let field = NoiseField::new(WorldSeed::new(1));
        let curve = PathCurve {
            waves: vec![PathWave::new(0.5, 2.0)],
            meander_amplitude: 0.0,
            ..PathCurve::default()
        };
        let z = 3.0;
        assert!((curve.center_at(&field, z) - (1.5f64).sin() * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_smooth_tangents() {
        let field = NoiseField::new(WorldSeed::new(12345));
        let curve = PathCurve::default();
        let mut previous = curve.slope_at(&field, -200.0);
        let mut z = -200.0;
        while z < 200.0 {
            z += 0.25;
            let slope = curve.slope_at(&field, z);
            assert!(
                (slope - previous).abs() < 0.05,
                "slope jumped from {previous} to {slope} at z={z}"
            );
            let (tx, tz) = curve.tangent_at(&field, z);
            assert!(((tx * tx + tz * tz) - 1.0).abs() < 1e-12);
            assert!(tz > 0.0, "tangent must point down-trail");
            previous = slope;
        }
    }

    #[test]
    fn test_non_finite_is_zero() {
        let field = NoiseField::new(WorldSeed::new(1));
        let curve = PathCurve::default();
        assert_eq!(curve.center_at(&field, f64::NAN), 0.0);
        assert_eq!(curve.center_at(&field, f64::INFINITY), 0.0);
        assert_eq!(curve.slope_at(&field, f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_validate() {
        assert!(PathCurve::default().validate().is_ok());
        let bad = PathCurve {
            waves: vec![PathWave::new(f64::NAN, 1.0)],
            ..PathCurve::default()
        };
        assert!(bad.validate().is_err());
    }
}
