//! # Fractal Composition
//!
//! FBM and ridged multifractal sums over a shared [`NoiseField`].
//!
//! Octave `i` samples at `base_frequency * lacunarity^i` with weight
//! `persistence^i`. Both compositions are pure functions of the coordinate
//! and the parameters; the field is the only state they touch.

use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};
use crate::noise::NoiseField;

/// Hard upper bound on octave counts; beyond this the finest octave is far
/// below any sampling resolution the consumers use.
pub const MAX_OCTAVES: u32 = 16;

/// Parameters of one fractal stack.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FractalParams {
    /// Number of noise layers (typically 1-8).
    pub octaves: u32,
    /// Amplitude decay per octave (typically 0.5).
    pub persistence: f64,
    /// Frequency increase per octave (typically 2.0).
    pub lacunarity: f64,
    /// Frequency of the first octave, in cycles per world unit.
    pub base_frequency: f64,
    /// Offset added in noise space, decorrelating stacks that share a field.
    #[serde(default)]
    pub offset: [f64; 2],
}

impl FractalParams {
    /// Creates a stack with no noise-space offset.
    #[must_use]
    pub const fn new(octaves: u32, persistence: f64, lacunarity: f64, base_frequency: f64) -> Self {
        Self {
            octaves,
            persistence,
            lacunarity,
            base_frequency,
            offset: [0.0, 0.0],
        }
    }

    /// Returns a copy shifted in noise space.
    #[must_use]
    pub const fn with_offset(mut self, dx: f64, dz: f64) -> Self {
        self.offset = [dx, dz];
        self
    }

    /// Sum of octave weights, `sum(persistence^i)`.
    ///
    /// Bounds `|fbm|` and `ridged` from above.
    #[must_use]
    pub fn max_amplitude(&self) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        for _ in 0..self.octaves {
            total += amplitude;
            amplitude *= self.persistence;
        }
        total
    }

    /// Frequency of the finest octave.
    #[must_use]
    pub fn max_frequency(&self) -> f64 {
        let mut frequency = self.base_frequency;
        for _ in 1..self.octaves {
            frequency *= self.lacunarity;
        }
        frequency
    }

    /// Checks the parameters can drive a well-defined sum.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfig`] naming `label` when the octave
    /// count is 0 or above [`MAX_OCTAVES`], persistence leaves `(0, 1]`,
    /// lacunarity is below 1, or the base frequency is not positive.
    pub fn validate(&self, label: &str) -> TerrainResult<()> {
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(TerrainError::InvalidConfig(format!(
                "{label}: octaves must be in 1..={MAX_OCTAVES}, got {}",
                self.octaves
            )));
        }
        if !(self.persistence > 0.0 && self.persistence <= 1.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "{label}: persistence must be in (0, 1], got {}",
                self.persistence
            )));
        }
        if !(self.lacunarity.is_finite() && self.lacunarity >= 1.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "{label}: lacunarity must be >= 1, got {}",
                self.lacunarity
            )));
        }
        if !(self.base_frequency.is_finite() && self.base_frequency > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "{label}: base frequency must be positive, got {}",
                self.base_frequency
            )));
        }
        if !(self.offset[0].is_finite() && self.offset[1].is_finite()) {
            return Err(TerrainError::InvalidConfig(format!(
                "{label}: offset must be finite"
            )));
        }
        Ok(())
    }
}

impl NoiseField {
    /// Fractal Brownian motion: the raw weighted sum of octaves.
    ///
    /// Bounded by `params.max_amplitude()` in absolute value.
    #[must_use]
    pub fn fbm(&self, x: f64, z: f64, params: &FractalParams) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = params.base_frequency;

        for _ in 0..params.octaves {
            total += self.sample(
                x * frequency + params.offset[0],
                z * frequency + params.offset[1],
            ) * amplitude;
            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }

        total
    }

    /// FBM divided by its maximum amplitude, so the result stays in `[-1, 1]`.
    #[must_use]
    pub fn fbm_normalized(&self, x: f64, z: f64, params: &FractalParams) -> f64 {
        let max = params.max_amplitude();
        if max > 0.0 {
            self.fbm(x, z, params) / max
        } else {
            0.0
        }
    }

    /// Ridged multifractal: each octave contributes `(1 - |n|)^2`.
    ///
    /// Sharp crests where the underlying noise crosses zero. The raw sum lies
    /// in `[0, params.max_amplitude()]`.
    #[must_use]
    pub fn ridged(&self, x: f64, z: f64, params: &FractalParams) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = params.base_frequency;

        for _ in 0..params.octaves {
            let noise = self.sample(
                x * frequency + params.offset[0],
                z * frequency + params.offset[1],
            );
            let ridge = 1.0 - noise.abs();
            total += ridge * ridge * amplitude;
            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }

        total
    }

    /// Ridged sum divided by its maximum amplitude, in `[0, 1]`.
    #[must_use]
    pub fn ridged_normalized(&self, x: f64, z: f64, params: &FractalParams) -> f64 {
        let max = params.max_amplitude();
        if max > 0.0 {
            self.ridged(x, z, params) / max
        } else {
            0.0
        }
    }
}
