//! # Seeded Noise
//!
//! The two bottom layers of world generation:
//!
//! - [`SeededRng`]: a Mulberry32 stream. 32 bits of state, one mixing step per
//!   draw, identical output on every platform.
//! - [`NoiseField`]: 2D simplex noise whose permutation table is shuffled once
//!   from a [`SeededRng`].
//!
//! ## Determinism Guarantee
//!
//! Given the same [`WorldSeed`], both produce **exactly** the same values on
//! any platform, any time. The RNG is only ever used to build tables and to
//! drive scatter placement; elevation never reads it directly.

use rand::{Error as RandError, RngCore, SeedableRng};

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(u32);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g. one scatter family).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u32) -> Self {
        let mut hash = self.0 ^ purpose.wrapping_mul(0x9E37_79B9);
        hash ^= hash >> 16;
        hash = hash.wrapping_mul(0x85EB_CA6B);
        hash ^= hash >> 13;
        hash = hash.wrapping_mul(0xC2B2_AE35);
        hash ^= hash >> 16;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(12345)
    }
}

/// Mulberry32 pseudorandom stream.
///
/// Produces floats in `[0, 1)` via [`SeededRng::next_f64`] and plugs into the
/// `rand` ecosystem through [`RngCore`], so scatter code can use
/// `gen_range` and friends on an independent, reproducible stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Golden-ratio increment applied to the state before every draw.
    const INCREMENT: u32 = 0x6D2B_79F5;

    /// Creates a stream from a world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: WorldSeed) -> Self {
        Self { state: seed.value() }
    }

    /// Advances the state and returns the next 32-bit output.
    #[inline]
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(Self::INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Returns the next value in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_raw()) / 4_294_967_296.0
    }

    /// Returns the next value in `[min, max)`.
    #[inline]
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns the next value in `[-0.5, 0.5)`.
    #[inline]
    pub fn centered(&mut self) -> f64 {
        self.next_f64() - 0.5
    }
}

impl RngCore for SeededRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_raw());
        let high = u64::from(self.next_raw());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(WorldSeed::new(u32::from_le_bytes(seed)))
    }
}

/// Pre-computed permutation table for noise.
///
/// This is computed once from the seed and reused.
#[derive(Clone)]
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
}

impl PermutationTable {
    /// 12 gradient directions for 2D simplex (cube edge midpoints projected).
    const GRADIENTS: [[i8; 2]; 12] = [
        [1, 1], [-1, 1], [1, -1], [-1, -1],
        [1, 0], [-1, 0], [1, 0], [-1, 0],
        [0, 1], [0, -1], [0, 1], [0, -1],
    ];

    /// Shuffles the identity permutation with draws from `rng`.
    fn new(rng: &mut SeededRng) -> Self {
        let mut perm = [0u8; 512];

        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Forward Fisher-Yates: slot i swaps with a uniformly drawn slot in [i, 256)
        for i in 0..255 {
            let r = i + (rng.next_f64() * (256 - i) as f64) as usize;
            perm.swap(i, r);
        }

        // Double the table to avoid index wrapping
        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        Self { perm }
    }

    /// Gets a permutation value (with automatic wrapping).
    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    /// Gets a gradient for a given hash.
    #[inline]
    fn gradient(hash: u8) -> [i8; 2] {
        Self::GRADIENTS[(hash % 12) as usize]
    }
}

/// 2D simplex noise field.
///
/// Produces smooth, continuous values in `[-1, 1]`. The permutation table is
/// the only state and is never mutated after construction, so a field can be
/// shared by reference across any number of threads.
///
/// # Example
///
/// ```rust
/// use trailhead_procedural::noise::{NoiseField, WorldSeed};
///
/// let field = NoiseField::new(WorldSeed::new(42));
/// let value = field.sample(100.5, 200.3);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Clone)]
pub struct NoiseField {
    /// The permutation table.
    perm_table: PermutationTable,
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("perm_head", &&self.perm_table.perm[..8])
            .finish_non_exhaustive()
    }
}

impl NoiseField {
    /// Skewing factor for 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_438_6; // (sqrt(3) - 1) / 2
    /// Unskewing factor for 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187_1; // (3 - sqrt(3)) / 6

    /// Creates a noise field from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self::from_rng(&mut SeededRng::new(seed))
    }

    /// Creates a noise field by drawing its permutation from an existing stream.
    #[must_use]
    pub fn from_rng(rng: &mut SeededRng) -> Self {
        Self {
            perm_table: PermutationTable::new(rng),
        }
    }

    /// Samples 2D simplex noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range `[-1, 1]`. Non-finite input yields a non-finite
    /// result; callers that accept arbitrary input guard before sampling.
    #[must_use]
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        // Skew input coordinates to simplex grid
        let skew = (x + z) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(z + skew);

        // Unskew to get first corner in simplex
        let unskew = f64::from(i.wrapping_add(j)) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let z0 = z - (f64::from(j) - unskew);

        // Determine which simplex we're in (upper or lower triangle)
        let (i1, j1) = if x0 > z0 { (1, 0) } else { (0, 1) };

        // Offsets for second and third corners
        let x1 = x0 - i1 as f64 + Self::G2;
        let z1 = z0 - j1 as f64 + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let z2 = z0 - 1.0 + 2.0 * Self::G2;

        // Hash coordinates to get gradient indices
        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let gi0 = self.perm_table.get(ii + self.perm_table.get(jj) as usize);
        let gi1 = self
            .perm_table
            .get(ii + i1 + self.perm_table.get(jj + j1) as usize);
        let gi2 = self
            .perm_table
            .get(ii + 1 + self.perm_table.get(jj + 1) as usize);

        let n0 = Self::contribution(x0, z0, gi0);
        let n1 = Self::contribution(x1, z1, gi1);
        let n2 = Self::contribution(x2, z2, gi2);

        // 70 maps the theoretical extreme onto 1; clamp absorbs rounding
        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// Calculates the contribution from one corner of the simplex.
    #[inline]
    fn contribution(x: f64, z: f64, gradient_index: u8) -> f64 {
        let t = 0.5 - x * x - z * z;
        if t < 0.0 {
            0.0
        } else {
            let grad = PermutationTable::gradient(gradient_index);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + z * f64::from(grad[1]))
        }
    }
}

/// Fast floor function.
///
/// Faster than `f64::floor()` for our use case. Saturates outside `i32`.
#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) {
        xi.saturating_sub(1)
    } else {
        xi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mulberry_reference_stream() {
        let mut rng = SeededRng::new(WorldSeed::new(0));
        assert_eq!(rng.next_raw(), 1_144_304_738);
        assert_eq!(rng.next_raw(), 1_416_247);
        assert_eq!(rng.next_raw(), 958_946_056);

        let mut rng = SeededRng::new(WorldSeed::new(12345));
        assert_eq!(rng.next_raw(), 4_207_900_869);
        assert!((rng.next_f64() - 1_317_490_944.0 / 4_294_967_296.0).abs() < 1e-15);
    }

    #[test]
    fn test_rng_unit_interval() {
        let mut rng = SeededRng::new(WorldSeed::new(12345));
        for _ in 0..100_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "{v} escaped [0, 1)");
        }
    }

    #[test]
    fn test_rng_distribution_is_flat() {
        let mut rng = SeededRng::new(WorldSeed::new(777));
        let mut buckets = [0u32; 10];
        let draws = 200_000;
        for _ in 0..draws {
            let bucket = (rng.next_f64() * 10.0) as usize;
            buckets[bucket] += 1;
        }
        let expected = f64::from(draws) / 10.0;
        for (i, &count) in buckets.iter().enumerate() {
            let deviation = (f64::from(count) - expected).abs() / expected;
            assert!(deviation < 0.03, "Bucket {i} off by {:.1}%", deviation * 100.0);
        }

        let mean: f64 = (0..draws).map(|_| rng.next_f64()).sum::<f64>() / f64::from(draws);
        assert!((mean - 0.5).abs() < 0.01, "Mean drifted to {mean}");
    }

    #[test]
    fn test_rng_core_fill_bytes_matches_stream() {
        let mut a = SeededRng::new(WorldSeed::new(9));
        let mut b = SeededRng::new(WorldSeed::new(9));
        let mut bytes = [0u8; 6];
        a.fill_bytes(&mut bytes);
        let w0 = b.next_raw().to_le_bytes();
        let w1 = b.next_raw().to_le_bytes();
        assert_eq!(&bytes[..4], &w0);
        assert_eq!(&bytes[4..], &w1[..2]);
    }

    #[test]
    fn test_seedable_from_seed_matches_new() {
        let mut a = SeededRng::from_seed(42u32.to_le_bytes());
        let mut b = SeededRng::new(WorldSeed::new(42));
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_permutation_is_a_permutation() {
        let table = PermutationTable::new(&mut SeededRng::new(WorldSeed::new(3)));
        let mut seen = [false; 256];
        for &p in &table.perm[..256] {
            assert!(!seen[p as usize], "Duplicate entry {p}");
            seen[p as usize] = true;
        }
        assert_eq!(&table.perm[..256], &table.perm[256..]);
    }

    #[test]
    fn test_determinism() {
        let seed = WorldSeed::new(12345);
        let noise1 = NoiseField::new(seed);
        let noise2 = NoiseField::new(seed);

        for i in 0..100 {
            let x = f64::from(i) * 0.1;
            let z = f64::from(i) * 0.17;
            assert_eq!(
                noise1.sample(x, z).to_bits(),
                noise2.sample(x, z).to_bits(),
                "Noise should be deterministic"
            );
        }
    }

    #[test]
    fn test_different_seeds_different_results() {
        let noise1 = NoiseField::new(WorldSeed::new(1));
        let noise2 = NoiseField::new(WorldSeed::new(2));

        let differing = (0..64)
            .filter(|&i| {
                let p = f64::from(i) * 1.37 + 0.5;
                noise1.sample(p, -p) != noise2.sample(p, -p)
            })
            .count();

        assert!(differing > 32, "Different seeds should produce different fields");
    }

    #[test]
    fn test_range() {
        let noise = NoiseField::new(WorldSeed::new(42));

        for i in 0..10_000 {
            let x = f64::from(i) * 0.1 - 500.0;
            let z = f64::from(i) * 0.13 - 650.0;
            let value = noise.sample(x, z);

            assert!(
                (-1.0..=1.0).contains(&value),
                "Value {value} out of range at ({x}, {z})"
            );
        }
    }

    #[test]
    fn test_continuity() {
        let noise = NoiseField::new(WorldSeed::new(42));

        let x = 100.0;
        let z = 100.0;
        let delta = 0.001;

        let v1 = noise.sample(x, z);
        let v2 = noise.sample(x + delta, z);
        let v3 = noise.sample(x, z + delta);

        assert!((v1 - v2).abs() < 0.01, "Noise should be continuous along x");
        assert!((v1 - v3).abs() < 0.01, "Noise should be continuous along z");
    }

    #[test]
    fn test_lattice_points_are_zero() {
        // Simplex noise vanishes at skewed lattice corners; origin is one
        let noise = NoiseField::new(WorldSeed::new(5));
        assert!(noise.sample(0.0, 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_coordinates_wrap() {
        let noise = NoiseField::new(WorldSeed::new(8));
        for i in 1..200 {
            let p = -f64::from(i) * 3.3;
            let v = noise.sample(p, p * 0.5);
            assert!(v.is_finite() && (-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_seed_derivation() {
        let base = WorldSeed::new(42);
        let derived1 = base.derive(1);
        let derived2 = base.derive(2);
        let derived1_again = base.derive(1);

        assert_ne!(derived1, derived2, "Different purposes should give different seeds");
        assert_eq!(derived1, derived1_again, "Same purpose should give same seed");
        assert_ne!(derived1, base, "Derived seed should differ from base");
    }

    #[test]
    fn test_fast_floor() {
        assert_eq!(fast_floor(1.5), 1);
        assert_eq!(fast_floor(-1.5), -2);
        assert_eq!(fast_floor(-2.0), -2);
        assert_eq!(fast_floor(0.0), 0);
    }
}
