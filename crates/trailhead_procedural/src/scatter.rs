//! # Scatter Placement
//!
//! Rejection sampling of props (rocks, pebbles, grass, trees) around the
//! trail.
//!
//! A [`ScatterRule`] proposes candidate positions from a seeded stream, rejects
//! those that fail noise clustering or the path-clearance ramp, and grounds
//! every accepted candidate with exactly one oracle query (`height_at`, or
//! `min_height_in_footprint` for rules that embed volumetric objects).
//!
//! ## Determinism
//!
//! Each scatter pass owns its own [`SeededRng`], seeded from the region and
//! the rule's stream id. The same world, rule, seed and count always produce
//! the same placements, independent of any other pass.

use std::f64::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::math::{lerp, saturate, Vec3};
use crate::noise::{SeededRng, WorldSeed};
use crate::world::World;

/// Axis-aligned rectangle in the ground plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterBounds {
    /// Smallest x.
    pub min_x: f64,
    /// Largest x.
    pub max_x: f64,
    /// Smallest z.
    pub min_z: f64,
    /// Largest z.
    pub max_z: f64,
}

impl ScatterBounds {
    /// A rectangle of `width` by `depth` centred on the origin.
    #[must_use]
    pub fn centered(width: f64, depth: f64) -> Self {
        Self {
            min_x: -width * 0.5,
            max_x: width * 0.5,
            min_z: -depth * 0.5,
            max_z: depth * 0.5,
        }
    }

    /// Returns true if `(x, z)` lies inside (edges included).
    #[must_use]
    pub fn contains(&self, x: f64, z: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_z..=self.max_z).contains(&z)
    }

    /// Uniform z inside the rectangle.
    pub fn sample_z(&self, rng: &mut SeededRng) -> f64 {
        rng.range(self.min_z, self.max_z)
    }

    /// Uniform x inside the rectangle.
    pub fn sample_x(&self, rng: &mut SeededRng) -> f64 {
        rng.range(self.min_x, self.max_x)
    }
}

/// Uniform proposal: draws z, then x.
pub fn uniform_in(rng: &mut SeededRng, bounds: &ScatterBounds) -> (f64, f64) {
    let z = bounds.sample_z(rng);
    let x = bounds.sample_x(rng);
    (x, z)
}

/// Iterator over accepted candidates.
///
/// Each draw counts against `max_attempts`, accepted or not; the iterator
/// ends when the budget is spent. Non-finite proposals are always rejected.
pub struct RejectionSampler<P, A> {
    rng: SeededRng,
    bounds: ScatterBounds,
    propose: P,
    accept: A,
    attempts: u64,
    max_attempts: u64,
}

impl<A> RejectionSampler<fn(&mut SeededRng, &ScatterBounds) -> (f64, f64), A>
where
    A: FnMut(&mut SeededRng, f64, f64) -> bool,
{
    /// Sampler with uniform proposals inside `bounds`.
    pub fn uniform(rng: SeededRng, bounds: ScatterBounds, max_attempts: u64, accept: A) -> Self {
        Self::new(rng, bounds, max_attempts, uniform_in, accept)
    }
}

impl<P, A> RejectionSampler<P, A>
where
    P: FnMut(&mut SeededRng, &ScatterBounds) -> (f64, f64),
    A: FnMut(&mut SeededRng, f64, f64) -> bool,
{
    /// Sampler with a custom proposal.
    pub fn new(rng: SeededRng, bounds: ScatterBounds, max_attempts: u64, propose: P, accept: A) -> Self {
        Self {
            rng,
            bounds,
            propose,
            accept,
            attempts: 0,
            max_attempts,
        }
    }

    /// Draws spent so far.
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Returns true once the attempt budget is spent.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// The underlying stream, for drawing per-item attributes between
    /// candidates.
    pub fn rng_mut(&mut self) -> &mut SeededRng {
        &mut self.rng
    }
}

impl<P, A> Iterator for RejectionSampler<P, A>
where
    P: FnMut(&mut SeededRng, &ScatterBounds) -> (f64, f64),
    A: FnMut(&mut SeededRng, f64, f64) -> bool,
{
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        while self.attempts < self.max_attempts {
            self.attempts += 1;
            let (x, z) = (self.propose)(&mut self.rng, &self.bounds);
            if !(x.is_finite() && z.is_finite()) {
                continue;
            }
            if (self.accept)(&mut self.rng, x, z) {
                return Some((x, z));
            }
        }
        None
    }
}

/// RGB colour, channels in `[0, 1]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgb {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Rgb {
    /// From a `0xRRGGBB` literal.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Componentwise blend toward `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: f32, b: f32| lerp(f64::from(a), f64::from(b), t) as f32;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// Shifts HSL lightness by `delta`, clamping to `[0, 1]`.
    #[must_use]
    pub fn offset_lightness(self, delta: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, s, saturate(l + delta))
    }

    fn to_hsl(self) -> (f64, f64, f64) {
        let (r, g, b) = (f64::from(self.r), f64::from(self.g), f64::from(self.b));
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) * 0.5;
        if max == min {
            return (0.0, 0.0, l);
        }
        let d = max - min;
        let s = if l <= 0.5 { d / (max + min) } else { d / (2.0 - max - min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s, l)
    }

    fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        if s == 0.0 {
            let v = l as f32;
            return Self { r: v, g: v, b: v };
        }
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let channel = |t: f64| {
            let t = t.rem_euclid(1.0);
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * 6.0 * (2.0 / 3.0 - t)
            } else {
                p
            };
            v as f32
        };
        Self {
            r: channel(h + 1.0 / 3.0),
            g: channel(h),
            b: channel(h - 1.0 / 3.0),
        }
    }
}

/// How candidate positions are proposed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CandidateMode {
    /// Uniform over the bounds.
    Area,
    /// Either side of the trail, biased toward its edge: the lateral distance
    /// is `inner + r1 * r2 * spread`.
    Hugging {
        /// Closest distance to the centerline.
        inner: f64,
        /// Extra distance at the far end of the bias.
        spread: f64,
    },
    /// Uniformly across the trail itself.
    Along {
        /// Largest offset from the centerline.
        half_width: f64,
    },
    /// Uniform over the bounds, then pushed `clearance` further out if closer
    /// than `clearance` to the centerline.
    PushedAside {
        /// Minimum distance to the centerline.
        clearance: f64,
    },
}

impl CandidateMode {
    fn propose(self, world: &World, rng: &mut SeededRng, bounds: &ScatterBounds) -> (f64, f64) {
        match self {
            Self::Area => uniform_in(rng, bounds),
            Self::Hugging { inner, spread } => {
                let z = bounds.sample_z(rng);
                let side = if rng.next_f64() > 0.5 { 1.0 } else { -1.0 };
                let dist = inner + rng.next_f64() * rng.next_f64() * spread;
                (world.path_center_at(z) + side * dist, z)
            }
            Self::Along { half_width } => {
                let z = bounds.sample_z(rng);
                let offset = rng.centered() * 2.0 * half_width;
                (world.path_center_at(z) + offset, z)
            }
            Self::PushedAside { clearance } => {
                let (mut x, z) = uniform_in(rng, bounds);
                let center = world.path_center_at(z);
                if (x - center).abs() < clearance {
                    x += if x > center { clearance } else { -clearance };
                }
                (x, z)
            }
        }
    }
}

/// Reject where `noise(x * frequency, z * frequency) < threshold`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Sampling frequency.
    pub frequency: f64,
    /// Lowest accepted noise value.
    pub threshold: f64,
}

/// Acceptance probability `saturate((dist - start) / ramp)` by distance to
/// the trail centre.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clearance {
    /// Distance below which nothing is placed.
    pub start: f64,
    /// Distance over which acceptance rises to certain.
    pub ramp: f64,
}

impl Clearance {
    /// Acceptance probability at `dist` from the centerline.
    #[must_use]
    pub fn probability(&self, dist: f64) -> f64 {
        saturate((dist - self.start) / self.ramp)
    }
}

/// Scale distribution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    /// Smallest base scale.
    pub min: f64,
    /// Largest base scale.
    pub max: f64,
    /// Per-axis multiplier range; `None` scales uniformly.
    pub jitter: Option<(f64, f64)>,
}

/// Euler rotation distribution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RotationMode {
    /// Random heading about y only.
    Yaw,
    /// Random angle in `[0, max)` about every axis.
    Tumble {
        /// Largest angle, radians.
        max: f64,
    },
}

/// Colour distribution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorRange {
    /// Base colour.
    pub base: Rgb,
    /// Optional second colour; each item blends toward it by a random amount.
    pub tip: Option<Rgb>,
    /// Lightness varies by up to half of this either way.
    pub lightness_jitter: f64,
}

/// One scatter family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterRule {
    /// Name used in logs.
    pub name: String,
    /// Salt mixed into the pass seed so families in one region differ.
    pub stream: u32,
    /// Where candidates are drawn.
    pub bounds: ScatterBounds,
    /// Candidate generation.
    pub candidates: CandidateMode,
    /// Noise clustering, if any.
    pub cluster: Option<Cluster>,
    /// Path clearance ramp, if any.
    pub clearance: Option<Clearance>,
    /// Draws allowed per requested item.
    pub attempts_per_item: u32,
    /// Size.
    pub scale: ScaleRange,
    /// Orientation.
    pub rotation: RotationMode,
    /// Sink by this fraction of the vertical scale.
    pub embed: f64,
    /// Constant vertical offset.
    pub lift: f64,
    /// Ground on the footprint minimum with radius `footprint * horizontal
    /// scale` instead of the centre height.
    pub footprint: Option<f64>,
    /// Tint.
    pub color: ColorRange,
}

impl ScatterRule {
    /// Large boulders, clustered, kept well off the trail.
    #[must_use]
    pub fn rocks() -> Self {
        Self {
            name: "rocks".to_owned(),
            stream: 1,
            bounds: ScatterBounds::centered(600.0, 600.0),
            candidates: CandidateMode::Area,
            cluster: Some(Cluster { frequency: 0.1, threshold: -0.1 }),
            clearance: Some(Clearance { start: 3.0, ramp: 6.0 }),
            attempts_per_item: 10,
            scale: ScaleRange { min: 0.3, max: 1.5, jitter: Some((0.7, 1.3)) },
            rotation: RotationMode::Tumble { max: TAU },
            embed: 0.3,
            lift: 0.0,
            footprint: Some(0.5),
            color: ColorRange {
                base: Rgb::from_hex(0x0057_534e),
                tip: None,
                lightness_jitter: 0.0,
            },
        }
    }

    /// Small stones, loosely clustered, allowed closer to the trail.
    #[must_use]
    pub fn pebbles() -> Self {
        Self {
            name: "pebbles".to_owned(),
            stream: 2,
            cluster: Some(Cluster { frequency: 0.15, threshold: -0.3 }),
            clearance: Some(Clearance { start: 1.5, ramp: 3.0 }),
            scale: ScaleRange { min: 0.05, max: 0.2, jitter: Some((0.8, 1.2)) },
            rotation: RotationMode::Tumble { max: 6.0 },
            embed: 0.1,
            footprint: None,
            color: ColorRange {
                base: Rgb::from_hex(0x006b_655f),
                tip: None,
                lightness_jitter: 0.0,
            },
            ..Self::rocks()
        }
    }

    /// Grass tufts hugging the trail edges.
    #[must_use]
    pub fn grass() -> Self {
        Self {
            name: "grass".to_owned(),
            stream: 3,
            bounds: ScatterBounds::centered(600.0, 1200.0),
            candidates: CandidateMode::Hugging { inner: 1.5, spread: 12.0 },
            cluster: Some(Cluster { frequency: 0.05, threshold: -0.1 }),
            clearance: None,
            attempts_per_item: 5,
            scale: ScaleRange { min: 0.5, max: 1.3, jitter: None },
            rotation: RotationMode::Yaw,
            embed: 0.0,
            lift: 0.0,
            footprint: None,
            color: ColorRange {
                base: Rgb::from_hex(0x004a_6741),
                tip: Some(Rgb::from_hex(0x006c_8c5c)),
                lightness_jitter: 0.1,
            },
        }
    }

    /// Gravel on the trail surface.
    #[must_use]
    pub fn trail_pebbles() -> Self {
        Self {
            name: "trail_pebbles".to_owned(),
            stream: 4,
            candidates: CandidateMode::Along { half_width: 2.5 },
            cluster: None,
            scale: ScaleRange { min: 0.05, max: 0.2, jitter: None },
            rotation: RotationMode::Tumble { max: PI },
            lift: 0.05,
            color: ColorRange {
                base: Rgb::from_hex(0x005d_5040),
                tip: None,
                lightness_jitter: 0.2,
            },
            ..Self::grass()
        }
    }

    /// Trees, pushed clear of the trail.
    #[must_use]
    pub fn trees() -> Self {
        Self {
            name: "trees".to_owned(),
            stream: 0,
            bounds: ScatterBounds::centered(120.0, 200.0),
            candidates: CandidateMode::PushedAside { clearance: 4.0 },
            cluster: None,
            clearance: None,
            attempts_per_item: 1,
            scale: ScaleRange { min: 0.5, max: 1.5, jitter: None },
            rotation: RotationMode::Yaw,
            embed: 0.0,
            lift: 0.0,
            footprint: None,
            color: ColorRange {
                base: Rgb::from_hex(0x004a_6741),
                tip: Some(Rgb::from_hex(0x006c_8c5c)),
                lightness_jitter: 0.0,
            },
        }
    }

    fn accepts(&self, world: &World, rng: &mut SeededRng, x: f64, z: f64) -> bool {
        if let Some(cluster) = self.cluster {
            if world.noise_at(x * cluster.frequency, z * cluster.frequency) < cluster.threshold {
                return false;
            }
        }
        if let Some(clearance) = self.clearance {
            let dist = (x - world.path_center_at(z)).abs();
            if rng.next_f64() > clearance.probability(dist) {
                return false;
            }
        }
        true
    }

    fn place(&self, world: &World, rng: &mut SeededRng, x: f64, z: f64) -> Placement {
        let base = rng.range(self.scale.min, self.scale.max);
        let scale = match self.scale.jitter {
            Some((lo, hi)) => Vec3::new(
                base * rng.range(lo, hi),
                base * rng.range(lo, hi),
                base * rng.range(lo, hi),
            ),
            None => Vec3::new(base, base, base),
        };

        let rotation = match self.rotation {
            RotationMode::Yaw => Vec3::new(0.0, rng.next_f64() * TAU, 0.0),
            RotationMode::Tumble { max } => Vec3::new(
                rng.next_f64() * max,
                rng.next_f64() * max,
                rng.next_f64() * max,
            ),
        };

        let mut color = self.color.base;
        if let Some(tip) = self.color.tip {
            color = color.lerp(tip, rng.next_f64());
        }
        if self.color.lightness_jitter > 0.0 {
            color = color.offset_lightness(rng.centered() * self.color.lightness_jitter);
        }

        let ground = match self.footprint {
            Some(factor) => world.min_height_in_footprint(x, z, factor * scale.x.max(scale.z)),
            None => world.height_at(x, z),
        };

        Placement {
            position: Vec3::new(x, ground - self.embed * scale.y + self.lift, z),
            scale,
            rotation,
            color,
        }
    }
}

/// One placed instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// World position of the object's pivot.
    pub position: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
    /// Euler angles, radians.
    pub rotation: Vec3,
    /// Tint.
    pub color: Rgb,
}

/// Places up to `count` instances of `rule`.
///
/// Stops early, with a warning, if the rule's attempt budget runs out.
#[must_use]
pub fn scatter(world: &World, rule: &ScatterRule, seed: WorldSeed, count: usize) -> Vec<Placement> {
    let rng = SeededRng::new(seed.derive(rule.stream));
    let max_attempts = (count as u64).saturating_mul(u64::from(rule.attempts_per_item));

    let mut sampler = RejectionSampler::new(
        rng,
        rule.bounds,
        max_attempts,
        |rng: &mut SeededRng, bounds: &ScatterBounds| rule.candidates.propose(world, rng, bounds),
        |rng: &mut SeededRng, x, z| rule.accepts(world, rng, x, z),
    );

    let mut placements = Vec::with_capacity(count);
    while placements.len() < count {
        let Some((x, z)) = sampler.next() else {
            break;
        };
        placements.push(rule.place(world, sampler.rng_mut(), x, z));
    }

    if placements.len() < count {
        tracing::warn!(
            rule = %rule.name,
            placed = placements.len(),
            requested = count,
            attempts = sampler.attempts(),
            "scatter attempt budget exhausted"
        );
    } else {
        tracing::debug!(
            rule = %rule.name,
            placed = placements.len(),
            attempts = sampler.attempts(),
            "scatter pass complete"
        );
    }

    placements
}

/// Seed for a named region: the 31-multiplier string hash of `name`.
#[must_use]
pub fn region_seed(name: &str) -> WorldSeed {
    let hash = name
        .chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(u32::from(c)));
    WorldSeed::new(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::from_seed(12345).expect("valid")
    }

    #[test]
    fn test_region_seed() {
        assert_eq!(region_seed("default").value(), 1_544_803_905);
        assert_eq!(region_seed("").value(), 0);
        assert_ne!(region_seed("forest"), region_seed("desert"));
    }

    #[test]
    fn test_sampler_respects_budget() {
        let rng = SeededRng::new(WorldSeed::new(3));
        let bounds = ScatterBounds::centered(10.0, 10.0);
        let mut sampler = RejectionSampler::uniform(rng, bounds, 50, |_: &mut SeededRng, _, _| false);
        assert_eq!(sampler.next(), None);
        assert_eq!(sampler.attempts(), 50);
        assert!(sampler.exhausted());
    }

    #[test]
    fn test_sampler_stays_in_bounds() {
        let rng = SeededRng::new(WorldSeed::new(8));
        let bounds = ScatterBounds {
            min_x: 5.0,
            max_x: 9.0,
            min_z: -3.0,
            max_z: -1.0,
        };
        let accepted: Vec<_> =
            RejectionSampler::uniform(rng, bounds, 500, |_: &mut SeededRng, x, _| x > 7.0).collect();
        assert!(!accepted.is_empty());
        for (x, z) in accepted {
            assert!(bounds.contains(x, z));
            assert!(x > 7.0);
        }
    }

    #[test]
    fn test_scatter_is_deterministic() {
        let world = world();
        let seed = region_seed("default");
        let a = scatter(&world, &ScatterRule::rocks(), seed, 50);
        let b = scatter(&world, &ScatterRule::rocks(), seed, 50);
        assert_eq!(a, b);
        let c = scatter(&world, &ScatterRule::rocks(), region_seed("other"), 50);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rocks_grounded_on_footprint_and_clear_of_trail() {
        let world = world();
        let rule = ScatterRule::rocks();
        let rocks = scatter(&world, &rule, region_seed("default"), 80);
        assert_eq!(rocks.len(), 80);
        for rock in &rocks {
            let p = rock.position;
            assert!((p.x - world.path_center_at(p.z)).abs() >= 3.0);
            let radius = 0.5 * rock.scale.x.max(rock.scale.z);
            let ground = world.min_height_in_footprint(p.x, p.z, radius);
            assert_eq!(p.y, ground - 0.3 * rock.scale.y);
            assert!(p.y <= world.height_at(p.x, p.z));
            assert!(rock.scale.x >= 0.3 * 0.7 && rock.scale.x <= 1.5 * 1.3);
        }
    }

    #[test]
    fn test_grass_hugs_trail() {
        let world = world();
        let grass = scatter(&world, &ScatterRule::grass(), region_seed("default"), 200);
        assert!(!grass.is_empty());
        for tuft in &grass {
            let p = tuft.position;
            let dist = (p.x - world.path_center_at(p.z)).abs();
            assert!((1.5 - 1e-9..=13.5 + 1e-9).contains(&dist), "dist {dist}");
            assert_eq!(p.y, world.height_at(p.x, p.z));
            assert_eq!(tuft.rotation.x, 0.0);
            assert_eq!(tuft.scale.x, tuft.scale.y);
        }
    }

    #[test]
    fn test_trail_pebbles_sit_on_trail() {
        let world = world();
        let pebbles = scatter(&world, &ScatterRule::trail_pebbles(), region_seed("default"), 100);
        assert_eq!(pebbles.len(), 100);
        for pebble in &pebbles {
            let p = pebble.position;
            assert!((p.x - world.path_center_at(p.z)).abs() <= 2.5);
            assert_eq!(p.y, world.height_at(p.x, p.z) + 0.05);
        }
    }

    #[test]
    fn test_clutter_spans_terrain_length() {
        let world = world();
        for rule in [ScatterRule::grass(), ScatterRule::trail_pebbles()] {
            let placed = scatter(&world, &rule, region_seed("default"), 100);
            assert!(placed.iter().all(|p| p.position.z.abs() <= 600.0));
            assert!(placed.iter().any(|p| p.position.z.abs() > 300.0), "{}", rule.name);
        }
    }

    #[test]
    fn test_trees_pushed_off_trail() {
        let world = world();
        let trees = scatter(&world, &ScatterRule::trees(), region_seed("default"), 120);
        assert_eq!(trees.len(), 120);
        for tree in &trees {
            let p = tree.position;
            assert!((p.x - world.path_center_at(p.z)).abs() >= 4.0);
        }
    }

    #[test]
    fn test_impossible_rule_places_nothing() {
        let world = world();
        let rule = ScatterRule {
            cluster: Some(Cluster { frequency: 0.1, threshold: 2.0 }),
            ..ScatterRule::pebbles()
        };
        assert!(scatter(&world, &rule, WorldSeed::new(1), 10).is_empty());
    }

    #[test]
    fn test_color_helpers() {
        let c = Rgb::from_hex(0x00ff_0000);
        assert_eq!(c, Rgb { r: 1.0, g: 0.0, b: 0.0 });
        let mid = Rgb::from_hex(0x0000_0000).lerp(Rgb::from_hex(0x00ff_ffff), 0.5);
        assert!((mid.g - 0.5).abs() < 1e-6);

        let stone = Rgb::from_hex(0x0057_534e);
        let same = stone.offset_lightness(0.0);
        assert!((same.r - stone.r).abs() < 1e-5);
        assert!((same.b - stone.b).abs() < 1e-5);
        let lighter = stone.offset_lightness(0.1);
        assert!(lighter.r > stone.r && lighter.g > stone.g && lighter.b > stone.b);
        assert_eq!(stone.offset_lightness(2.0), Rgb { r: 1.0, g: 1.0, b: 1.0 });
    }
}
