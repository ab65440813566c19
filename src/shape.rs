//! Procedural target shapes.
//!
//! Every shape is a point-sampling rule: each call to [`ShapeSpec::sample`]
//! draws one independent random point on or inside the shape. There is no
//! rejection loop, so every draw costs a constant number of RNG calls.
//!
//! ```ignore
//! let mut rng = SmallRng::seed_from_u64(7);
//! let p = ShapeSpec::Sphere(12.0).sample(&mut rng);
//! assert!((p.length() - 12.0).abs() < 1e-3);
//! ```

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;
use std::fmt;

/// Radius of Saturn's body.
pub const SATURN_BODY_RADIUS: f32 = 6.0;
/// Inner edge of Saturn's ring.
pub const SATURN_RING_INNER: f32 = 9.0;
/// Outer edge of Saturn's ring.
pub const SATURN_RING_OUTER: f32 = 15.0;
/// Half-thickness of Saturn's ring.
pub const SATURN_RING_HALF_THICKNESS: f32 = 0.25;
/// Probability that a Saturn sample lands on the body rather than the ring.
pub const SATURN_BODY_PROBABILITY: f32 = 0.4;

/// Half-depth of the heart's extrusion.
pub const HEART_HALF_DEPTH: f32 = 2.5;

/// Half-depth of a flower petal at its base.
pub const FLOWER_HALF_DEPTH: f32 = 2.0;

/// A target geometry for the particle field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeSpec {
    /// Sphere surface of the given radius.
    Sphere(f32),
    /// Extruded parametric heart curve, scaled by the given factor.
    Heart(f32),
    /// Planet body with a flat ring in the XZ plane.
    Saturn,
    /// Four-fold rose curve with petals that taper toward the tips.
    Flower,
    /// Everything at the origin. Used while a fist is held.
    Collapsed,
}

impl ShapeSpec {
    /// Short lowercase name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeSpec::Sphere(_) => "sphere",
            ShapeSpec::Heart(_) => "heart",
            ShapeSpec::Saturn => "saturn",
            ShapeSpec::Flower => "flower",
            ShapeSpec::Collapsed => "collapsed",
        }
    }

    /// Draw one random point from this shape.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        match *self {
            ShapeSpec::Sphere(radius) => sphere_point(rng, radius),
            ShapeSpec::Heart(scale) => heart_point(rng, scale),
            ShapeSpec::Saturn => saturn_point(rng),
            ShapeSpec::Flower => flower_point(rng),
            ShapeSpec::Collapsed => Vec3::ZERO,
        }
    }
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeSpec::Sphere(r) => write!(f, "sphere(r={})", r),
            ShapeSpec::Heart(s) => write!(f, "heart(scale={})", s),
            other => f.write_str(other.name()),
        }
    }
}

/// Draw one random point from `spec`.
#[inline]
pub fn sample<R: Rng + ?Sized>(spec: ShapeSpec, rng: &mut R) -> Vec3 {
    spec.sample(rng)
}

/// Uniform point on a sphere surface.
///
/// The polar angle comes from `acos(2v - 1)` rather than a uniform angle,
/// otherwise points bunch up at the poles.
fn sphere_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let u: f32 = rng.gen();
    let v: f32 = rng.gen();
    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();

    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

fn heart_point<R: Rng + ?Sized>(rng: &mut R, scale: f32) -> Vec3 {
    let t = rng.gen_range(0.0..TAU);
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    let z = rng.gen_range(-HEART_HALF_DEPTH..HEART_HALF_DEPTH);

    let k = 0.5 * scale;
    Vec3::new(x * k, y * k, z)
}

fn saturn_point<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    if rng.gen::<f32>() < SATURN_BODY_PROBABILITY {
        return sphere_point(rng, SATURN_BODY_RADIUS);
    }

    let angle = rng.gen_range(0.0..TAU);
    let dist = rng.gen_range(SATURN_RING_INNER..SATURN_RING_OUTER);
    Vec3::new(
        angle.cos() * dist,
        rng.gen_range(-SATURN_RING_HALF_THICKNESS..SATURN_RING_HALF_THICKNESS),
        angle.sin() * dist,
    )
}

fn flower_point<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let u = rng.gen_range(0.0..TAU);
    let v: f32 = rng.gen();
    let r = 10.0 * (4.0 * u).cos() + 2.0;
    // Thickness shrinks with v so petals taper
    let z = rng.gen_range(-FLOWER_HALF_DEPTH..FLOWER_HALF_DEPTH) * (1.0 - v);

    Vec3::new(r * u.cos() * 1.5, r * u.sin() * 1.5, z)
}
