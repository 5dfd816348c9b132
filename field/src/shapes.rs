use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;
use rand::Rng;

use serde_derive::*;

/// Particles in the live buffer, and targets in every template.
pub const PARTICLE_COUNT: usize = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Sphere,
    Heart,
    Flower,
    Saturn,
    Spiral,
    Fireworks,
}

impl ShapeKind {
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Sphere,
            ShapeKind::Heart,
            ShapeKind::Flower,
            ShapeKind::Saturn,
            ShapeKind::Spiral,
            ShapeKind::Fireworks,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Heart => "heart",
            ShapeKind::Flower => "flower",
            ShapeKind::Saturn => "saturn",
            ShapeKind::Spiral => "spiral",
            ShapeKind::Fireworks => "fireworks",
        }
    }
}

/// An unknown shape identifier is a configuration error; there is no
/// fallback shape.
#[derive(Debug)]
pub struct InvalidShape(pub String);

impl fmt::Display for InvalidShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown shape `{}`", self.0)
    }
}

impl std::error::Error for InvalidShape {}

impl FromStr for ShapeKind {
    type Err = InvalidShape;

    fn from_str(s: &str) -> Result<ShapeKind, InvalidShape> {
        match s.to_lowercase().as_str() {
            "sphere" => Ok(ShapeKind::Sphere),
            "heart" => Ok(ShapeKind::Heart),
            "flower" => Ok(ShapeKind::Flower),
            "saturn" => Ok(ShapeKind::Saturn),
            "spiral" => Ok(ShapeKind::Spiral),
            "fireworks" => Ok(ShapeKind::Fireworks),
            _ => Err(InvalidShape(s.to_string())),
        }
    }
}

/// The point cloud particles are pulled toward. Read-only once produced;
/// the buffer is refilled in place when the active shape changes, never
/// reallocated.
pub struct ShapeTemplate {
    kind: ShapeKind,
    targets: Vec<Vector3<f32>>,
}

impl ShapeTemplate {
    pub fn new<R: Rng + ?Sized>(kind: ShapeKind, count: usize, rng: &mut R) -> ShapeTemplate {
        let mut template = ShapeTemplate {
            kind,
            targets: vec![Vector3::zeros(); count],
        };
        fill(kind, &mut template.targets, rng);
        template
    }

    /// Refills the target buffer for a new shape. A no-op when the kind is
    /// unchanged, so callers may invoke it every frame.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, kind: ShapeKind, rng: &mut R) {
        if kind == self.kind {
            return;
        }

        fill(kind, &mut self.targets, rng);
        self.kind = kind;
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[inline]
    pub fn targets(&self) -> &[Vector3<f32>] {
        &self.targets
    }
}

fn fill<R: Rng + ?Sized>(kind: ShapeKind, targets: &mut [Vector3<f32>], rng: &mut R) {
    let count = targets.len();

    for (i, target) in targets.iter_mut().enumerate() {
        *target = match kind {
            ShapeKind::Sphere => sample_sphere(rng),
            ShapeKind::Heart => sample_heart(rng),
            ShapeKind::Flower => sample_flower(rng),
            ShapeKind::Saturn => sample_saturn(rng),
            ShapeKind::Spiral => sample_spiral(i, count),
            ShapeKind::Fireworks => sample_fireworks(rng),
        };
    }
}

/// Uniform direction over the unit sphere.
fn solid_angle_direction<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f32> {
    let theta = rng.gen::<f32>() * 2. * PI;
    let phi = (2. * rng.gen::<f32>() - 1.).acos();

    Vector3::new(
        phi.sin() * theta.cos(),
        phi.sin() * theta.sin(),
        phi.cos(),
    )
}

fn sample_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f32> {
    // cube root keeps the density uniform over the volume
    solid_angle_direction(rng) * (2. * rng.gen::<f32>().cbrt())
}

fn sample_heart<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f32> {
    let t = rng.gen::<f32>() * 2. * PI;

    let x = 16. * t.sin().powi(3);
    let y = 13. * t.cos() - 5. * (2. * t).cos() - 2. * (3. * t).cos() - (4. * t).cos();
    let z = (rng.gen::<f32>() - 0.5) * 5.;

    Vector3::new(x * 0.15, y * 0.15, z * 0.5)
}

fn sample_flower<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f32> {
    let r_max = 3.;
    let r = rng.gen::<f32>().sqrt() * r_max;
    let theta = rng.gen::<f32>() * 2. * PI;

    let petals = 6.;
    let modulation = 1. + 0.5 * (petals * theta).sin();

    Vector3::new(
        r * theta.cos() * modulation,
        r * theta.sin() * modulation,
        // jitter tapers to zero at the rim
        (rng.gen::<f32>() - 0.5) * 1.5 * (1. - r / r_max),
    )
}

fn sample_saturn<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f32> {
    if rng.gen::<f32>() > 0.4 {
        // flat ring
        let angle = rng.gen::<f32>() * 2. * PI;
        let radius = 3. + rng.gen::<f32>() * 2.;

        Vector3::new(
            angle.cos() * radius,
            (rng.gen::<f32>() - 0.5) * 0.2,
            angle.sin() * radius,
        )
    } else {
        // solid planet
        solid_angle_direction(rng) * (1.5 * rng.gen::<f32>().cbrt())
    }
}

fn sample_spiral(i: usize, count: usize) -> Vector3<f32> {
    let angle = i as f32 * 0.1;
    let radius = i as f32 * 0.0005 * 10.;

    Vector3::new(
        angle.cos() * radius,
        (i as f32 / count as f32) * 6. - 3.,
        angle.sin() * radius,
    )
}

fn sample_fireworks<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f32> {
    // bias toward the shell, direction uniform over the sphere
    solid_angle_direction(rng) * (rng.gen::<f32>().powf(0.3) * 4.)
}
