//! Synthetic surface samples.
//!
//! Points are scattered over a disc in polar coordinates and lifted onto the
//! radial sine field `z = sin(sqrt(x² + y²))`. The random generator is always
//! passed in explicitly; seed it with [`rand::SeedableRng::seed_from_u64`] for
//! reproducible figures.

use std::f64::consts::TAU;

use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::Vec3;
use crate::scale::extent;

/// Number of points drawn per figure.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// Radius of the sampled disc (exclusive).
pub const DEFAULT_MAX_RADIUS: f64 = 6.0;

/// The scalar field plotted by default.
#[inline]
#[must_use]
pub fn radial_sine(x: f64, y: f64) -> f64 {
    x.hypot(y).sin()
}

/// Three equal-length coordinate sequences.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurfaceSamples {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl SurfaceSamples {
    /// Wrap existing coordinate sequences.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequences differ in length.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::DataLengthMismatch { x_len: x.len(), y_len: y.len() });
        }
        if x.len() != z.len() {
            return Err(Error::DataLengthMismatch { x_len: x.len(), y_len: z.len() });
        }
        Ok(Self { x, y, z })
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// X coordinates.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Y coordinates.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Z values.
    #[must_use]
    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Iterate the samples as 3D points.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.x.iter().zip(&self.y).zip(&self.z).map(|((&x, &y), &z)| Vec3::new(x, y, z))
    }

    /// Per-axis `(min, max)` extents, `None` when empty.
    #[must_use]
    pub fn extent(&self) -> Option<[(f64, f64); 3]> {
        Some([extent(&self.x)?, extent(&self.y)?, extent(&self.z)?])
    }
}

/// Draws random points on a disc and evaluates [`radial_sine`] on them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGenerator {
    count: usize,
    max_radius: f64,
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleGenerator {
    /// 1000 points on a disc of radius 6.
    #[must_use]
    pub const fn new() -> Self {
        Self { count: DEFAULT_SAMPLE_COUNT, max_radius: DEFAULT_MAX_RADIUS }
    }

    /// Set the number of points.
    #[must_use]
    pub const fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the (exclusive) disc radius.
    #[must_use]
    pub const fn max_radius(mut self, max_radius: f64) -> Self {
        self.max_radius = max_radius;
        self
    }

    /// Draw a fresh set of samples.
    ///
    /// All `count` angles are drawn before all `count` radii.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> SurfaceSamples {
        let theta: Vec<f64> = (0..self.count).map(|_| TAU * rng.gen::<f64>()).collect();
        let radius: Vec<f64> = (0..self.count).map(|_| self.max_radius * rng.gen::<f64>()).collect();

        let x: Vec<f64> = radius.iter().zip(&theta).map(|(r, t)| r * t.sin()).collect();
        let y: Vec<f64> = radius.iter().zip(&theta).map(|(r, t)| r * t.cos()).collect();
        let z = x.iter().zip(&y).map(|(&x, &y)| radial_sine(x, y)).collect();

        debug!(count = self.count, max_radius = self.max_radius, "generated surface samples");

        SurfaceSamples { x, y, z }
    }
}

/// Generate the default 1000-point sample set.
pub fn generate_samples<R: Rng + ?Sized>(rng: &mut R) -> SurfaceSamples {
    SampleGenerator::new().generate(rng)
}
