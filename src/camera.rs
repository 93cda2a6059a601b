//! View camera for 3D axes.
//!
//! Points live in a normalised axes box centred on the origin. The camera
//! looks at the box from a direction given by elevation and azimuth (the same
//! convention as most 3D plotting tools: azimuth rotates about +z starting at
//! +x, elevation tilts up from the xy plane) and projects orthographically.

use crate::geometry::{Point, Vec3};

/// Default elevation in degrees.
pub const DEFAULT_ELEVATION: f64 = 30.0;
/// Default azimuth in degrees.
pub const DEFAULT_AZIMUTH: f64 = -60.0;

/// Pixel rectangle the axes box is fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Orbit camera described by elevation and azimuth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    elevation: f64,
    azimuth: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Camera at 30° elevation and -60° azimuth.
    #[must_use]
    pub const fn new() -> Self {
        Self { elevation: DEFAULT_ELEVATION, azimuth: DEFAULT_AZIMUTH }
    }

    /// Set the elevation in degrees (clamped to ±90).
    #[must_use]
    pub fn elevation(mut self, degrees: f64) -> Self {
        self.elevation = degrees.clamp(-90.0, 90.0);
        self
    }

    /// Set the azimuth in degrees.
    #[must_use]
    pub const fn azimuth(mut self, degrees: f64) -> Self {
        self.azimuth = degrees;
        self
    }

    /// Elevation in degrees.
    #[must_use]
    pub const fn elevation_deg(&self) -> f64 {
        self.elevation
    }

    /// Azimuth in degrees.
    #[must_use]
    pub const fn azimuth_deg(&self) -> f64 {
        self.azimuth
    }

    /// Unit vector from the origin towards the viewer.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let (elev, azim) = (self.elevation.to_radians(), self.azimuth.to_radians());
        Vec3::new(elev.cos() * azim.cos(), elev.cos() * azim.sin(), elev.sin())
    }

    /// Screen-right and screen-up unit vectors.
    #[must_use]
    pub fn basis(&self) -> (Vec3, Vec3) {
        let azim = self.azimuth.to_radians();
        let right = Vec3::new(-azim.sin(), azim.cos(), 0.0);
        let up = self.eye().cross(right);
        (right, up)
    }

    /// Fit the box with half-extents `half` into `viewport`, returning a projector.
    ///
    /// The scale is chosen so that all eight box corners land inside the
    /// viewport for this view direction.
    #[must_use]
    pub fn fit(&self, half: Vec3, viewport: Viewport) -> Projection {
        let (right, up) = self.basis();
        let mut max_u = f64::EPSILON;
        let mut max_v = f64::EPSILON;

        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    let corner = Vec3::new(sx * half.x, sy * half.y, sz * half.z);
                    max_u = max_u.max(corner.dot(right).abs());
                    max_v = max_v.max(corner.dot(up).abs());
                }
            }
        }

        let scale = (f64::from(viewport.width) / (2.0 * max_u))
            .min(f64::from(viewport.height) / (2.0 * max_v));

        Projection { eye: self.eye(), right, up, scale, center: viewport.center() }
    }
}

/// Orthographic projection from box coordinates to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    eye: Vec3,
    right: Vec3,
    up: Vec3,
    scale: f64,
    center: Point,
}

impl Projection {
    /// Screen position of `p` (y grows downwards).
    #[must_use]
    pub fn project(&self, p: Vec3) -> Point {
        Point::new(
            self.center.x + (p.dot(self.right) * self.scale) as f32,
            self.center.y - (p.dot(self.up) * self.scale) as f32,
        )
    }

    /// Distance towards the viewer; larger values are nearer.
    #[must_use]
    pub fn depth(&self, p: Vec3) -> f64 {
        p.dot(self.eye)
    }

    /// Unit vector towards the viewer.
    #[must_use]
    pub const fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Pixels per box unit.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }
}
