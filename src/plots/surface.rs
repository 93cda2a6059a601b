//! Triangulated 3D surface plot.
//!
//! Scattered `(x, y, z)` points are Delaunay-triangulated in the xy plane,
//! each triangle is colored by its mean z through a color scale, shaded by a
//! fixed light source, and drawn back-to-front (painter's algorithm) inside a
//! 3D axes box with translucent back panes and grid lines.

use tracing::{debug, instrument};

use crate::camera::{Camera, Projection, Viewport};
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::Vec3;
use crate::render::{draw_line_aa, fill_convex_polygon, fill_triangle};
use crate::sample::SurfaceSamples;
use crate::scale::{nice_ticks, ColorScale, LinearScale, Scale};
use crate::triangulation::Triangulation;

/// Axes box proportions (x, y, z).
const BOX_ASPECT: [f64; 3] = [4.0, 4.0, 3.0];

/// Light direction, azimuth/altitude in degrees (225°, 19.4712°).
const LIGHT_AZIMUTH: f64 = 225.0;
const LIGHT_ALTITUDE: f64 = 19.4712;

/// Darkest shading factor, reached by faces pointing away from the light.
const MIN_BRIGHTNESS: f32 = 0.3;

/// Approximate number of grid lines per axis.
const GRID_TICKS: usize = 6;

/// Colormap for surface faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfacePalette {
    /// Viridis (perceptually uniform, colorblind-safe).
    #[default]
    Viridis,
    /// Magma (perceptually uniform).
    Magma,
    /// Greyscale.
    Greyscale,
}

impl SurfacePalette {
    fn color_scale(self, domain: (f64, f64)) -> Option<ColorScale> {
        match self {
            Self::Viridis => ColorScale::viridis(domain),
            Self::Magma => ColorScale::magma(domain),
            Self::Greyscale => ColorScale::greyscale(domain),
        }
    }
}

/// Counters reported by [`TriSurface::render`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    /// Input points.
    pub points: usize,
    /// Triangles drawn.
    pub triangles: usize,
    /// Extent of z values used for the color scale.
    pub z_range: (f64, f64),
}

/// Builder for triangulated surface plots.
#[derive(Debug, Clone)]
pub struct TriSurface {
    x_data: Vec<f64>,
    y_data: Vec<f64>,
    z_data: Vec<f64>,
    palette: SurfacePalette,
    edge_color: Option<Rgba>,
    camera: Camera,
    shade: bool,
    show_axes: bool,
    background: Rgba,
    width: u32,
    height: u32,
    mesh: Option<Triangulation>,
}

impl Default for TriSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TriSurface {
    /// Create a new surface plot builder (640×480, viridis, no edges).
    #[must_use]
    pub fn new() -> Self {
        Self {
            x_data: Vec::new(),
            y_data: Vec::new(),
            z_data: Vec::new(),
            palette: SurfacePalette::default(),
            edge_color: None,
            camera: Camera::default(),
            shade: true,
            show_axes: true,
            background: Rgba::WHITE,
            width: 640,
            height: 480,
            mesh: None,
        }
    }

    /// Set the x coordinates.
    #[must_use]
    pub fn x(mut self, data: &[f64]) -> Self {
        self.x_data = data.to_vec();
        self.mesh = None;
        self
    }

    /// Set the y coordinates.
    #[must_use]
    pub fn y(mut self, data: &[f64]) -> Self {
        self.y_data = data.to_vec();
        self.mesh = None;
        self
    }

    /// Set the z values.
    #[must_use]
    pub fn z(mut self, data: &[f64]) -> Self {
        self.z_data = data.to_vec();
        self.mesh = None;
        self
    }

    /// Set all three coordinate sequences from generated samples.
    #[must_use]
    pub fn samples(self, samples: &SurfaceSamples) -> Self {
        self.x(samples.x()).y(samples.y()).z(samples.z())
    }

    /// Set the face colormap.
    #[must_use]
    pub fn palette(mut self, palette: SurfacePalette) -> Self {
        self.palette = palette;
        self
    }

    /// Draw triangle edges in `color`, or not at all with `None` (the default).
    #[must_use]
    pub fn edge_color(mut self, color: Option<Rgba>) -> Self {
        self.edge_color = color;
        self
    }

    /// Set the view camera.
    #[must_use]
    pub fn camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Enable or disable light-source shading of faces.
    #[must_use]
    pub fn shade(mut self, shade: bool) -> Self {
        self.shade = shade;
        self
    }

    /// Show or hide the axes panes and grid.
    #[must_use]
    pub fn axes(mut self, show: bool) -> Self {
        self.show_axes = show;
        self
    }

    /// Set the background color.
    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }

    /// Set the output dimensions.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Number of input points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.x_data.len()
    }

    /// Number of triangles, once built.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, Triangulation::len)
    }

    /// Output dimensions `(width, height)`.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Background color.
    #[must_use]
    pub const fn background_color(&self) -> Rgba {
        self.background
    }

    /// Validate the data and triangulate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty, the sequences differ in length,
    /// a value is not finite, the dimensions are zero, or the points cannot
    /// be triangulated.
    pub fn build(mut self) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        if self.x_data.is_empty() || self.y_data.is_empty() || self.z_data.is_empty() {
            return Err(Error::EmptyData);
        }
        for other in [self.y_data.len(), self.z_data.len()] {
            if other != self.x_data.len() {
                return Err(Error::DataLengthMismatch { x_len: self.x_data.len(), y_len: other });
            }
        }
        if let Some(index) = self.z_data.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteData { axis: "z", index });
        }

        self.mesh = Some(Triangulation::delaunay(&self.x_data, &self.y_data)?);
        Ok(self)
    }

    /// Render the surface into `fb`.
    ///
    /// # Errors
    ///
    /// Returns an error if the plot was not built or its scales are invalid.
    #[instrument(skip_all)]
    pub fn render(&self, fb: &mut Framebuffer) -> Result<RenderStats> {
        let mesh = self
            .mesh
            .as_ref()
            .ok_or_else(|| Error::Rendering("surface must be built before rendering".to_string()))?;
        if self.z_data.len() != mesh.point_count() {
            return Err(Error::DataLengthMismatch { x_len: mesh.point_count(), y_len: self.z_data.len() });
        }

        let half = Vec3::new(BOX_ASPECT[0], BOX_ASPECT[1], BOX_ASPECT[2]) * (0.5 / BOX_ASPECT[0]);
        let axes = AxesBox::new(&self.x_data, &self.y_data, &self.z_data, half)?;

        let (w, h) = (fb.width() as f32, fb.height() as f32);
        let viewport = Viewport::new(w * 0.125, h * 0.11, w * 0.775, h * 0.77);
        let projection = self.camera.fit(half, viewport);

        if self.show_axes {
            axes.draw_panes(fb, &projection);
        }

        let z_range = axes.z_extent;
        let colors = self
            .palette
            .color_scale(z_range)
            .ok_or_else(|| Error::ScaleDomain("invalid z range for color scale".to_string()))?;
        let light = light_direction();

        let mut faces: Vec<(f64, [Vec3; 3], Rgba)> = mesh
            .triangles()
            .iter()
            .map(|&[a, b, c]| {
                let verts = [axes.to_box(self, a), axes.to_box(self, b), axes.to_box(self, c)];
                let mean_z = (self.z_data[a] + self.z_data[b] + self.z_data[c]) / 3.0;
                let mut color = colors.scale(mean_z);

                if self.shade {
                    if let Some(normal) = (verts[1] - verts[0]).cross(verts[2] - verts[0]).normalize() {
                        let t = ((normal.dot(light) + 1.0) / 2.0) as f32;
                        color = color.shade(MIN_BRIGHTNESS + (1.0 - MIN_BRIGHTNESS) * t);
                    }
                }

                let centroid = (verts[0] + verts[1] + verts[2]) * (1.0 / 3.0);
                (projection.depth(centroid), verts, color)
            })
            .collect();

        // Farthest first.
        faces.sort_by(|a, b| a.0.total_cmp(&b.0));

        for &(_, verts, color) in &faces {
            let screen = verts.map(|v| projection.project(v));
            fill_triangle(fb, screen, color);

            if let Some(edge) = self.edge_color {
                for i in 0..3 {
                    draw_line_aa(fb, screen[i], screen[(i + 1) % 3], edge);
                }
            }
        }

        debug!(triangles = faces.len(), width = fb.width(), height = fb.height(), "rendered surface");

        Ok(RenderStats { points: self.point_count(), triangles: faces.len(), z_range })
    }

    /// Render to a new framebuffer cleared to the background color.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(self.width, self.height)?;
        fb.clear(self.background);
        self.render(&mut fb)?;
        Ok(fb)
    }
}

/// Unit vector pointing towards the light.
fn light_direction() -> Vec3 {
    let az = (90.0 - LIGHT_AZIMUTH).to_radians();
    let alt = LIGHT_ALTITUDE.to_radians();
    Vec3::new(az.cos() * alt.cos(), az.sin() * alt.cos(), alt.sin())
}

/// Data-to-box mapping plus the axes decorations drawn behind the surface.
struct AxesBox {
    scales: [LinearScale; 3],
    ticks: [Vec<f64>; 3],
    half: [f64; 3],
    z_extent: (f64, f64),
}

impl AxesBox {
    fn new(x: &[f64], y: &[f64], z: &[f64], half: Vec3) -> Result<Self> {
        let half = [half.x, half.y, half.z];
        let mut scales = Vec::with_capacity(3);
        let mut ticks: [Vec<f64>; 3] = Default::default();

        for (axis, data) in [x, y, z].into_iter().enumerate() {
            let scale = LinearScale::from_data(data, (-half[axis], half[axis])).ok_or(Error::EmptyData)?;
            let (lo, hi) = scale.domain();
            ticks[axis] = nice_ticks(lo, hi, GRID_TICKS).into_iter().map(|t| scale.scale(t)).collect();
            scales.push(scale);
        }

        let z_extent = scales[2].domain();
        let scales = [scales[0], scales[1], scales[2]];
        Ok(Self { scales, ticks, half, z_extent })
    }

    fn to_box(&self, plot: &TriSurface, i: usize) -> Vec3 {
        Vec3::new(
            self.scales[0].scale(plot.x_data[i]),
            self.scales[1].scale(plot.y_data[i]),
            self.scales[2].scale(plot.z_data[i]),
        )
    }

    /// Fill the three panes facing away from the viewer and draw their grid.
    fn draw_panes(&self, fb: &mut Framebuffer, projection: &Projection) {
        let eye = projection.eye();
        let eye = [eye.x, eye.y, eye.z];

        for axis in 0..3 {
            // The back pane sits on the side of the box opposite the viewer.
            let level = if eye[axis] >= 0.0 { -self.half[axis] } else { self.half[axis] };
            let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);

            let corner = |su: f64, sv: f64| {
                let mut p = [0.0; 3];
                p[axis] = level;
                p[u] = su * self.half[u];
                p[v] = sv * self.half[v];
                projection.project(Vec3::from(p))
            };
            let quad = [corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0)];
            fill_convex_polygon(fb, &quad, Rgba::PANE);

            for (along, across) in [(u, v), (v, u)] {
                for &t in &self.ticks[along] {
                    let mut from = [0.0; 3];
                    from[axis] = level;
                    from[along] = t;
                    from[across] = -self.half[across];
                    let mut to = from;
                    to[across] = self.half[across];
                    draw_line_aa(
                        fb,
                        projection.project(Vec3::from(from)),
                        projection.project(Vec3::from(to)),
                        Rgba::GRID,
                    );
                }
            }

            for i in 0..4 {
                draw_line_aa(fb, quad[i], quad[(i + 1) % 4], Rgba::AXIS_EDGE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::generate_samples;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid_surface() -> TriSurface {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                x.push(f64::from(i));
                y.push(f64::from(j) + 0.01 * f64::from(i));
            }
        }
        let z: Vec<f64> = x.iter().zip(&y).map(|(a, b)| a * b).collect();
        TriSurface::new().x(&x).y(&y).z(&z).dimensions(160, 120)
    }

    #[test]
    fn test_build_triangulates() {
        let plot = grid_surface().build().unwrap();
        assert_eq!(plot.point_count(), 25);
        assert!(plot.triangle_count() >= 25);
    }

    #[test]
    fn test_empty_data() {
        assert!(matches!(TriSurface::new().build(), Err(Error::EmptyData)));
    }

    #[test]
    fn test_length_mismatch() {
        let result = TriSurface::new().x(&[0.0, 1.0, 0.0]).y(&[0.0, 0.0, 1.0]).z(&[1.0, 2.0]).build();
        assert!(matches!(result, Err(Error::DataLengthMismatch { x_len: 3, y_len: 2 })));
    }

    #[test]
    fn test_non_finite_z() {
        let result = TriSurface::new()
            .x(&[0.0, 1.0, 0.0])
            .y(&[0.0, 0.0, 1.0])
            .z(&[1.0, f64::INFINITY, 2.0])
            .build();
        assert!(matches!(result, Err(Error::NonFiniteData { axis: "z", index: 1 })));
    }

    #[test]
    fn test_zero_dimensions() {
        let result = grid_surface().dimensions(0, 10).build();
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_render_requires_build() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        assert!(grid_surface().render(&mut fb).is_err());
    }

    #[test]
    fn test_replacing_z_requires_rebuild() {
        let built = TriSurface::new()
            .x(&[0.0, 1.0, 0.0])
            .y(&[0.0, 0.0, 1.0])
            .z(&[0.0, 1.0, 2.0])
            .build()
            .unwrap();
        let shrunk = built.z(&[0.0]);

        assert_eq!(shrunk.triangle_count(), 0);
        let mut fb = Framebuffer::new(32, 32).unwrap();
        assert!(shrunk.render(&mut fb).is_err());
        assert!(matches!(shrunk.build(), Err(Error::DataLengthMismatch { x_len: 3, y_len: 1 })));
    }

    #[test]
    fn test_render_draws_something() {
        let plot = grid_surface().build().unwrap();
        let fb = plot.to_framebuffer().unwrap();
        assert_eq!((fb.width(), fb.height()), (160, 120));
        assert!(fb.count_non_background(Rgba::WHITE) > 160 * 120 / 10);
        // Corners stay outside the axes box.
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_render_stats() {
        let plot = grid_surface().build().unwrap();
        let mut fb = Framebuffer::new(160, 120).unwrap();
        fb.clear(Rgba::WHITE);
        let stats = plot.render(&mut fb).unwrap();
        assert_eq!(stats.points, 25);
        assert_eq!(stats.triangles, plot.triangle_count());
        assert_eq!(stats.z_range.0, 0.0);
        approx::assert_relative_eq!(stats.z_range.1, 16.16, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_surface_renders() {
        // Constant z must not break the color scale.
        let plot = TriSurface::new()
            .x(&[0.0, 1.0, 0.0, 1.0])
            .y(&[0.0, 0.0, 1.0, 1.0])
            .z(&[2.0; 4])
            .dimensions(64, 48)
            .build()
            .unwrap();
        assert!(plot.to_framebuffer().is_ok());
    }

    #[test]
    fn test_options_change_output() {
        let samples = generate_samples(&mut StdRng::seed_from_u64(1));
        let base = TriSurface::new().samples(&samples).dimensions(120, 90).build().unwrap();
        let plain = base.to_framebuffer().unwrap();

        let edged = base.clone().edge_color(Some(Rgba::BLACK)).to_framebuffer().unwrap();
        let flat = base.clone().shade(false).to_framebuffer().unwrap();
        let magma = base.clone().palette(SurfacePalette::Magma).to_framebuffer().unwrap();
        let bare = base.clone().axes(false).to_framebuffer().unwrap();

        assert_ne!(plain, edged);
        assert_ne!(plain, flat);
        assert_ne!(plain, magma);
        assert_ne!(plain, bare);
    }

    #[test]
    fn test_light_direction_is_unit() {
        approx::assert_relative_eq!(light_direction().length(), 1.0, epsilon = 1e-12);
    }
}
