//! Rendered figures and the one-call plotting entry points.

use std::path::Path;

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::output::{PngEncoder, TerminalPreview};
use crate::plots::{RenderStats, TriSurface};
use crate::sample::{generate_samples, SurfaceSamples};

/// A rendered plot: the pixels plus what went into them.
#[derive(Debug, Clone)]
pub struct Figure {
    fb: Framebuffer,
    stats: RenderStats,
}

impl Figure {
    /// Render a built surface onto a new figure of the surface's size.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface was not built or rendering fails.
    pub fn render(surface: &TriSurface) -> Result<Self> {
        let (width, height) = surface.size();
        let mut fb = Framebuffer::new(width, height)?;
        fb.clear(surface.background_color());
        let stats = surface.render(&mut fb)?;
        Ok(Self { fb, stats })
    }

    /// Figure width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.fb.width()
    }

    /// Figure height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.fb.height()
    }

    /// The rendered pixels.
    #[must_use]
    pub const fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Render statistics.
    #[must_use]
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Number of triangles drawn.
    #[must_use]
    pub const fn triangle_count(&self) -> usize {
        self.stats.triangles
    }

    /// Save as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PngEncoder::write_to_file(&self.fb, path.as_ref())?;
        info!(path = %path.as_ref().display(), "saved figure");
        Ok(())
    }

    /// Encode as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        PngEncoder::to_bytes(&self.fb)
    }

    /// Render a text preview for a terminal.
    #[must_use]
    pub fn to_terminal(&self, preview: &TerminalPreview) -> String {
        preview.render(&self.fb)
    }
}

/// Plot samples as a viridis surface with the default figure settings.
///
/// # Errors
///
/// Returns an error if the samples cannot be triangulated.
#[instrument(skip_all, fields(points = samples.len()))]
pub fn plot(samples: &SurfaceSamples) -> Result<Figure> {
    let surface = TriSurface::new().samples(samples).build()?;
    debug!(points = surface.point_count(), triangles = surface.triangle_count(), "built surface");
    Figure::render(&surface)
}

/// Generate the random radial-sine samples from `rng` and plot them.
///
/// # Errors
///
/// Returns an error if plotting fails.
#[instrument(skip_all)]
pub fn plot_random<R: Rng + ?Sized>(rng: &mut R) -> Result<Figure> {
    let samples = generate_samples(rng);
    info!(points = samples.len(), "generated surface samples");
    plot(&samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::error::Error;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_plot_random_defaults() {
        let mut rng = StdRng::seed_from_u64(0);
        let fig = plot_random(&mut rng).unwrap();

        assert_eq!((fig.width(), fig.height()), (640, 480));
        assert!(fig.triangle_count() > 1000);
        assert_eq!(fig.stats().points, 1000);
        assert!(fig.framebuffer().count_non_background(Rgba::WHITE) > 10_000);
    }

    #[test]
    fn test_plot_is_deterministic_for_seed() {
        let a = plot_random(&mut StdRng::seed_from_u64(42)).unwrap();
        let b = plot_random(&mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.framebuffer(), b.framebuffer());
    }

    #[test]
    fn test_plot_rejects_collinear_samples() {
        let samples =
            SurfaceSamples::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0], vec![0.0; 3]).unwrap();
        assert!(matches!(plot(&samples), Err(Error::DegenerateTriangulation)));
    }

    #[test]
    fn test_render_custom_size() {
        let samples =
            SurfaceSamples::new(vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0], vec![0.0, 0.5, 1.0])
                .unwrap();
        let surface = TriSurface::new().samples(&samples).dimensions(200, 150).build().unwrap();
        let fig = Figure::render(&surface).unwrap();

        assert_eq!((fig.width(), fig.height()), (200, 150));
        assert_eq!(fig.triangle_count(), 1);
    }

    #[test]
    fn test_png_and_terminal_outputs() {
        let fig = plot_random(&mut StdRng::seed_from_u64(7)).unwrap();

        let bytes = fig.to_png_bytes().unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.png");
        fig.save_png(&path).unwrap();
        assert_eq!(&PngEncoder::read_from_file(&path).unwrap(), fig.framebuffer());

        let text = fig.to_terminal(&TerminalPreview::new().columns(40));
        assert_eq!(text.lines().count(), 15);
    }
}
