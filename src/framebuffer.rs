//! RGBA framebuffer that figures are rasterized into.
//!
//! Rows are padded to a 64-byte stride so that row operations stay aligned for
//! wide SIMD registers.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Row alignment in bytes (AVX-512 register width).
const SIMD_ALIGNMENT: usize = 64;

/// Row-major RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// RGBA bytes, `stride` bytes per row.
    pixels: Vec<u8>,
    stride: usize,
}

impl Framebuffer {
    /// Create a transparent framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use surface_plotter::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(640, 480).unwrap();
    /// assert_eq!(fb.pixel_count(), 640 * 480);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * 4;
        let stride = row_bytes.next_multiple_of(SIMD_ALIGNMENT);

        Ok(Self { width, height, pixels: vec![0; stride * height as usize], stride })
    }

    /// Build a framebuffer from tightly packed RGBA bytes (e.g. a decoded PNG).
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or `data` has the wrong length.
    pub fn from_rgba(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let mut fb = Self::new(width, height)?;
        let row_bytes = (width as usize) * 4;

        if data.len() != row_bytes * height as usize {
            return Err(Error::DataLengthMismatch {
                x_len: row_bytes * height as usize,
                y_len: data.len(),
            });
        }

        for (y, src) in data.chunks_exact(row_bytes).enumerate() {
            let start = y * fb.stride;
            fb.pixels[start..start + row_bytes].copy_from_slice(src);
        }

        Ok(fb)
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// One row of RGBA bytes, without stride padding.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.stride;
        Some(&self.pixels[start..start + (self.width as usize) * 4])
    }

    /// Fill the whole buffer with one color.
    pub fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        let row_bytes = (self.width as usize) * 4;

        for row in self.pixels.chunks_exact_mut(self.stride) {
            for px in row[..row_bytes].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Fill the half-open span `[x0, x1)` of row `y`, clamped to the buffer.
    pub fn fill_span(&mut self, y: u32, x0: u32, x1: u32, color: Rgba) {
        if y >= self.height {
            return;
        }
        let x1 = x1.min(self.width);
        if x0 >= x1 {
            return;
        }

        let rgba = color.to_array();
        let start = self.pixel_index(x0, y);
        let end = self.pixel_index(x1, y);
        for px in self.pixels[start..end].chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Color at a pixel, `None` if out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.pixel_index(x, y);
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(Rgba::from_array(px))
    }

    /// Overwrite a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Composite `color` over the existing pixel ("over" operator).
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if color.a == 255 {
            self.set_pixel(x, y, color);
            return;
        }
        let Some(dst) = self.get_pixel(x, y) else {
            return;
        };

        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(dst.a) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        let mix = |s: u8, d: u8| {
            ((f32::from(s) * src_a + f32::from(d) * dst_a * (1.0 - src_a)) / out_a).round() as u8
        };
        self.set_pixel(
            x,
            y,
            Rgba::new(
                mix(color.r, dst.r),
                mix(color.g, dst.g),
                mix(color.b, dst.b),
                (out_a * 255.0).round() as u8,
            ),
        );
    }

    /// Pixel data without stride padding, as PNG encoders expect.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = (self.width as usize) * 4;
        let mut compact = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.pixels.chunks_exact(self.stride) {
            compact.extend_from_slice(&row[..row_bytes]);
        }
        compact
    }

    /// Number of pixels that differ from `background`.
    #[must_use]
    pub fn count_non_background(&self, background: Rgba) -> usize {
        let bg = background.to_array();
        (0..self.height)
            .filter_map(|y| self.row(y))
            .map(|row| row.chunks_exact(4).filter(|px| *px != bg).count())
            .sum()
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }
}
