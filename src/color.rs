//! RGBA color type used by the framebuffer, color scales and encoders.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Fill color of the 3D axes panes (95% grey with partial alpha).
    pub const PANE: Self = Self::new(242, 242, 242, 128);
    /// Color of the 3D axes box edges.
    pub const AXIS_EDGE: Self = Self::new(38, 38, 38, 255);
    /// Color of the 3D axes grid lines.
    pub const GRID: Self = Self::new(176, 176, 176, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;

        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b), mix(self.a, other.a))
    }

    /// Scale the RGB channels by `factor`, leaving alpha untouched.
    ///
    /// Used for Lambertian face shading; `factor` is clamped to `[0, 1]`.
    #[must_use]
    pub fn shade(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let dim = |c: u8| (f32::from(c) * factor).round() as u8;
        Self::new(dim(self.r), dim(self.g), dim(self.b), self.a)
    }

    /// Rec. 709 relative luminance in `[0, 1]`.
    #[must_use]
    pub fn luma(self) -> f32 {
        (0.2126 * f32::from(self.r) + 0.7152 * f32::from(self.g) + 0.0722 * f32::from(self.b))
            / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
        assert_eq!(Rgba::TRANSPARENT.a, 0);
    }

    #[test]
    fn test_rgba_lerp() {
        let mid = Rgba::BLACK.lerp(Rgba::WHITE, 0.5);
        assert_eq!(mid.r, 128);
        assert_eq!(mid.g, 128);
        assert_eq!(mid.b, 128);
    }

    #[test]
    fn test_lerp_boundaries() {
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 0.0), Rgba::BLACK);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 1.0), Rgba::WHITE);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, -0.5), Rgba::BLACK);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 1.5), Rgba::WHITE);
    }

    #[test]
    fn test_shade_keeps_alpha() {
        let c = Rgba::new(200, 100, 50, 77).shade(0.5);
        assert_eq!(c, Rgba::new(100, 50, 25, 77));
    }

    #[test]
    fn test_shade_clamps() {
        assert_eq!(Rgba::WHITE.shade(2.0), Rgba::WHITE);
        assert_eq!(Rgba::WHITE.shade(-1.0), Rgba::BLACK);
    }

    #[test]
    fn test_luma_extremes() {
        assert!(Rgba::BLACK.luma().abs() < 1e-6);
        assert!((Rgba::WHITE.luma() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_array_conversion() {
        let color = Rgba::new(10, 20, 30, 40);
        assert_eq!(Rgba::from_array(color.to_array()), color);
    }
}
