//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (axis position, color).

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty (min equals max) or not finite.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(Error::ScaleDomain("Domain bounds must be finite".to_string()));
        }
        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { domain_min: domain.0, domain_max: domain.1, range_min: range.0, range_max: range.1 })
    }

    /// Create a scale spanning the extent of `data`.
    ///
    /// Constant data is widened by ±0.5 so the scale has a non-empty domain.
    #[must_use]
    pub fn from_data(data: &[f64], range: (f64, f64)) -> Option<Self> {
        let (min, max) = extent(data)?;
        let (min, max) = if (max - min).abs() < f64::EPSILON { (min - 0.5, max + 0.5) } else { (min, max) };
        Self::new((min, max), range).ok()
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// `(min, max)` of a slice, `None` if empty.
#[must_use]
pub fn extent(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Round tick positions inside `[min, max]`, roughly `target` of them.
///
/// Steps are 1, 2 or 5 times a power of ten (Heckbert's "nice numbers",
/// Graphics Gems, 1990).
#[must_use]
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite()) || max <= min || target < 2 {
        return Vec::new();
    }

    let range = nice_number(max - min, false);
    let step = nice_number(range / (target - 1) as f64, true);
    let tolerance = step * 1e-9;

    let mut ticks = Vec::new();
    let mut k = (min / step).ceil();
    while k * step <= max + tolerance {
        ticks.push(k * step);
        k += 1.0;
    }
    ticks
}

fn nice_number(value: f64, round: bool) -> f64 {
    let exponent = value.log10().floor();
    let fraction = value / 10f64.powf(exponent);

    let nice = if round {
        match fraction {
            f if f < 1.5 => 1.0,
            f if f < 3.0 => 2.0,
            f if f < 7.0 => 5.0,
            _ => 10.0,
        }
    } else {
        match fraction {
            f if f <= 1.0 => 1.0,
            f if f <= 2.0 => 2.0,
            f if f <= 5.0 => 5.0,
            _ => 10.0,
        }
    };

    nice * 10f64.powf(exponent)
}

/// Piecewise-linear color scale for mapping values to colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f64,
    domain_max: f64,
}

impl ColorScale {
    /// Create a color scale from evenly spaced color stops.
    ///
    /// # Errors
    ///
    /// Returns an error if `colors` is empty or the domain is empty.
    pub fn new(colors: Vec<Rgba>, domain: (f64, f64)) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::ScaleDomain("Color scale requires at least one color".to_string()));
        }
        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { colors, domain_min: domain.0, domain_max: domain.1 })
    }

    /// Viridis (perceptually uniform, colorblind-safe), sampled at 9 stops.
    #[must_use]
    pub fn viridis(domain: (f64, f64)) -> Option<Self> {
        Self::new(
            vec![
                Rgba::rgb(68, 1, 84),
                Rgba::rgb(71, 44, 122),
                Rgba::rgb(59, 82, 139),
                Rgba::rgb(44, 114, 142),
                Rgba::rgb(33, 145, 140),
                Rgba::rgb(40, 174, 128),
                Rgba::rgb(94, 201, 98),
                Rgba::rgb(173, 220, 48),
                Rgba::rgb(253, 231, 37),
            ],
            domain,
        )
        .ok()
    }

    /// Magma (sequential, perceptually uniform).
    #[must_use]
    pub fn magma(domain: (f64, f64)) -> Option<Self> {
        Self::new(
            vec![
                Rgba::rgb(0, 0, 4),
                Rgba::rgb(81, 18, 124),
                Rgba::rgb(183, 55, 121),
                Rgba::rgb(252, 137, 97),
                Rgba::rgb(252, 253, 191),
            ],
            domain,
        )
        .ok()
    }

    /// Black to white.
    #[must_use]
    pub fn greyscale(domain: (f64, f64)) -> Option<Self> {
        Self::new(vec![Rgba::BLACK, Rgba::WHITE], domain).ok()
    }
}

impl Scale<f64, Rgba> for ColorScale {
    fn scale(&self, value: f64) -> Rgba {
        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let t = ((value - self.domain_min) / (self.domain_max - self.domain_min)).clamp(0.0, 1.0);
        let segments = self.colors.len() - 1;
        let pos = t * segments as f64;
        let segment = (pos.floor() as usize).min(segments - 1);

        self.colors[segment].lerp(self.colors[segment + 1], (pos - segment as f64) as f32)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (*self.colors.first().unwrap_or(&Rgba::BLACK), *self.colors.last().unwrap_or(&Rgba::WHITE))
    }
}
