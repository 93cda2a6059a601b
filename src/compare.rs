//! Baseline image regression.
//!
//! Images are compared by the root-mean-square difference of their RGB
//! channels on a 0-255 scale. Alpha is ignored; figures are opaque.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use trueno::Vector;

use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::output::PngEncoder;

/// Environment variable that forces baselines to be rewritten.
pub const BLESS_ENV: &str = "SURFACE_PLOTTER_BLESS";

/// Differences are amplified by this factor in diff images.
const DIFF_GAIN: u16 = 10;

/// Result of comparing two images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonReport {
    /// RMS difference over RGB channels, 0-255 scale.
    pub rms: f32,
    /// Tolerance the comparison was made with.
    pub tolerance: f32,
}

impl ComparisonReport {
    /// True when the RMS difference is within tolerance.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.rms <= self.tolerance
    }
}

/// What [`check_against_baseline`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaselineOutcome {
    /// The image matched the stored baseline.
    Matched(ComparisonReport),
    /// Blessing was requested and the baseline was (re)written.
    Created,
}

/// Compare two images of the same size.
///
/// # Errors
///
/// Returns [`Error::BaselineSizeMismatch`] when the sizes differ.
pub fn compare_images(
    expected: &Framebuffer,
    actual: &Framebuffer,
    tolerance: f32,
) -> Result<ComparisonReport> {
    if (expected.width(), expected.height()) != (actual.width(), actual.height()) {
        return Err(Error::BaselineSizeMismatch {
            expected_width: expected.width(),
            expected_height: expected.height(),
            actual_width: actual.width(),
            actual_height: actual.height(),
        });
    }

    let mut diffs = Vec::with_capacity(expected.pixel_count() * 3);
    for y in 0..expected.height() {
        if let (Some(a), Some(b)) = (expected.row(y), actual.row(y)) {
            for (pa, pb) in a.chunks_exact(4).zip(b.chunks_exact(4)) {
                diffs.extend((0..3).map(|c| f32::from(pa[c]) - f32::from(pb[c])));
            }
        }
    }

    let diffs = Vector::from_vec(diffs);
    let mean_square = diffs
        .mul(&diffs)
        .and_then(|squares| squares.mean())
        .map_err(|e| Error::Rendering(format!("image difference failed: {e}")))?;

    Ok(ComparisonReport { rms: mean_square.sqrt(), tolerance })
}

/// Per-pixel absolute difference, amplified for visibility.
#[must_use]
pub fn diff_image(expected: &Framebuffer, actual: &Framebuffer) -> Option<Framebuffer> {
    let (w, h) = (expected.width(), expected.height());
    if (w, h) != (actual.width(), actual.height()) {
        return None;
    }

    let mut data = Vec::with_capacity(expected.pixel_count() * 4);
    for y in 0..h {
        let (a, b) = (expected.row(y)?, actual.row(y)?);
        for (pa, pb) in a.chunks_exact(4).zip(b.chunks_exact(4)) {
            for c in 0..3 {
                let d = u16::from(pa[c].abs_diff(pb[c])) * DIFF_GAIN;
                data.push(d.min(255) as u8);
            }
            data.push(255);
        }
    }
    Framebuffer::from_rgba(w, h, &data).ok()
}

/// Compare `actual` against the PNG baseline at `path`.
///
/// With `SURFACE_PLOTTER_BLESS=1` the baseline is (re)written from `actual`
/// instead of compared. On mismatch a `<name>-failed-diff.png` is written next
/// to the baseline.
///
/// # Errors
///
/// Returns [`Error::MissingBaseline`] when no baseline exists and blessing was
/// not requested, [`Error::ImageMismatch`] when the RMS difference exceeds
/// `tolerance`, [`Error::BaselineSizeMismatch`] for differently sized images,
/// or an I/O or PNG error.
pub fn check_against_baseline<P: AsRef<Path>>(
    actual: &Framebuffer,
    path: P,
    tolerance: f32,
) -> Result<BaselineOutcome> {
    let bless = std::env::var(BLESS_ENV).is_ok_and(|v| v.trim() == "1");
    check(actual, path.as_ref(), tolerance, bless)
}

fn check(actual: &Framebuffer, path: &Path, tolerance: f32, bless: bool) -> Result<BaselineOutcome> {
    if bless {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        PngEncoder::write_to_file(actual, path)?;
        info!(path = %path.display(), "wrote baseline image");
        return Ok(BaselineOutcome::Created);
    }
    if !path.exists() {
        warn!(path = %path.display(), "baseline image missing");
        return Err(Error::MissingBaseline { path: path.to_path_buf() });
    }

    let expected = PngEncoder::read_from_file(path)?;
    let report = compare_images(&expected, actual, tolerance)?;
    if report.passed() {
        return Ok(BaselineOutcome::Matched(report));
    }

    let diff_path = diff_path_for(path);
    let written = match diff_image(&expected, actual) {
        Some(diff) => PngEncoder::write_to_file(&diff, &diff_path).is_ok(),
        None => false,
    };
    warn!(rms = report.rms, tolerance, path = %path.display(), "image differs from baseline");

    Err(Error::ImageMismatch {
        rms: report.rms,
        tolerance,
        diff_path: written.then_some(diff_path),
    })
}

/// `dir/name.png` -> `dir/name-failed-diff.png`.
fn diff_path_for(path: &Path) -> PathBuf {
    let stem = path.file_stem().map_or_else(|| "image".into(), |s| s.to_string_lossy());
    path.with_file_name(format!("{stem}-failed-diff.png"))
}
