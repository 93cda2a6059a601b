//! Error types for surface-plotter operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating, rendering or comparing figures.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, terminal output).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// PNG decoding error.
    #[error("PNG decoding error: {0}")]
    PngDecoding(#[from] png::DecodingError),

    /// Invalid dimensions for framebuffer or figure.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Coordinate sequences of different lengths.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of the first sequence.
        x_len: usize,
        /// Length of the mismatching sequence.
        y_len: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Too few points to form a surface.
    #[error("At least 3 points are required to triangulate, got {count}")]
    InsufficientPoints {
        /// Number of points supplied.
        count: usize,
    },

    /// NaN or infinite coordinate.
    #[error("Non-finite value in {axis} at index {index}")]
    NonFiniteData {
        /// Axis name (`x`, `y` or `z`).
        axis: &'static str,
        /// Offending index.
        index: usize,
    },

    /// All points collinear (or coincident), no triangle can be formed.
    #[error("Triangulation produced no triangles (points are collinear or coincident)")]
    DegenerateTriangulation,

    /// Scale domain error (e.g. equal min and max).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),

    /// Rendered image differs from its baseline by more than the tolerance.
    #[error("Image mismatch: RMS {rms:.3} exceeds tolerance {tolerance:.3} (diff: {diff_path:?})")]
    ImageMismatch {
        /// Root-mean-square difference on a 0-255 scale.
        rms: f32,
        /// Allowed tolerance.
        tolerance: f32,
        /// Where the diff image was written, if any.
        diff_path: Option<PathBuf>,
    },

    /// Baseline and rendered image sizes differ.
    #[error("Baseline size mismatch: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    BaselineSizeMismatch {
        /// Baseline width.
        expected_width: u32,
        /// Baseline height.
        expected_height: u32,
        /// Rendered width.
        actual_width: u32,
        /// Rendered height.
        actual_height: u32,
    },

    /// No baseline image exists and blessing was not requested.
    #[error("Missing baseline image {path:?} (set SURFACE_PLOTTER_BLESS=1 to create it)")]
    MissingBaseline {
        /// Expected baseline location.
        path: PathBuf,
    },

    /// Logging could not be configured.
    #[error("Logging configuration error: {0}")]
    Logging(String),
}
