//! # surface-plotter
//!
//! Random 3D surface plots rendered in pure Rust.
//!
//! Scattered points are sampled on a disc, lifted onto `z = sin(sqrt(x² + y²))`,
//! Delaunay-triangulated and drawn as a shaded, viridis-colored surface inside
//! a 3D axes box. Rendered figures can be saved as PNG, previewed in a
//! terminal, or compared pixel-by-pixel against a stored baseline image.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rand::{rngs::StdRng, SeedableRng};
//! use surface_plotter::prelude::*;
//!
//! surface_plotter::configure_logging();
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let figure = plot_random(&mut rng)?;
//! figure.save_png("surface.png")?;
//! # Ok::<(), surface_plotter::Error>(())
//! ```
//!
//! ## References
//!
//! - Bowyer, A. (1981). "Computing Dirichlet tessellations." *The Computer Journal* 24(2).
//! - Watson, D. F. (1981). "Computing the n-dimensional Delaunay tessellation."
//!   *The Computer Journal* 24(2).
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives (screen points, 3D vectors).
pub mod geometry;

/// Scale functions for data-to-visual mappings.
pub mod scale;

// ============================================================================
// Surface Pipeline
// ============================================================================

/// Random surface samples.
pub mod sample;

/// Delaunay triangulation of scattered points.
pub mod triangulation;

/// 3D view and orthographic projection.
pub mod camera;

/// High-level plot types.
pub mod plots;

/// Rendered figures and plotting entry points.
pub mod figure;

// ============================================================================
// Rendering and Output
// ============================================================================

/// Rasterization.
pub mod render;

/// Output encoders (PNG, terminal).
pub mod output;

/// Baseline image comparison.
pub mod compare;

// ============================================================================
// Logging and Errors
// ============================================================================

/// Logging configuration.
pub mod logging;

/// Error types for surface-plotter operations.
pub mod error;

pub use error::{Error, Result};
pub use figure::{plot, plot_random, Figure};
pub use logging::{configure_logging, configure_logging_with};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types for convenient imports.
///
/// ```rust
/// use surface_plotter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::color::Rgba;
    pub use crate::compare::{check_against_baseline, compare_images, BaselineOutcome};
    pub use crate::error::{Error, Result};
    pub use crate::figure::{plot, plot_random, Figure};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::output::{PngEncoder, PreviewStyle, TerminalPreview};
    pub use crate::plots::{SurfacePalette, TriSurface};
    pub use crate::sample::{generate_samples, SampleGenerator, SurfaceSamples};
}

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
