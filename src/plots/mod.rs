//! Plot types.
//!
//! - [`TriSurface`]: shaded 3D surface over a Delaunay triangulation of scattered points

mod surface;

pub use surface::{RenderStats, SurfacePalette, TriSurface};
