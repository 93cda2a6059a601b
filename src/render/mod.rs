//! Rasterization of geometric primitives into a [`Framebuffer`](crate::framebuffer::Framebuffer).
//!
//! # Algorithms
//!
//! - **Wu's anti-aliased line**: axes box edges, grid lines and optional surface edges
//! - **Scanline convex fill**: surface triangles and translucent axes panes
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

mod primitives;

pub use primitives::{draw_line_aa, fill_convex_polygon, fill_triangle};
