//! Delaunay triangulation of scattered points.
//!
//! Surfaces are built by triangulating the (x, y) projection of the samples
//! and lifting each vertex to its z value. The triangulation uses the
//! Bowyer-Watson incremental algorithm with an enclosing super triangle.
//!
//! # References
//!
//! - Bowyer, A. (1981). "Computing Dirichlet tessellations." *The Computer Journal*, 24(2).
//! - Watson, D. F. (1981). "Computing the n-dimensional Delaunay tessellation."
//!   *The Computer Journal*, 24(2).

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Error, Result};

/// Super triangle size, in multiples of the normalised point cloud extent.
const SUPER_TRIANGLE_SCALE: f64 = 20.0;

/// Twice the area below which a new triangle counts as collinear, in
/// normalised coordinates.
const COLLINEAR_AREA: f64 = f64::EPSILON;

/// A triangle in the working set with its cached circumcircle.
///
/// `neighbors[k]` is the cell across the edge opposite `vertices[k]`.
#[derive(Debug, Clone, Copy)]
struct Cell {
    vertices: [usize; 3],
    neighbors: [Option<usize>; 3],
    center: (f64, f64),
    radius_sq: f64,
    alive: bool,
}

impl Cell {
    fn new(vertices: [usize; 3], neighbors: [Option<usize>; 3], px: &[f64], py: &[f64]) -> Self {
        let (center, radius_sq) = circumcircle(vertices, px, py);
        Self { vertices, neighbors, center, radius_sq, alive: true }
    }

    fn circumcircle_contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        dx * dx + dy * dy < self.radius_sq
    }

    /// Endpoints of the edge opposite `vertices[k]`, in counter-clockwise order.
    fn edge(&self, k: usize) -> (usize, usize) {
        (self.vertices[(k + 1) % 3], self.vertices[(k + 2) % 3])
    }
}

/// Edge of the cavity left by removing the cells whose circumcircle holds
/// the new point, with the surviving cell on its far side.
#[derive(Debug, Clone, Copy)]
struct CavityEdge {
    a: usize,
    b: usize,
    outside: Option<usize>,
}

/// Triangles over a point set, as counter-clockwise index triples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangulation {
    triangles: Vec<[usize; 3]>,
    point_count: usize,
}

impl Triangulation {
    /// Triangulate the points `(xs[i], ys[i])`.
    ///
    /// Duplicate points are inserted once; the first occurrence is the one
    /// referenced by the triangles. Points are translated and scaled into the
    /// unit square first, so any finite magnitude works.
    ///
    /// # Errors
    ///
    /// Returns an error if the slices differ in length, hold fewer than three
    /// points, contain non-finite values, or every point is collinear.
    pub fn delaunay(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(Error::DataLengthMismatch { x_len: xs.len(), y_len: ys.len() });
        }
        let n = xs.len();
        if n < 3 {
            return Err(Error::InsufficientPoints { count: n });
        }
        for (axis, data) in [("x", xs), ("y", ys)] {
            if let Some(index) = data.iter().position(|v| !v.is_finite()) {
                return Err(Error::NonFiniteData { axis, index });
            }
        }

        // Halving first keeps `max - min` finite for any finite input.
        let (min_x, max_x) = bounds(xs);
        let (min_y, max_y) = bounds(ys);
        let span = (max_x * 0.5 - min_x * 0.5).max(max_y * 0.5 - min_y * 0.5);
        if span <= 0.0 {
            return Err(Error::DegenerateTriangulation);
        }

        // Input points followed by the three super-triangle vertices.
        let mut px: Vec<f64> = xs.iter().map(|&x| (x * 0.5 - min_x * 0.5) / span).collect();
        let mut py: Vec<f64> = ys.iter().map(|&y| (y * 0.5 - min_y * 0.5) / span).collect();
        let (cx, cy) = (bounds(&px).1 / 2.0, bounds(&py).1 / 2.0);
        let s = SUPER_TRIANGLE_SCALE;
        px.extend([cx - s, cx + s, cx]);
        py.extend([cy - s, cy - s, cy + s]);

        let mut mesh = Mesh {
            cells: vec![Cell::new([n, n + 1, n + 2], [None; 3], &px, &py)],
            stamps: vec![0],
            last: 0,
        };
        let mut seen = HashSet::with_capacity(n);
        let mut skipped = 0usize;

        for i in 0..n {
            if !seen.insert((xs[i].to_bits(), ys[i].to_bits())) || !mesh.insert(i, &px, &py) {
                skipped += 1;
            }
        }

        let triangles: Vec<[usize; 3]> = mesh
            .cells
            .into_iter()
            .filter(|c| c.alive && c.vertices.iter().all(|&idx| idx < n))
            .map(|c| c.vertices)
            .collect();

        if triangles.is_empty() {
            return Err(Error::DegenerateTriangulation);
        }

        debug!(points = n, triangles = triangles.len(), skipped, "delaunay triangulation complete");

        Ok(Self { triangles, point_count: n })
    }

    /// Triangles as index triples into the input points.
    #[must_use]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Number of triangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the triangulation is empty (never true for a successful build).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of input points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.point_count
    }
}

/// Working triangulation: cells are appended and retired, never reused.
struct Mesh {
    cells: Vec<Cell>,
    /// Last insertion that visited each cell, offset by one.
    stamps: Vec<usize>,
    /// Most recently created cell; walks start here.
    last: usize,
}

impl Mesh {
    /// Insert point `i`. Returns false when no cell's circumcircle holds it.
    fn insert(&mut self, i: usize, px: &[f64], py: &[f64]) -> bool {
        let (x, y) = (px[i], py[i]);
        let stamp = i + 1;

        let seed = self
            .locate(x, y, px, py)
            .filter(|&c| self.cells[c].circumcircle_contains(x, y))
            .or_else(|| self.cells.iter().position(|c| c.alive && c.circumcircle_contains(x, y)));
        let Some(seed) = seed else {
            return false;
        };

        // The cells whose circumcircle holds the point form a connected cavity.
        let mut bad = vec![seed];
        self.stamps[seed] = stamp;
        let mut next = 0;
        while next < bad.len() {
            let cell = self.cells[bad[next]];
            next += 1;
            for neighbor in cell.neighbors.into_iter().flatten() {
                if self.stamps[neighbor] != stamp
                    && self.cells[neighbor].alive
                    && self.cells[neighbor].circumcircle_contains(x, y)
                {
                    self.stamps[neighbor] = stamp;
                    bad.push(neighbor);
                }
            }
        }

        let mut boundary = Vec::new();
        for &c in &bad {
            let cell = self.cells[c];
            for k in 0..3 {
                let outside = cell.neighbors[k];
                if outside.map_or(true, |o| self.stamps[o] != stamp) {
                    let (a, b) = cell.edge(k);
                    boundary.push(CavityEdge { a, b, outside });
                }
            }
            self.cells[c].alive = false;
        }

        let mut created: Vec<(usize, usize, usize)> = Vec::with_capacity(boundary.len());
        for edge in boundary {
            let outside = edge.outside.filter(|&o| self.cells[o].alive);
            if orient(edge.a, edge.b, i, px, py) <= COLLINEAR_AREA {
                if let Some(o) = outside {
                    self.relink(o, edge.a, edge.b, None);
                }
                continue;
            }
            let id = self.cells.len();
            self.cells.push(Cell::new([edge.a, edge.b, i], [None, None, outside], px, py));
            self.stamps.push(0);
            if let Some(o) = outside {
                self.relink(o, edge.a, edge.b, Some(id));
            }
            created.push((edge.a, edge.b, id));
        }

        // New cells fan around `i`: [a, b, i] meets [b, _, i] across (b, i)
        // and [_, a, i] across (i, a).
        for &(a, b, id) in &created {
            self.cells[id].neighbors[0] = created.iter().find(|e| e.0 == b).map(|e| e.2);
            self.cells[id].neighbors[1] = created.iter().find(|e| e.1 == a).map(|e| e.2);
        }

        if let Some(&(_, _, id)) = created.last() {
            self.last = id;
        }
        true
    }

    /// Walk from the last created cell towards `(x, y)`.
    fn locate(&self, x: f64, y: f64, px: &[f64], py: &[f64]) -> Option<usize> {
        let mut current = self.last;
        for _ in 0..self.cells.len() {
            let cell = &self.cells[current];
            if !cell.alive {
                return None;
            }
            let exit = (0..3).find(|&k| {
                let (a, b) = cell.edge(k);
                (px[b] - px[a]) * (y - py[a]) - (py[b] - py[a]) * (x - px[a]) < 0.0
            });
            match exit {
                None => return Some(current),
                Some(k) => current = cell.neighbors[k]?,
            }
        }
        None
    }

    /// Point the neighbor slot of `cell` across edge `{a, b}` at `to`.
    fn relink(&mut self, cell: usize, a: usize, b: usize, to: Option<usize>) {
        let target = self.cells[cell];
        let slot = (0..3).find(|&k| {
            let (u, v) = target.edge(k);
            (u == b && v == a) || (u == a && v == b)
        });
        if let Some(k) = slot {
            self.cells[cell].neighbors[k] = to;
        }
    }
}

/// Twice the signed area of `(a, b, c)`; positive when counter-clockwise.
fn orient(a: usize, b: usize, c: usize, px: &[f64], py: &[f64]) -> f64 {
    (px[b] - px[a]) * (py[c] - py[a]) - (py[b] - py[a]) * (px[c] - px[a])
}

fn circumcircle(v: [usize; 3], px: &[f64], py: &[f64]) -> ((f64, f64), f64) {
    let (ax, ay) = (px[v[0]], py[v[0]]);
    let (bx, by) = (px[v[1]] - ax, py[v[1]] - ay);
    let (cx, cy) = (px[v[2]] - ax, py[v[2]] - ay);

    let d = 2.0 * (bx * cy - by * cx);
    if d.abs() < f64::MIN_POSITIVE {
        // Collinear: a circle that contains everything forces replacement.
        return ((ax, ay), f64::INFINITY);
    }

    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;

    ((ax + ux, ay + uy), ux * ux + uy * uy)
}

fn bounds(data: &[f64]) -> (f64, f64) {
    data.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}
