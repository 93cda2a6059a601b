//! Rasterization of lines and filled polygons.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;

/// Draw an anti-aliased line using Wu's algorithm.
///
/// Two pixels are touched per step along the major axis, weighted by the
/// line's distance to each of them.
///
/// # References
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, from: Point, to: Point, color: Rgba) {
    let steep = (to.y - from.y).abs() > (to.x - from.x).abs();
    let (mut a, mut b) = if steep {
        ((from.y, from.x), (to.y, to.x))
    } else {
        ((from.x, from.y), (to.x, to.y))
    };
    if a.0 > b.0 {
        std::mem::swap(&mut a, &mut b);
    }

    let dx = b.0 - a.0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { (b.1 - a.1) / dx };

    let mut plot = |major: i32, minor: i32, coverage: f32| {
        let (x, y) = if steep { (minor, major) } else { (major, minor) };
        blend_coverage(fb, x, y, color, coverage);
    };

    // Endpoints get partial coverage along the major axis.
    let start = a.0.round();
    let start_minor = a.1 + gradient * (start - a.0);
    let start_gap = 1.0 - fract(a.0 + 0.5);
    plot(start as i32, start_minor.floor() as i32, (1.0 - fract(start_minor)) * start_gap);
    plot(start as i32, start_minor.floor() as i32 + 1, fract(start_minor) * start_gap);

    let end = b.0.round();
    let end_minor = b.1 + gradient * (end - b.0);
    let end_gap = fract(b.0 + 0.5);
    plot(end as i32, end_minor.floor() as i32, (1.0 - fract(end_minor)) * end_gap);
    plot(end as i32, end_minor.floor() as i32 + 1, fract(end_minor) * end_gap);

    let mut minor = start_minor + gradient;
    for major in (start as i32 + 1)..(end as i32) {
        plot(major, minor.floor() as i32, 1.0 - fract(minor));
        plot(major, minor.floor() as i32 + 1, fract(minor));
        minor += gradient;
    }
}

/// Fill a triangle.
pub fn fill_triangle(fb: &mut Framebuffer, vertices: [Point; 3], color: Rgba) {
    fill_convex_polygon(fb, &vertices, color);
}

/// Fill a convex polygon by scanline conversion.
///
/// A pixel is covered when its centre lies inside the polygon; translucent
/// colors are composited, opaque ones overwrite. Each pixel is touched at
/// most once, so translucent fills never double-blend.
pub fn fill_convex_polygon(fb: &mut Framebuffer, vertices: &[Point], color: Rgba) {
    if vertices.len() < 3 || vertices.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return;
    }

    let min_y = vertices.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = vertices.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
    let first_row = (min_y - 0.5).ceil().max(0.0) as i64;
    let last_row = (max_y - 0.5).floor().min(fb.height() as f32 - 1.0) as i64;

    for row in first_row..=last_row {
        let yc = row as f32 + 0.5;
        let mut left = f32::INFINITY;
        let mut right = f32::NEG_INFINITY;

        for (i, p) in vertices.iter().enumerate() {
            let q = vertices[(i + 1) % vertices.len()];
            let (lo, hi) = if p.y <= q.y { (*p, q) } else { (q, *p) };
            if yc < lo.y || yc > hi.y {
                continue;
            }
            let x = if (hi.y - lo.y).abs() < f32::EPSILON {
                left = left.min(lo.x.min(hi.x));
                hi.x.max(lo.x)
            } else {
                lo.x + (yc - lo.y) * (hi.x - lo.x) / (hi.y - lo.y)
            };
            left = left.min(x);
            right = right.max(x);
        }

        if left > right {
            continue;
        }

        let x0 = (left - 0.5).ceil().max(0.0);
        let x1 = ((right - 0.5).floor() + 1.0).min(fb.width() as f32);
        if x0 >= x1 {
            continue;
        }

        if color.a == 255 {
            fb.fill_span(row as u32, x0 as u32, x1 as u32, color);
        } else {
            for x in (x0 as u32)..(x1 as u32) {
                fb.blend_pixel(x, row as u32, color);
            }
        }
    }
}

#[inline]
fn blend_coverage(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, coverage: f32) {
    if x < 0 || y < 0 || coverage <= 0.0 {
        return;
    }
    let alpha = (f32::from(color.a) * coverage.min(1.0)).round() as u8;
    fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
}

#[inline]
fn fract(v: f32) -> f32 {
    v - v.floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(w: u32, h: u32) -> Framebuffer {
        let mut fb = Framebuffer::new(w, h).expect("framebuffer creation should succeed");
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_line_aa_touches_path() {
        let mut fb = white(100, 100);
        draw_line_aa(&mut fb, Point::new(10.0, 50.0), Point::new(90.0, 50.0), Rgba::BLACK);

        let px = fb.get_pixel(50, 50).unwrap();
        assert!(px.r < 128, "centre of a horizontal line should be dark, got {px:?}");
        assert_eq!(fb.get_pixel(50, 10), Some(Rgba::WHITE));
    }

    #[test]
    fn test_line_aa_steep_and_reversed() {
        let mut fb = white(100, 100);
        draw_line_aa(&mut fb, Point::new(40.0, 90.0), Point::new(45.0, 10.0), Rgba::BLACK);
        assert!(fb.count_non_background(Rgba::WHITE) >= 80);
    }

    #[test]
    fn test_line_aa_out_of_bounds() {
        let mut fb = white(20, 20);
        draw_line_aa(&mut fb, Point::new(-50.0, -50.0), Point::new(70.0, 70.0), Rgba::BLACK);
        assert!(fb.get_pixel(10, 10).unwrap().r < 255);
    }

    #[test]
    fn test_fill_triangle() {
        let mut fb = white(100, 100);
        let tri = [Point::new(10.0, 10.0), Point::new(90.0, 10.0), Point::new(10.0, 90.0)];
        fill_triangle(&mut fb, tri, Rgba::RED);

        assert_eq!(fb.get_pixel(20, 20), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(80, 80), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_triangle_winding_independent() {
        let mut cw = white(50, 50);
        let mut ccw = white(50, 50);
        let a = Point::new(5.0, 5.0);
        let b = Point::new(45.0, 12.0);
        let c = Point::new(20.0, 40.0);
        fill_triangle(&mut cw, [a, b, c], Rgba::BLUE);
        fill_triangle(&mut ccw, [a, c, b], Rgba::BLUE);
        assert_eq!(cw, ccw);
    }

    #[test]
    fn test_adjacent_triangles_leave_no_gap() {
        let mut fb = white(64, 64);
        let (a, b, c, d) = (
            Point::new(2.0, 2.0),
            Point::new(60.0, 5.0),
            Point::new(58.0, 61.0),
            Point::new(4.0, 57.0),
        );
        fill_triangle(&mut fb, [a, b, c], Rgba::BLACK);
        fill_triangle(&mut fb, [a, c, d], Rgba::BLACK);

        // Every pixel along the shared diagonal is covered.
        for i in 5..55 {
            let t = i as f32 / 64.0;
            let p = Point::new(a.x + (c.x - a.x) * t, a.y + (c.y - a.y) * t);
            assert_eq!(fb.get_pixel(p.x as u32, p.y as u32), Some(Rgba::BLACK));
        }
    }

    #[test]
    fn test_translucent_polygon_blends_once() {
        let mut fb = white(40, 40);
        let quad = [
            Point::new(5.0, 5.0),
            Point::new(35.0, 5.0),
            Point::new(35.0, 35.0),
            Point::new(5.0, 35.0),
        ];
        fill_convex_polygon(&mut fb, &quad, Rgba::new(0, 0, 0, 128));

        let inside = fb.get_pixel(20, 20).unwrap();
        let edge = fb.get_pixel(5, 20).unwrap();
        assert_eq!(inside, edge);
        assert!(inside.r > 120 && inside.r < 135);
    }

    #[test]
    fn test_degenerate_polygons_are_ignored() {
        let mut fb = white(10, 10);
        fill_convex_polygon(&mut fb, &[Point::new(1.0, 1.0), Point::new(5.0, 5.0)], Rgba::RED);
        fill_triangle(
            &mut fb,
            [Point::new(f32::NAN, 1.0), Point::new(5.0, 5.0), Point::new(1.0, 8.0)],
            Rgba::RED,
        );
        assert_eq!(fb.count_non_background(Rgba::WHITE), 0);
    }
}
