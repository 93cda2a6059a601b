//! Property-based tests for sampling, triangulation and plotting.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_plotter::plots::TriSurface;
use surface_plotter::sample::{generate_samples, radial_sine, DEFAULT_MAX_RADIUS, DEFAULT_SAMPLE_COUNT};
use surface_plotter::triangulation::Triangulation;
use surface_plotter::Figure;

/// A triangle that is never collinear, plus arbitrary extra points.
fn point_cloud() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>)> {
    prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0, -5.0f64..5.0), 0..40).prop_map(
        |extra| {
            let mut xs = vec![-60.0, 60.0, 0.0];
            let mut ys = vec![-60.0, -60.0, 60.0];
            let mut zs = vec![0.0, 1.0, -1.0];
            for (x, y, z) in extra {
                xs.push(x);
                ys.push(y);
                zs.push(z);
            }
            (xs, ys, zs)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn samples_lie_on_radial_sine(seed in any::<u64>()) {
        let samples = generate_samples(&mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(samples.len(), DEFAULT_SAMPLE_COUNT);

        for p in samples.points() {
            let r = p.x.hypot(p.y);
            prop_assert!(r < DEFAULT_MAX_RADIUS + 1e-9);
            prop_assert!((p.z - radial_sine(p.x, p.y)).abs() < 1e-12);
        }
    }

    #[test]
    fn triangles_reference_valid_points((xs, ys, _zs) in point_cloud()) {
        let mesh = Triangulation::delaunay(&xs, &ys).unwrap();
        prop_assert!(!mesh.is_empty());
        for tri in mesh.triangles() {
            prop_assert!(tri.iter().all(|&i| i < xs.len()));
            prop_assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
        }
    }

    #[test]
    fn well_formed_input_always_plots((xs, ys, zs) in point_cloud()) {
        let surface = TriSurface::new()
            .x(&xs)
            .y(&ys)
            .z(&zs)
            .dimensions(160, 120)
            .build()
            .unwrap();
        let figure = Figure::render(&surface).unwrap();

        prop_assert_eq!((figure.width(), figure.height()), (160, 120));
        prop_assert!(figure.triangle_count() >= 1);
    }

    #[test]
    fn mismatched_lengths_are_rejected(n in 3usize..30, missing in 1usize..3) {
        let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let ys: Vec<f64> = (0..n).map(|i| (i * i) as f64).collect();
        let zs = vec![0.0; n - missing];

        let result = TriSurface::new().x(&xs).y(&ys).z(&zs).build();
        prop_assert!(result.is_err());
    }
}
