//! Baseline image regression for the random surface plot.
//!
//! The seeded figure is compared against the committed
//! `tests/baseline_images/surface.png`. Set `SURFACE_PLOTTER_BLESS=1` to
//! regenerate it after an intentional rendering change.
//!
//! Run: cargo test --test baseline_image_test

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_plotter::compare::{check_against_baseline, compare_images, BaselineOutcome, BLESS_ENV};
use surface_plotter::output::PngEncoder;
use surface_plotter::plot_random;

/// RMS tolerance on a 0-255 scale. Absorbs last-bit differences between
/// platform `sin`/`hypot` implementations.
const TOLERANCE: f32 = 2.0;

fn baseline_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("baseline_images").join("surface.png")
}

#[test]
fn surface_matches_baseline() {
    surface_plotter::configure_logging();

    let mut rng = StdRng::seed_from_u64(0);
    let figure = plot_random(&mut rng).expect("seeded plot should render");
    assert_eq!((figure.width(), figure.height()), (640, 480));

    let blessing = std::env::var(BLESS_ENV).is_ok_and(|v| v.trim() == "1");
    match check_against_baseline(figure.framebuffer(), baseline_path(), TOLERANCE) {
        Ok(BaselineOutcome::Matched(report)) => assert!(report.rms <= TOLERANCE),
        Ok(BaselineOutcome::Created) => assert!(blessing, "baseline rewritten without {BLESS_ENV}=1"),
        Err(e) => panic!("surface plot differs from baseline: {e}"),
    }
}

#[test]
fn baseline_is_committed() {
    let baseline = PngEncoder::read_from_file(baseline_path()).expect("baseline image is checked in");
    assert_eq!((baseline.width(), baseline.height()), (640, 480));
}

#[test]
fn seeded_figures_are_identical() {
    let first = plot_random(&mut StdRng::seed_from_u64(0)).unwrap();
    let second = plot_random(&mut StdRng::seed_from_u64(0)).unwrap();

    let report = compare_images(first.framebuffer(), second.framebuffer(), 0.0).unwrap();
    assert!(report.passed(), "rms = {}", report.rms);
    assert_eq!(first.to_png_bytes().unwrap(), second.to_png_bytes().unwrap());
}

#[test]
fn different_seeds_differ() {
    let a = plot_random(&mut StdRng::seed_from_u64(0)).unwrap();
    let b = plot_random(&mut StdRng::seed_from_u64(1)).unwrap();

    let report = compare_images(a.framebuffer(), b.framebuffer(), TOLERANCE).unwrap();
    assert!(!report.passed());
}
