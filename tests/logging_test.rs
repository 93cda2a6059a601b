//! Logging may be configured any number of times from any thread.

#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use surface_plotter::sample::SurfaceSamples;
use surface_plotter::{configure_logging, configure_logging_with, plot};

// Tests in this file share the process-wide subscriber.
static SERIAL: Mutex<()> = Mutex::new(());

#[test]
fn configure_logging_is_idempotent() {
    let _guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    for _ in 0..5 {
        configure_logging();
    }
    tracing::info!(target: "surface_plotter::tests", "still logging");
}

#[test]
fn last_call_wins() {
    let _guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    configure_logging_with("warn").unwrap();
    configure_logging_with("debug").unwrap();
    assert!(tracing::enabled!(tracing::Level::DEBUG));

    configure_logging_with("error").unwrap();
    assert!(!tracing::enabled!(tracing::Level::INFO));

    configure_logging();
}

#[test]
fn concurrent_configuration() {
    let _guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let handles: Vec<_> = (0..4).map(|_| std::thread::spawn(configure_logging)).collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn events_name_their_function() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let samples =
        SurfaceSamples::new(vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0], vec![0.0, 0.5, 1.0]).unwrap();
    tracing::subscriber::with_default(subscriber, || plot(&samples).unwrap());

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    let rendered = output.lines().find(|l| l.contains("rendered surface")).unwrap();
    assert!(rendered.contains("plot{points=3}:render:"), "{rendered}");
    let built = output.lines().find(|l| l.contains("built surface")).unwrap();
    assert!(built.contains("plot{points=3}:"), "{built}");
}
