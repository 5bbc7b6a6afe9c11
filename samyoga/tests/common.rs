//! Test utilities for samyoga integration tests.
//!
//! Provides stand-in alignment backends, synthetic point clouds and a log
//! capture for asserting on warnings.

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::{Mutex, Once};

use log::{Level, LevelFilter, Log, Metadata, Record};
use nalgebra::{Matrix4, Translation3};
use samyoga::{
    AlignmentBackend, AlignmentResult, EngineParams, PointCloud3D, PointXyzRgb, RegistrationError,
};

/// Backend that records every parameter set it receives and returns the
/// initial guess as a converged result.
#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Mutex<Vec<EngineParams>>,
}

impl RecordingBackend {
    pub fn calls(&self) -> Vec<EngineParams> {
        self.calls.lock().unwrap().clone()
    }
}

impl AlignmentBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn align(
        &self,
        params: &EngineParams,
        _source: &PointCloud3D,
        _target: &PointCloud3D,
        initial_guess: &Matrix4<f32>,
    ) -> Result<AlignmentResult, RegistrationError> {
        self.calls.lock().unwrap().push(params.clone());
        Ok(AlignmentResult::converged(*initial_guess, 0.0, 1))
    }
}

/// Backend that estimates a pure translation from cloud centroids.
///
/// Good enough to check that results flow back through the engines.
pub struct CentroidBackend;

impl AlignmentBackend for CentroidBackend {
    fn name(&self) -> &str {
        "centroid"
    }

    fn align(
        &self,
        params: &EngineParams,
        source: &PointCloud3D,
        target: &PointCloud3D,
        initial_guess: &Matrix4<f32>,
    ) -> Result<AlignmentResult, RegistrationError> {
        let moved = source.transform(initial_guess);
        let (Some(s), Some(t)) = (moved.centroid(), target.centroid()) else {
            return Err(RegistrationError::Backend("empty cloud".to_string()));
        };
        let correction = Translation3::from(t - s).to_homogeneous();
        log::debug!("centroid alignment for {}", params.method);
        Ok(AlignmentResult::converged(correction * initial_guess, 0.0, 1))
    }
}

/// Create the corner points of an axis-aligned box.
pub fn create_box(width: f32, depth: f32, height: f32) -> PointCloud3D {
    let mut cloud = PointCloud3D::with_capacity(8);
    for &x in &[0.0, width] {
        for &y in &[0.0, depth] {
            for &z in &[0.0, height] {
                cloud.push(PointXyzRgb::with_rgb(x, y, z, [200, 200, 200]));
            }
        }
    }
    cloud
}

// ============================================================================
// Log capture
// ============================================================================

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Logger that keeps records on the thread that emitted them.
///
/// Tests run on separate threads, so each test only sees its own records.
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|c| c.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT_LOGGER: Once = Once::new();

/// Run `f` and return its result with the log records it emitted.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<(Level, String)>) {
    INIT_LOGGER.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    CAPTURED.with(|c| c.borrow_mut().clear());
    let result = f();
    let records = CAPTURED.with(|c| c.borrow_mut().drain(..).collect());
    (result, records)
}

/// Messages of the captured records at the given level.
pub fn messages_at(records: &[(Level, String)], level: Level) -> Vec<&str> {
    records
        .iter()
        .filter(|(l, _)| *l == level)
        .map(|(_, m)| m.as_str())
        .collect()
}
