//! Scan-matching registration: method catalog, engines, and selector.
//!
//! The selector turns an operator-edited [`SelectorState`] into a freshly
//! configured engine for every scan-matching call. Engines are configured
//! through the [`Registration`] capability trait and delegate the actual
//! alignment numerics to an [`AlignmentBackend`] supplied by a point-cloud
//! registration library.
//!
//! # Example
//!
//! ```ignore
//! use samyoga::registration::{Registration, RegistrationSelector, SelectorState};
//!
//! let selector = RegistrationSelector::with_backend(backend);
//! let state = SelectorState::default();
//!
//! let mut engine = selector.build_engine(&state);
//! let result = engine.align(&source, &target, &Matrix4::identity())?;
//! if result.converged {
//!     println!("Transform: {}", result.transform);
//! }
//! ```

mod dynamic;
mod engines;
mod method;
mod selector;

pub use dynamic::DynRegistration;
pub use engines::{
    DEFAULT_CORRESPONDENCE_RANDOMNESS, DEFAULT_MAXIMUM_ITERATIONS, DEFAULT_RESOLUTION,
    DEFAULT_TRANSFORMATION_EPSILON, EngineParams, FastVgicp, Gicp, Icp, Ndt, ThreadCount,
};
pub use method::{CATALOG_LEN, InvalidMethodSelection, METHOD_CATALOG, RegistrationMethod};
pub use selector::{
    MAX_ITERATIONS_RANGE, RESOLUTION_RANGE, RegistrationSelector, SelectorState,
    TRANSFORMATION_EPSILON_RANGE, VGICP_CORRESPONDENCE_RANDOMNESS, VGICP_RESOLUTION,
};

use std::sync::Arc;

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::PointCloud3D;

/// Result of a registration (alignment) call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Estimated transform from source to target frame.
    pub transform: Matrix4<f32>,

    /// Whether the algorithm converged within the iteration cap.
    pub converged: bool,

    /// Mean squared distance between corresponding points (lower is better).
    pub fitness_score: f64,

    /// Number of iterations performed.
    pub iterations: u32,
}

impl Default for AlignmentResult {
    fn default() -> Self {
        Self {
            transform: Matrix4::identity(),
            converged: false,
            fitness_score: f64::MAX,
            iterations: 0,
        }
    }
}

impl AlignmentResult {
    /// Create a failed result with identity transform.
    pub fn failed() -> Self {
        Self::default()
    }

    /// Create a converged result.
    pub fn converged(transform: Matrix4<f32>, fitness_score: f64, iterations: u32) -> Self {
        Self {
            transform,
            converged: true,
            fitness_score,
            iterations,
        }
    }
}

/// Errors raised while aligning two clouds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// Source or target cloud has no points.
    #[error("{0} cloud is empty")]
    EmptyCloud(&'static str),

    /// No registration library is attached to the engine.
    #[error("no alignment backend available for {0}")]
    BackendUnavailable(RegistrationMethod),

    /// The registration library reported a failure.
    #[error("alignment backend error: {0}")]
    Backend(String),
}

/// Capability interface shared by all registration engines.
///
/// Variant-specific knobs (resolution, thread count, correspondence
/// randomness) live on the concrete engine types and are applied before the
/// engine is exposed through this trait.
pub trait Registration: Send {
    /// Catalog entry this engine implements.
    fn method(&self) -> RegistrationMethod;

    /// Set the convergence threshold on incremental transform change.
    fn set_transformation_epsilon(&mut self, epsilon: f64);

    /// Current convergence threshold.
    fn transformation_epsilon(&self) -> f64;

    /// Set the iteration cap.
    fn set_maximum_iterations(&mut self, iterations: u32);

    /// Current iteration cap.
    fn maximum_iterations(&self) -> u32;

    /// Snapshot of every parameter this engine carries.
    fn params(&self) -> EngineParams;

    /// Align source point cloud to target point cloud.
    ///
    /// # Arguments
    ///
    /// * `source` - The point cloud to be transformed
    /// * `target` - The reference point cloud
    /// * `initial_guess` - Initial transform estimate (source frame to target frame)
    fn align(
        &mut self,
        source: &PointCloud3D,
        target: &PointCloud3D,
        initial_guess: &Matrix4<f32>,
    ) -> Result<AlignmentResult, RegistrationError>;
}

/// Numerical implementation of the registration algorithms.
///
/// Implemented by the point-cloud registration library. Receives the full
/// parameter set of the engine requesting the alignment and dispatches on
/// [`EngineParams::method`].
pub trait AlignmentBackend: Send + Sync {
    /// Get the name of this backend for logging/debugging.
    fn name(&self) -> &str;

    /// Run the alignment with the given parameters.
    fn align(
        &self,
        params: &EngineParams,
        source: &PointCloud3D,
        target: &PointCloud3D,
        initial_guess: &Matrix4<f32>,
    ) -> Result<AlignmentResult, RegistrationError>;
}

/// Backend used when no registration library is attached.
///
/// Engines built against it configure normally but refuse to align.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedBackend;

impl AlignmentBackend for DetachedBackend {
    fn name(&self) -> &str {
        "detached"
    }

    fn align(
        &self,
        params: &EngineParams,
        _source: &PointCloud3D,
        _target: &PointCloud3D,
        _initial_guess: &Matrix4<f32>,
    ) -> Result<AlignmentResult, RegistrationError> {
        Err(RegistrationError::BackendUnavailable(params.method))
    }
}

/// Shared handle to an alignment backend.
pub type BackendHandle = Arc<dyn AlignmentBackend>;
