//! Concrete registration engines.
//!
//! Each engine is a parameter holder bound to an [`AlignmentBackend`]. The
//! engines start from the registration library's defaults and are configured
//! by the selector before being handed out.
//!
//! | Engine        | Methods             | Extra knobs                                  |
//! |---------------|---------------------|----------------------------------------------|
//! | [`Icp`]       | `ICP`               | none                                         |
//! | [`Gicp`]      | `GICP`, `GICP_OMP`  | none                                         |
//! | [`Ndt`]       | `NDT`, `NDT_OMP`    | resolution                                   |
//! | [`FastVgicp`] | `VGICP`             | resolution, threads, correspondence randomness |

use std::num::NonZeroUsize;

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use super::{AlignmentResult, BackendHandle, Registration, RegistrationError, RegistrationMethod};
use crate::core::types::PointCloud3D;

/// Library default convergence threshold (disabled).
pub const DEFAULT_TRANSFORMATION_EPSILON: f64 = 0.0;

/// Library default iteration cap.
pub const DEFAULT_MAXIMUM_ITERATIONS: u32 = 10;

/// Library default voxel resolution for density-grid engines (meters).
pub const DEFAULT_RESOLUTION: f64 = 1.0;

/// Library default neighbor count for covariance estimation.
pub const DEFAULT_CORRESPONDENCE_RANDOMNESS: u32 = 20;

/// Worker thread count for engines with internal parallelism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThreadCount {
    /// Use all available hardware threads.
    #[default]
    Auto,
    /// Use exactly this many threads.
    Fixed(NonZeroUsize),
}

impl ThreadCount {
    /// Convert from the raw library convention where `0` means auto-detect.
    pub fn from_raw(threads: usize) -> Self {
        match NonZeroUsize::new(threads) {
            Some(n) => ThreadCount::Fixed(n),
            None => ThreadCount::Auto,
        }
    }

    /// Raw library value (`0` for auto-detect).
    pub fn as_raw(&self) -> usize {
        match self {
            ThreadCount::Auto => 0,
            ThreadCount::Fixed(n) => n.get(),
        }
    }

    /// Concrete thread count, detecting available parallelism for `Auto`.
    pub fn resolve(&self) -> usize {
        match self {
            ThreadCount::Auto => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            ThreadCount::Fixed(n) => n.get(),
        }
    }
}

impl std::fmt::Display for ThreadCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadCount::Auto => write!(f, "auto"),
            ThreadCount::Fixed(n) => write!(f, "{}", n),
        }
    }
}

/// Full parameter set of an engine.
///
/// Handed to the backend on every alignment and used for diagnostics.
/// Variant-specific fields are `None` for engines that do not carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Catalog entry of the engine.
    pub method: RegistrationMethod,
    /// Convergence threshold on incremental transform change.
    pub transformation_epsilon: f64,
    /// Iteration cap.
    pub maximum_iterations: u32,
    /// Voxel resolution (meters).
    pub resolution: Option<f64>,
    /// Worker threads.
    pub num_threads: Option<ThreadCount>,
    /// Neighbors used for local covariance estimation.
    pub correspondence_randomness: Option<u32>,
}

impl EngineParams {
    fn common(method: RegistrationMethod, core: &EngineCore) -> Self {
        Self {
            method,
            transformation_epsilon: core.transformation_epsilon,
            maximum_iterations: core.maximum_iterations,
            resolution: None,
            num_threads: None,
            correspondence_randomness: None,
        }
    }
}

// ============================================================================
// Shared engine state
// ============================================================================

/// Parameters common to every engine plus the backend binding.
#[derive(Clone)]
struct EngineCore {
    backend: BackendHandle,
    transformation_epsilon: f64,
    maximum_iterations: u32,
}

impl EngineCore {
    fn new(backend: BackendHandle) -> Self {
        Self {
            backend,
            transformation_epsilon: DEFAULT_TRANSFORMATION_EPSILON,
            maximum_iterations: DEFAULT_MAXIMUM_ITERATIONS,
        }
    }

    fn align(
        &self,
        params: &EngineParams,
        source: &PointCloud3D,
        target: &PointCloud3D,
        initial_guess: &Matrix4<f32>,
    ) -> Result<AlignmentResult, RegistrationError> {
        if source.is_empty() {
            return Err(RegistrationError::EmptyCloud("source"));
        }
        if target.is_empty() {
            return Err(RegistrationError::EmptyCloud("target"));
        }

        log::trace!(
            "{} aligning {} -> {} points via {}",
            params.method,
            source.len(),
            target.len(),
            self.backend.name()
        );
        self.backend.align(params, source, target, initial_guess)
    }
}

impl std::fmt::Debug for EngineCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCore")
            .field("backend", &self.backend.name())
            .field("transformation_epsilon", &self.transformation_epsilon)
            .field("maximum_iterations", &self.maximum_iterations)
            .finish()
    }
}

macro_rules! impl_common_params {
    () => {
        fn set_transformation_epsilon(&mut self, epsilon: f64) {
            self.core.transformation_epsilon = epsilon;
        }

        fn transformation_epsilon(&self) -> f64 {
            self.core.transformation_epsilon
        }

        fn set_maximum_iterations(&mut self, iterations: u32) {
            self.core.maximum_iterations = iterations;
        }

        fn maximum_iterations(&self) -> u32 {
            self.core.maximum_iterations
        }

        fn align(
            &mut self,
            source: &PointCloud3D,
            target: &PointCloud3D,
            initial_guess: &Matrix4<f32>,
        ) -> Result<AlignmentResult, RegistrationError> {
            let params = self.params();
            self.core.align(&params, source, target, initial_guess)
        }
    };
}

// ============================================================================
// ICP
// ============================================================================

/// Point-to-point Iterative Closest Point engine.
#[derive(Debug, Clone)]
pub struct Icp {
    core: EngineCore,
}

impl Icp {
    /// Create an ICP engine with library defaults.
    pub fn new(backend: BackendHandle) -> Self {
        Self {
            core: EngineCore::new(backend),
        }
    }
}

impl Registration for Icp {
    fn method(&self) -> RegistrationMethod {
        RegistrationMethod::Icp
    }

    fn params(&self) -> EngineParams {
        EngineParams::common(self.method(), &self.core)
    }

    impl_common_params!();
}

// ============================================================================
// GICP
// ============================================================================

/// Generalized ICP engine, sequential or multi-threaded.
#[derive(Debug, Clone)]
pub struct Gicp {
    core: EngineCore,
    parallel: bool,
}

impl Gicp {
    /// Create a sequential GICP engine.
    pub fn new(backend: BackendHandle) -> Self {
        Self {
            core: EngineCore::new(backend),
            parallel: false,
        }
    }

    /// Create a multi-threaded GICP engine.
    pub fn parallel(backend: BackendHandle) -> Self {
        Self {
            core: EngineCore::new(backend),
            parallel: true,
        }
    }
}

impl Registration for Gicp {
    fn method(&self) -> RegistrationMethod {
        if self.parallel {
            RegistrationMethod::GicpOmp
        } else {
            RegistrationMethod::Gicp
        }
    }

    fn params(&self) -> EngineParams {
        EngineParams::common(self.method(), &self.core)
    }

    impl_common_params!();
}

// ============================================================================
// NDT
// ============================================================================

/// Normal Distributions Transform engine, sequential or multi-threaded.
#[derive(Debug, Clone)]
pub struct Ndt {
    core: EngineCore,
    parallel: bool,
    resolution: f64,
}

impl Ndt {
    /// Create a sequential NDT engine.
    pub fn new(backend: BackendHandle) -> Self {
        Self {
            core: EngineCore::new(backend),
            parallel: false,
            resolution: DEFAULT_RESOLUTION,
        }
    }

    /// Create a multi-threaded NDT engine.
    pub fn parallel(backend: BackendHandle) -> Self {
        Self {
            parallel: true,
            ..Self::new(backend)
        }
    }

    /// Set the voxel grid cell size (meters).
    pub fn set_resolution(&mut self, resolution: f64) {
        self.resolution = resolution;
    }

    /// Voxel grid cell size (meters).
    pub fn resolution(&self) -> f64 {
        self.resolution
    }
}

impl Registration for Ndt {
    fn method(&self) -> RegistrationMethod {
        if self.parallel {
            RegistrationMethod::NdtOmp
        } else {
            RegistrationMethod::Ndt
        }
    }

    fn params(&self) -> EngineParams {
        EngineParams {
            resolution: Some(self.resolution),
            ..EngineParams::common(self.method(), &self.core)
        }
    }

    impl_common_params!();
}

// ============================================================================
// VGICP
// ============================================================================

/// Voxelized generalized ICP engine.
#[derive(Debug, Clone)]
pub struct FastVgicp {
    core: EngineCore,
    num_threads: ThreadCount,
    resolution: f64,
    correspondence_randomness: u32,
}

impl FastVgicp {
    /// Create a VGICP engine with library defaults.
    pub fn new(backend: BackendHandle) -> Self {
        Self {
            core: EngineCore::new(backend),
            num_threads: ThreadCount::Auto,
            resolution: DEFAULT_RESOLUTION,
            correspondence_randomness: DEFAULT_CORRESPONDENCE_RANDOMNESS,
        }
    }

    /// Set the worker thread count.
    pub fn set_num_threads(&mut self, threads: ThreadCount) {
        self.num_threads = threads;
    }

    /// Worker thread count.
    pub fn num_threads(&self) -> ThreadCount {
        self.num_threads
    }

    /// Set the voxel size (meters).
    pub fn set_resolution(&mut self, resolution: f64) {
        self.resolution = resolution;
    }

    /// Voxel size (meters).
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Set the neighbor count for covariance estimation.
    pub fn set_correspondence_randomness(&mut self, k: u32) {
        self.correspondence_randomness = k;
    }

    /// Neighbor count for covariance estimation.
    pub fn correspondence_randomness(&self) -> u32 {
        self.correspondence_randomness
    }
}

impl Registration for FastVgicp {
    fn method(&self) -> RegistrationMethod {
        RegistrationMethod::Vgicp
    }

    fn params(&self) -> EngineParams {
        EngineParams {
            resolution: Some(self.resolution),
            num_threads: Some(self.num_threads),
            correspondence_randomness: Some(self.correspondence_randomness),
            ..EngineParams::common(self.method(), &self.core)
        }
    }

    impl_common_params!();
}
