//! Runtime-selected registration engine.
//!
//! [`DynRegistration`] wraps every concrete engine behind the
//! [`Registration`] trait so the scan-matching step can hold whichever engine
//! the operator picked without boxing.

use nalgebra::Matrix4;

use super::{
    AlignmentResult, EngineParams, FastVgicp, Gicp, Icp, Ndt, Registration, RegistrationError,
    RegistrationMethod,
};
use crate::core::types::PointCloud3D;

/// Registration engine selected at runtime.
///
/// Implements [`Registration`] by delegating to the wrapped engine.
#[derive(Debug, Clone)]
pub enum DynRegistration {
    /// Point-to-point ICP.
    Icp(Icp),
    /// Generalized ICP (`GICP` or `GICP_OMP`).
    Gicp(Gicp),
    /// Normal distributions transform (`NDT` or `NDT_OMP`).
    Ndt(Ndt),
    /// Voxelized generalized ICP.
    Vgicp(FastVgicp),
}

impl DynRegistration {
    /// Borrow the wrapped engine as a trait object.
    pub fn as_registration(&self) -> &dyn Registration {
        match self {
            DynRegistration::Icp(e) => e,
            DynRegistration::Gicp(e) => e,
            DynRegistration::Ndt(e) => e,
            DynRegistration::Vgicp(e) => e,
        }
    }

    fn as_registration_mut(&mut self) -> &mut dyn Registration {
        match self {
            DynRegistration::Icp(e) => e,
            DynRegistration::Gicp(e) => e,
            DynRegistration::Ndt(e) => e,
            DynRegistration::Vgicp(e) => e,
        }
    }

    /// Voxel resolution, for engines that carry one.
    pub fn resolution(&self) -> Option<f64> {
        match self {
            DynRegistration::Ndt(e) => Some(e.resolution()),
            DynRegistration::Vgicp(e) => Some(e.resolution()),
            DynRegistration::Icp(_) | DynRegistration::Gicp(_) => None,
        }
    }

    /// Move the engine into a box for callers that store trait objects.
    pub fn into_boxed(self) -> Box<dyn Registration> {
        match self {
            DynRegistration::Icp(e) => Box::new(e),
            DynRegistration::Gicp(e) => Box::new(e),
            DynRegistration::Ndt(e) => Box::new(e),
            DynRegistration::Vgicp(e) => Box::new(e),
        }
    }
}

impl From<Icp> for DynRegistration {
    fn from(engine: Icp) -> Self {
        DynRegistration::Icp(engine)
    }
}

impl From<Gicp> for DynRegistration {
    fn from(engine: Gicp) -> Self {
        DynRegistration::Gicp(engine)
    }
}

impl From<Ndt> for DynRegistration {
    fn from(engine: Ndt) -> Self {
        DynRegistration::Ndt(engine)
    }
}

impl From<FastVgicp> for DynRegistration {
    fn from(engine: FastVgicp) -> Self {
        DynRegistration::Vgicp(engine)
    }
}

impl Registration for DynRegistration {
    fn method(&self) -> RegistrationMethod {
        self.as_registration().method()
    }

    fn set_transformation_epsilon(&mut self, epsilon: f64) {
        self.as_registration_mut().set_transformation_epsilon(epsilon);
    }

    fn transformation_epsilon(&self) -> f64 {
        self.as_registration().transformation_epsilon()
    }

    fn set_maximum_iterations(&mut self, iterations: u32) {
        self.as_registration_mut().set_maximum_iterations(iterations);
    }

    fn maximum_iterations(&self) -> u32 {
        self.as_registration().maximum_iterations()
    }

    fn params(&self) -> EngineParams {
        self.as_registration().params()
    }

    fn align(
        &mut self,
        source: &PointCloud3D,
        target: &PointCloud3D,
        initial_guess: &Matrix4<f32>,
    ) -> Result<AlignmentResult, RegistrationError> {
        self.as_registration_mut().align(source, target, initial_guess)
    }
}
