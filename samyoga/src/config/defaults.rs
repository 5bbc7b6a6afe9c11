//! Default value functions for serde deserialization.

use crate::registration::RegistrationMethod;

pub fn method() -> RegistrationMethod {
    RegistrationMethod::Gicp
}

pub fn resolution() -> f32 {
    2.0
}

pub fn transformation_epsilon() -> f32 {
    1e-4
}

pub fn max_iterations() -> u32 {
    64
}
