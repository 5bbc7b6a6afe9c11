//! Registration configuration section.

use serde::{Deserialize, Serialize, Serializer};

use super::defaults;
use crate::registration::{RegistrationMethod, SelectorState};

/// Scan-matching registration settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistrationSection {
    /// Registration method by catalog name
    #[serde(default = "defaults::method")]
    pub method: RegistrationMethod,

    /// NDT voxel resolution (meters)
    #[serde(default = "defaults::resolution", serialize_with = "shortest_f32")]
    pub resolution: f32,

    /// Convergence threshold on incremental transform change
    #[serde(
        default = "defaults::transformation_epsilon",
        serialize_with = "shortest_f32"
    )]
    pub transformation_epsilon: f32,

    /// Iteration cap
    #[serde(default = "defaults::max_iterations")]
    pub max_iterations: u32,
}

/// Write an `f32` as the shortest decimal that reads back to the same value.
///
/// TOML floats are 64-bit; widening directly would write `1e-4` as
/// `0.00009999999747378752`.
fn shortest_f32<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    let widened: f64 = value
        .to_string()
        .parse()
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_f64(widened)
}

impl Default for RegistrationSection {
    fn default() -> Self {
        Self {
            method: defaults::method(),
            resolution: defaults::resolution(),
            transformation_epsilon: defaults::transformation_epsilon(),
            max_iterations: defaults::max_iterations(),
        }
    }
}

impl RegistrationSection {
    /// Convert to a selector state, clamping values into the slider ranges.
    pub fn to_selector_state(&self) -> SelectorState {
        let mut state = SelectorState {
            selected_index: self.method.index(),
            resolution: self.resolution,
            transformation_epsilon: self.transformation_epsilon,
            max_iterations: self.max_iterations,
        };
        if state.clamp_to_bounds() {
            log::warn!(
                "Registration config out of range, clamped to resolution={} epsilon={} max_iterations={}",
                state.resolution,
                state.transformation_epsilon,
                state.max_iterations
            );
        }
        state
    }

    /// Capture a selector state, e.g. to persist panel edits.
    ///
    /// An index outside the catalog is stored as the GICP fallback.
    pub fn from_state(state: &SelectorState) -> Self {
        Self {
            method: state.method().unwrap_or(RegistrationMethod::FALLBACK),
            resolution: state.resolution,
            transformation_epsilon: state.transformation_epsilon,
            max_iterations: state.max_iterations,
        }
    }
}
