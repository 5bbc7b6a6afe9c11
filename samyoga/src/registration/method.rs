//! Registration method catalog.
//!
//! The catalog is a fixed, ordered list of registration algorithms. Its order
//! defines the index used by the control panel's "Method" combo and by
//! [`SelectorState::selected_index`](super::SelectorState::selected_index).
//!
//! | Index | Name       | Engine                                  |
//! |-------|------------|-----------------------------------------|
//! | 0     | `ICP`      | Point-to-point ICP                      |
//! | 1     | `GICP`     | Generalized ICP                         |
//! | 2     | `NDT`      | Normal distributions transform          |
//! | 3     | `GICP_OMP` | Generalized ICP, multi-threaded         |
//! | 4     | `NDT_OMP`  | Normal distributions transform, multi-threaded |
//! | 5     | `VGICP`    | Voxelized generalized ICP               |

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Available registration algorithms, in catalog order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum RegistrationMethod {
    /// Point-to-point Iterative Closest Point.
    #[serde(rename = "ICP")]
    #[value(name = "ICP", alias = "icp")]
    Icp,

    /// Generalized ICP (plane-to-plane with local covariances).
    #[serde(rename = "GICP")]
    #[value(name = "GICP", alias = "gicp")]
    Gicp,

    /// Normal Distributions Transform over a voxel grid.
    #[serde(rename = "NDT")]
    #[value(name = "NDT", alias = "ndt")]
    Ndt,

    /// Generalized ICP with multi-threaded correspondence search.
    #[serde(rename = "GICP_OMP")]
    #[value(name = "GICP_OMP", alias = "gicp-omp")]
    GicpOmp,

    /// NDT with multi-threaded score evaluation.
    #[serde(rename = "NDT_OMP")]
    #[value(name = "NDT_OMP", alias = "ndt-omp")]
    NdtOmp,

    /// Voxelized generalized ICP.
    ///
    /// Uses its own fixed voxel resolution, not the panel's resolution control.
    #[serde(rename = "VGICP")]
    #[value(name = "VGICP", alias = "vgicp")]
    Vgicp,
}

/// Number of entries in [`METHOD_CATALOG`].
pub const CATALOG_LEN: usize = 6;

/// Catalog of registration methods. Immutable; order is significant.
pub const METHOD_CATALOG: [RegistrationMethod; CATALOG_LEN] = [
    RegistrationMethod::Icp,
    RegistrationMethod::Gicp,
    RegistrationMethod::Ndt,
    RegistrationMethod::GicpOmp,
    RegistrationMethod::NdtOmp,
    RegistrationMethod::Vgicp,
];

/// Index outside the method catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown registration method index {index} (catalog has {catalog_len} entries)")]
pub struct InvalidMethodSelection {
    /// Offending index
    pub index: usize,
    /// Catalog length at the time of the lookup
    pub catalog_len: usize,
}

impl RegistrationMethod {
    /// Method used when the selection cannot be resolved.
    pub const FALLBACK: RegistrationMethod = RegistrationMethod::Gicp;

    /// Catalog name, as shown in the control panel and written to config files.
    pub fn name(&self) -> &'static str {
        match self {
            RegistrationMethod::Icp => "ICP",
            RegistrationMethod::Gicp => "GICP",
            RegistrationMethod::Ndt => "NDT",
            RegistrationMethod::GicpOmp => "GICP_OMP",
            RegistrationMethod::NdtOmp => "NDT_OMP",
            RegistrationMethod::Vgicp => "VGICP",
        }
    }

    /// Get a short description of this method.
    pub fn description(&self) -> &'static str {
        match self {
            RegistrationMethod::Icp => "Point-to-point ICP",
            RegistrationMethod::Gicp => "Generalized ICP",
            RegistrationMethod::Ndt => "Normal distributions transform",
            RegistrationMethod::GicpOmp => "Generalized ICP (multi-threaded)",
            RegistrationMethod::NdtOmp => "Normal distributions transform (multi-threaded)",
            RegistrationMethod::Vgicp => "Voxelized generalized ICP",
        }
    }

    /// Returns all methods in catalog order.
    pub fn all() -> &'static [RegistrationMethod] {
        &METHOD_CATALOG
    }

    /// Catalog names in catalog order.
    pub fn names() -> [&'static str; CATALOG_LEN] {
        METHOD_CATALOG.map(|m| m.name())
    }

    /// Look up a method by catalog index.
    pub fn from_index(index: usize) -> Result<Self, InvalidMethodSelection> {
        METHOD_CATALOG
            .get(index)
            .copied()
            .ok_or(InvalidMethodSelection {
                index,
                catalog_len: CATALOG_LEN,
            })
    }

    /// Position of this method in the catalog.
    pub fn index(&self) -> usize {
        match self {
            RegistrationMethod::Icp => 0,
            RegistrationMethod::Gicp => 1,
            RegistrationMethod::Ndt => 2,
            RegistrationMethod::GicpOmp => 3,
            RegistrationMethod::NdtOmp => 4,
            RegistrationMethod::Vgicp => 5,
        }
    }

    /// Whether the panel shows the resolution control for this method.
    ///
    /// Case-sensitive substring match on the catalog name. `VGICP` does not
    /// match and uses its own fixed resolution.
    pub fn shows_resolution_control(&self) -> bool {
        self.name().contains("NDT")
    }
}

impl std::fmt::Display for RegistrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
