//! Configuration loading for samyoga.
//!
//! Loads the registration settings from a TOML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use samyoga::config::SamyogaConfig;
//!
//! // Load from default path (samyoga.toml), falling back to defaults
//! let config = SamyogaConfig::load_default()?;
//!
//! // Convert to the operator-editable selector state
//! let state = config.selector_state();
//! ```
//!
//! ## Example TOML
//!
//! ```toml
//! [registration]
//! method = "NDT_OMP"            # ICP | GICP | NDT | GICP_OMP | NDT_OMP | VGICP
//! resolution = 1.5              # NDT voxel size (m), 0.1 - 20.0
//! transformation_epsilon = 1e-4 # 1e-5 - 1e-2
//! max_iterations = 64           # 1 - 256
//! ```

mod defaults;
mod error;
mod registration;
mod samyoga;

pub use error::ConfigLoadError;
pub use registration::RegistrationSection;
pub use samyoga::{DEFAULT_CONFIG_PATHS, SamyogaConfig};
