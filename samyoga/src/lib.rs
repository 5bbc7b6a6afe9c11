//! # Samyoga
//!
//! Scan-matching registration selector for 3D SLAM pipelines.
//!
//! ## Overview
//!
//! Samyoga holds the operator's choice of point-cloud registration algorithm
//! and its tuning parameters, draws them on an immediate-mode control panel,
//! and builds a freshly configured registration engine for every scan-matching
//! call.
//!
//! - **Catalog**: `ICP`, `GICP`, `NDT`, `GICP_OMP`, `NDT_OMP`, `VGICP`
//! - **Engines**: configured through the [`Registration`] capability trait
//! - **Backend**: alignment numerics come from an [`AlignmentBackend`]
//!   supplied by a point-cloud registration library
//! - **Config**: TOML file with per-field defaults
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use samyoga::{Registration, RegistrationSelector, SelectorState};
//!
//! let selector = RegistrationSelector::with_backend(backend);
//! let mut state = SelectorState::default();
//!
//! // Each UI frame
//! selector.render_controls(&mut state, &mut panel);
//!
//! // Each scan-matching call
//! let mut engine = selector.build_engine(&state);
//! let result = engine.align(&source, &target, &guess)?;
//! ```

#![warn(missing_docs)]

// Core types
pub mod core;

// Method catalog, engines and selector
pub mod registration;

// Immediate-mode control surface
pub mod ui;

// TOML configuration
pub mod config;

// Lock-guarded selector state
pub mod state;

// Re-export commonly used types
pub use config::{ConfigLoadError, RegistrationSection, SamyogaConfig};
pub use crate::core::types::{PointCloud3D, PointXyzRgb};
pub use registration::{
    AlignmentBackend, AlignmentResult, DetachedBackend, DynRegistration, EngineParams,
    InvalidMethodSelection, Registration, RegistrationError, RegistrationMethod,
    RegistrationSelector, SelectorState, ThreadCount,
};
pub use state::{SharedSelectorState, create_shared_state};
pub use ui::{ControlPanel, DragRange, PanelEdit, ScriptedPanel};
