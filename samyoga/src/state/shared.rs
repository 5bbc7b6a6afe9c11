//! Lock-guarded selector state.
//!
//! The selector performs no synchronization of its own. When the control panel
//! runs on a UI thread and scan matching on a SLAM thread, both sides share one
//! `SharedSelectorState`:
//! - UI thread: writer, via `RegistrationSelector::render_controls_shared`
//! - SLAM thread: reader, via `RegistrationSelector::build_engine_shared`

use std::sync::{Arc, RwLock};

use crate::registration::SelectorState;

/// Handle type for shared selector state (Arc<RwLock<SelectorState>>).
pub type SharedSelectorState = Arc<RwLock<SelectorState>>;

/// Wrap an initial state in Arc<RwLock>.
pub fn create_shared_state(initial: SelectorState) -> SharedSelectorState {
    Arc::new(RwLock::new(initial))
}
