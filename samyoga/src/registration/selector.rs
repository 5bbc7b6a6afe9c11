//! Registration method selection and engine factory.
//!
//! [`RegistrationSelector`] renders the scan-matching controls onto a
//! [`ControlPanel`] and builds a freshly configured engine from the current
//! [`SelectorState`] on every request. The state is owned by the caller and
//! passed by reference into both operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    BackendHandle, DetachedBackend, DynRegistration, FastVgicp, Gicp, Icp, Ndt, Registration,
    RegistrationMethod, ThreadCount,
};
use crate::state::SharedSelectorState;
use crate::ui::{ControlPanel, DragRange};

/// Bounds of the NDT resolution slider (meters).
pub const RESOLUTION_RANGE: DragRange<f32> = DragRange {
    speed: 0.1,
    min: 0.1,
    max: 20.0,
    precision: 3,
};

/// Bounds of the transformation epsilon slider.
pub const TRANSFORMATION_EPSILON_RANGE: DragRange<f32> = DragRange {
    speed: 1e-5,
    min: 1e-5,
    max: 1e-2,
    precision: 6,
};

/// Bounds of the iteration cap slider.
pub const MAX_ITERATIONS_RANGE: DragRange<u32> = DragRange {
    speed: 1.0,
    min: 1,
    max: 256,
    precision: 0,
};

/// Voxel resolution used by VGICP regardless of the panel's resolution.
pub const VGICP_RESOLUTION: f64 = 1.0;

/// Neighbor count used by VGICP for covariance estimation.
pub const VGICP_CORRESPONDENCE_RANDOMNESS: u32 = 20;

/// Operator-editable registration settings.
///
/// Invariants (enforced by [`clamp_to_bounds`](Self::clamp_to_bounds) and the
/// control panel): `resolution` in [0.1, 20], `transformation_epsilon` in
/// [1e-5, 1e-2], `max_iterations` in [1, 256]. `selected_index` is expected to
/// lie inside the catalog; anything else falls back to GICP at build time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectorState {
    /// Index into [`METHOD_CATALOG`](super::METHOD_CATALOG).
    pub selected_index: usize,
    /// NDT voxel resolution (meters). Only read by NDT-family methods.
    pub resolution: f32,
    /// Convergence threshold on incremental transform change.
    pub transformation_epsilon: f32,
    /// Iteration cap.
    pub max_iterations: u32,
}

impl Default for SelectorState {
    fn default() -> Self {
        Self {
            selected_index: RegistrationMethod::Gicp.index(),
            resolution: 2.0,
            transformation_epsilon: 1e-4,
            max_iterations: 64,
        }
    }
}

impl SelectorState {
    /// Default state with the given method selected.
    pub fn with_method(method: RegistrationMethod) -> Self {
        Self {
            selected_index: method.index(),
            ..Self::default()
        }
    }

    /// Select a method.
    pub fn select(&mut self, method: RegistrationMethod) {
        self.selected_index = method.index();
    }

    /// Selected method, or `None` if the index is outside the catalog.
    pub fn method(&self) -> Option<RegistrationMethod> {
        RegistrationMethod::from_index(self.selected_index).ok()
    }

    /// Clamp the numeric parameters into their slider ranges.
    ///
    /// Returns `true` if any value was changed. Non-finite floats are reset to
    /// their defaults first.
    pub fn clamp_to_bounds(&mut self) -> bool {
        let before = *self;
        let defaults = Self::default();

        if !self.resolution.is_finite() {
            self.resolution = defaults.resolution;
        }
        if !self.transformation_epsilon.is_finite() {
            self.transformation_epsilon = defaults.transformation_epsilon;
        }
        self.resolution = RESOLUTION_RANGE.clamp(self.resolution);
        self.transformation_epsilon =
            TRANSFORMATION_EPSILON_RANGE.clamp(self.transformation_epsilon);
        self.max_iterations = MAX_ITERATIONS_RANGE.clamp(self.max_iterations);

        *self != before
    }
}

/// Registration method selector and engine factory.
///
/// Holds no per-pipeline state beyond the backend binding; the editable
/// settings live in a caller-owned [`SelectorState`].
#[derive(Clone)]
pub struct RegistrationSelector {
    backend: BackendHandle,
}

impl Default for RegistrationSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RegistrationSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationSelector")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl RegistrationSelector {
    /// Create a selector whose engines have no alignment backend attached.
    ///
    /// Engines configure normally but [`Registration::align`] reports
    /// [`RegistrationError::BackendUnavailable`](super::RegistrationError::BackendUnavailable).
    pub fn new() -> Self {
        Self::with_backend(Arc::new(DetachedBackend))
    }

    /// Create a selector whose engines align through `backend`.
    pub fn with_backend(backend: BackendHandle) -> Self {
        Self { backend }
    }

    /// Name of the attached backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Draw the scan-matching controls and apply operator edits to `state`.
    ///
    /// The resolution slider is shown only when the selected method's name
    /// contains `"NDT"`. Returns `true` if any value changed.
    pub fn render_controls(
        &self,
        state: &mut SelectorState,
        panel: &mut impl ControlPanel,
    ) -> bool {
        panel.text("Scan matching");

        let names = RegistrationMethod::names();
        let mut changed = panel.combo("Method", &mut state.selected_index, &names);

        if state.method().is_some_and(|m| m.shows_resolution_control()) {
            changed |= panel.drag_float("Resolution", &mut state.resolution, &RESOLUTION_RANGE);
        }
        changed |= panel.drag_float(
            "Transformation epsilon",
            &mut state.transformation_epsilon,
            &TRANSFORMATION_EPSILON_RANGE,
        );
        changed |= panel.drag_int(
            "Max iterations",
            &mut state.max_iterations,
            &MAX_ITERATIONS_RANGE,
        );

        if changed {
            state.clamp_to_bounds();
            log::debug!(
                "Scan matching settings: method={} resolution={:.3} epsilon={:.6} max_iterations={}",
                state.method().map_or("<invalid>", |m| m.name()),
                state.resolution,
                state.transformation_epsilon,
                state.max_iterations
            );
        }
        changed
    }

    /// Resolve the state's method, falling back to GICP with a warning.
    pub fn resolve_method(&self, state: &SelectorState) -> RegistrationMethod {
        match RegistrationMethod::from_index(state.selected_index) {
            Ok(method) => method,
            Err(e) => {
                log::warn!("{}; using {}", e, RegistrationMethod::FALLBACK);
                RegistrationMethod::FALLBACK
            }
        }
    }

    /// Build a freshly configured engine from the current settings.
    ///
    /// Never fails: an index outside the catalog yields a GICP engine and a
    /// warning. Every call returns a new engine; nothing is cached.
    pub fn build_engine(&self, state: &SelectorState) -> DynRegistration {
        let backend = Arc::clone(&self.backend);

        let mut engine: DynRegistration = match self.resolve_method(state) {
            RegistrationMethod::Icp => Icp::new(backend).into(),
            RegistrationMethod::Gicp => Gicp::new(backend).into(),
            RegistrationMethod::GicpOmp => Gicp::parallel(backend).into(),
            RegistrationMethod::Ndt => {
                let mut ndt = Ndt::new(backend);
                ndt.set_resolution(f64::from(state.resolution));
                ndt.into()
            }
            RegistrationMethod::NdtOmp => {
                let mut ndt = Ndt::parallel(backend);
                ndt.set_resolution(f64::from(state.resolution));
                ndt.into()
            }
            RegistrationMethod::Vgicp => {
                let mut vgicp = FastVgicp::new(backend);
                vgicp.set_num_threads(ThreadCount::Auto);
                vgicp.set_resolution(VGICP_RESOLUTION);
                vgicp.set_correspondence_randomness(VGICP_CORRESPONDENCE_RANDOMNESS);
                vgicp.into()
            }
        };

        engine.set_transformation_epsilon(f64::from(state.transformation_epsilon));
        engine.set_maximum_iterations(state.max_iterations);

        log::debug!("Built {} engine: {:?}", engine.method(), engine.params());
        engine
    }

    /// [`build_engine`](Self::build_engine) over a lock-guarded state.
    ///
    /// A poisoned lock is recovered; the state is plain data.
    pub fn build_engine_shared(&self, state: &SharedSelectorState) -> DynRegistration {
        let snapshot = match state.read() {
            Ok(guard) => *guard,
            Err(poisoned) => {
                log::error!("Selector state lock poisoned, recovering");
                *poisoned.into_inner()
            }
        };
        self.build_engine(&snapshot)
    }

    /// [`render_controls`](Self::render_controls) over a lock-guarded state.
    pub fn render_controls_shared(
        &self,
        state: &SharedSelectorState,
        panel: &mut impl ControlPanel,
    ) -> bool {
        let mut guard = match state.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("Selector state lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        self.render_controls(&mut guard, panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{PanelEdit, ScriptedPanel};

    fn state(index: usize, resolution: f32, epsilon: f32, iterations: u32) -> SelectorState {
        SelectorState {
            selected_index: index,
            resolution,
            transformation_epsilon: epsilon,
            max_iterations: iterations,
        }
    }

    #[test]
    fn test_default_state() {
        let s = SelectorState::default();
        assert_eq!(s.method(), Some(RegistrationMethod::Gicp));
        assert_eq!(s.resolution, 2.0);
        assert_eq!(s.transformation_epsilon, 1e-4);
        assert_eq!(s.max_iterations, 64);
    }

    #[test]
    fn test_common_params_applied_to_every_method() {
        let selector = RegistrationSelector::new();
        for method in RegistrationMethod::all() {
            let s = SelectorState {
                transformation_epsilon: 3e-3,
                max_iterations: 17,
                ..SelectorState::with_method(*method)
            };
            let engine = selector.build_engine(&s);

            assert_eq!(engine.method(), *method);
            assert_eq!(engine.transformation_epsilon(), f64::from(3e-3_f32));
            assert_eq!(engine.maximum_iterations(), 17);
        }
    }

    #[test]
    fn test_ndt_reads_resolution() {
        let selector = RegistrationSelector::new();
        let engine = selector.build_engine(&state(2, 5.0, 1e-3, 30));

        assert_eq!(engine.method(), RegistrationMethod::Ndt);
        assert_eq!(engine.resolution(), Some(5.0));
        assert_eq!(engine.transformation_epsilon(), f64::from(1e-3_f32));
        assert_eq!(engine.maximum_iterations(), 30);

        let engine = selector.build_engine(&state(4, 0.5, 1e-3, 30));
        assert_eq!(engine.method(), RegistrationMethod::NdtOmp);
        assert_eq!(engine.resolution(), Some(0.5));
    }

    #[test]
    fn test_icp_family_has_no_resolution() {
        let selector = RegistrationSelector::new();
        for index in [0, 1, 3] {
            let engine = selector.build_engine(&state(index, 7.0, 1e-4, 64));
            assert_eq!(engine.resolution(), None);
            assert_eq!(engine.params().correspondence_randomness, None);
        }
    }

    #[test]
    fn test_vgicp_ignores_panel_resolution() {
        let selector = RegistrationSelector::new();
        let engine = selector.build_engine(&state(5, 9.9, 1e-4, 64));
        let params = engine.params();

        assert_eq!(params.method, RegistrationMethod::Vgicp);
        assert_eq!(params.resolution, Some(1.0));
        assert_eq!(params.correspondence_randomness, Some(20));
        assert_eq!(params.num_threads, Some(ThreadCount::Auto));
    }

    #[test]
    fn test_unknown_index_falls_back_to_gicp() {
        let selector = RegistrationSelector::new();
        let engine = selector.build_engine(&state(99, 2.0, 2e-4, 10));

        assert_eq!(engine.method(), RegistrationMethod::Gicp);
        assert_eq!(engine.transformation_epsilon(), f64::from(2e-4_f32));
        assert_eq!(engine.maximum_iterations(), 10);
        assert_eq!(engine.resolution(), None);
    }

    #[test]
    fn test_build_engine_is_idempotent() {
        let selector = RegistrationSelector::new();
        for index in 0..8 {
            let s = state(index, 3.5, 5e-4, 40);
            assert_eq!(
                selector.build_engine(&s).params(),
                selector.build_engine(&s).params()
            );
        }
    }

    #[test]
    fn test_render_hides_resolution_for_non_ndt() {
        let selector = RegistrationSelector::new();
        let mut s = SelectorState::default();
        let mut panel = ScriptedPanel::new();

        assert!(!selector.render_controls(&mut s, &mut panel));
        assert!(panel.was_shown("Scan matching"));
        assert!(panel.was_shown("Method"));
        assert!(!panel.was_shown("Resolution"));
        assert!(panel.was_shown("Transformation epsilon"));
        assert!(panel.was_shown("Max iterations"));

        s.select(RegistrationMethod::Vgicp);
        panel.clear_shown();
        selector.render_controls(&mut s, &mut panel);
        assert!(!panel.was_shown("Resolution"));
    }

    #[test]
    fn test_render_shows_resolution_after_switching_to_ndt() {
        let selector = RegistrationSelector::new();
        let mut s = SelectorState::default();
        let mut panel = ScriptedPanel::new()
            .with_edit("Method", PanelEdit::Select(RegistrationMethod::NdtOmp.index()))
            .with_edit("Resolution", PanelEdit::Float(4.5));

        assert!(selector.render_controls(&mut s, &mut panel));
        assert_eq!(s.method(), Some(RegistrationMethod::NdtOmp));
        assert_eq!(s.resolution, 4.5);
        assert!(panel.was_shown("Resolution"));
    }

    #[test]
    fn test_render_clamps_edits() {
        let selector = RegistrationSelector::new();
        let mut s = SelectorState::default();
        let mut panel = ScriptedPanel::new()
            .with_edit("Transformation epsilon", PanelEdit::Float(1.0))
            .with_edit("Max iterations", PanelEdit::Int(1000));

        assert!(selector.render_controls(&mut s, &mut panel));
        assert_eq!(s.transformation_epsilon, 1e-2);
        assert_eq!(s.max_iterations, 256);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let mut s = state(0, 100.0, f32::NAN, 0);
        assert!(s.clamp_to_bounds());
        assert_eq!(s.resolution, 20.0);
        assert_eq!(s.transformation_epsilon, 1e-4);
        assert_eq!(s.max_iterations, 1);

        let mut s = SelectorState::default();
        assert!(!s.clamp_to_bounds());
    }
}
