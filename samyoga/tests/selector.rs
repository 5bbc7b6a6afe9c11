//! Selector integration tests.
//!
//! Exercise the full path an operator edit takes: control panel, selector
//! state, engine factory and alignment backend.
//!
//! Run with: `cargo test --test selector`

mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use log::Level;
use nalgebra::{Matrix4, Translation3, Vector3};
use samyoga::{
    PanelEdit, Registration, RegistrationError, RegistrationMethod, RegistrationSelector,
    ScriptedPanel, SelectorState, ThreadCount, create_shared_state,
};

use common::{CentroidBackend, RecordingBackend, capture_logs, create_box, messages_at};

fn state(index: usize, resolution: f32, epsilon: f32, iterations: u32) -> SelectorState {
    SelectorState {
        selected_index: index,
        resolution,
        transformation_epsilon: epsilon,
        max_iterations: iterations,
    }
}

// ============================================================================
// Engine configuration
// ============================================================================

#[test]
fn test_ndt_example() {
    let selector = RegistrationSelector::new();
    let engine = selector.build_engine(&state(2, 5.0, 1e-3, 30));
    let params = engine.params();

    assert_eq!(params.method, RegistrationMethod::Ndt);
    assert_eq!(params.resolution, Some(5.0));
    assert_relative_eq!(params.transformation_epsilon, 1e-3, epsilon = 1e-9);
    assert_eq!(params.maximum_iterations, 30);
}

#[test]
fn test_vgicp_example() {
    let selector = RegistrationSelector::new();
    let params = selector.build_engine(&state(5, 9.9, 1e-4, 64)).params();

    assert_eq!(params.method, RegistrationMethod::Vgicp);
    assert_eq!(params.resolution, Some(1.0));
    assert_eq!(params.correspondence_randomness, Some(20));
    assert_eq!(params.num_threads, Some(ThreadCount::Auto));
    assert_eq!(params.num_threads.map(|t| t.as_raw()), Some(0));
}

#[test]
fn test_unknown_index_example() {
    let selector = RegistrationSelector::new();
    let params = selector.build_engine(&state(99, 2.0, 2e-4, 10)).params();

    assert_eq!(params.method, RegistrationMethod::Gicp);
    assert_relative_eq!(params.transformation_epsilon, 2e-4, epsilon = 1e-9);
    assert_eq!(params.maximum_iterations, 10);
    assert_eq!(params.resolution, None);
}

#[test]
fn test_unknown_index_logs_one_warning() {
    let selector = RegistrationSelector::new();
    let (engine, records) = capture_logs(|| selector.build_engine(&state(99, 2.0, 2e-4, 10)));

    assert_eq!(engine.method(), RegistrationMethod::Gicp);
    let warnings = messages_at(&records, Level::Warn);
    assert_eq!(warnings.len(), 1, "records: {:?}", records);
    assert!(warnings[0].contains("99"));
    assert!(warnings[0].contains("GICP"));
}

#[test]
fn test_catalog_indices_build_without_warning() {
    let selector = RegistrationSelector::new();
    for index in 0..RegistrationMethod::all().len() {
        let (_, records) = capture_logs(|| selector.build_engine(&state(index, 3.0, 1e-4, 64)));
        assert!(
            messages_at(&records, Level::Warn).is_empty(),
            "index {} warned: {:?}",
            index,
            records
        );
    }
}

#[test]
fn test_common_params_exact_for_all_methods() {
    let selector = RegistrationSelector::new();
    for method in RegistrationMethod::all() {
        let s = SelectorState {
            transformation_epsilon: 7.5e-5,
            max_iterations: 256,
            ..SelectorState::with_method(*method)
        };
        let engine = selector.build_engine(&s);

        assert_eq!(engine.method(), *method);
        assert_eq!(engine.transformation_epsilon(), f64::from(s.transformation_epsilon));
        assert_eq!(engine.maximum_iterations(), s.max_iterations);
    }
}

#[test]
fn test_fresh_engine_per_request() {
    let selector = RegistrationSelector::new();
    let s = SelectorState::with_method(RegistrationMethod::NdtOmp);

    let mut first = selector.build_engine(&s);
    first.set_maximum_iterations(3);
    let second = selector.build_engine(&s);

    assert_eq!(second.maximum_iterations(), 64);
    assert_ne!(first.params(), second.params());
}

// ============================================================================
// Control panel
// ============================================================================

#[test]
fn test_operator_session() {
    let selector = RegistrationSelector::new();
    let mut s = SelectorState::default();

    // Resolution edit is ignored while GICP is selected.
    let mut panel = ScriptedPanel::new().with_edit("Resolution", PanelEdit::Float(8.0));
    assert!(!selector.render_controls(&mut s, &mut panel));
    assert_eq!(s.resolution, 2.0);
    assert_eq!(panel.pending(), 1);

    // Switching to NDT reveals the slider and applies the queued edit.
    panel.queue("Method", PanelEdit::Select(RegistrationMethod::Ndt.index()));
    assert!(selector.render_controls(&mut s, &mut panel));
    assert_eq!(s.resolution, 8.0);
    assert_eq!(panel.pending(), 0);

    let engine = selector.build_engine(&s);
    assert_eq!(engine.resolution(), Some(8.0));

    // VGICP keeps its own resolution.
    panel.queue("Method", PanelEdit::Select(RegistrationMethod::Vgicp.index()));
    selector.render_controls(&mut s, &mut panel);
    assert_eq!(selector.build_engine(&s).resolution(), Some(1.0));
}

#[test]
fn test_shared_state_between_panel_and_builder() {
    let shared = create_shared_state(SelectorState::default());
    let selector = RegistrationSelector::new();

    let mut panel = ScriptedPanel::new()
        .with_edit("Method", PanelEdit::Select(RegistrationMethod::GicpOmp.index()))
        .with_edit("Transformation epsilon", PanelEdit::Float(5e-3));
    assert!(selector.render_controls_shared(&shared, &mut panel));

    let engine = selector.build_engine_shared(&shared);
    assert_eq!(engine.method(), RegistrationMethod::GicpOmp);
    assert_eq!(engine.transformation_epsilon(), f64::from(5e-3_f32));
}

// ============================================================================
// Alignment through the backend
// ============================================================================

#[test]
fn test_backend_receives_engine_params() {
    let backend = Arc::new(RecordingBackend::default());
    let selector = RegistrationSelector::with_backend(backend.clone());
    assert_eq!(selector.backend_name(), "recording");

    let cloud = create_box(1.0, 2.0, 0.5);
    for index in 0..6 {
        let mut engine = selector.build_engine(&state(index, 3.0, 1e-4, 20));
        engine.align(&cloud, &cloud, &Matrix4::identity()).unwrap();
    }

    let calls = backend.calls();
    assert_eq!(calls.len(), 6);
    let methods: Vec<_> = calls.iter().map(|p| p.method).collect();
    assert_eq!(methods, RegistrationMethod::all());
    assert_eq!(calls[2].resolution, Some(3.0));
    assert_eq!(calls[5].resolution, Some(1.0));
    assert!(calls.iter().all(|p| p.maximum_iterations == 20));
}

#[test]
fn test_alignment_result_flows_back() {
    let selector = RegistrationSelector::with_backend(Arc::new(CentroidBackend));
    let source = create_box(1.0, 1.0, 1.0);
    let offset = Translation3::from(Vector3::new(0.3, -0.2, 0.1)).to_homogeneous();
    let target = source.transform(&offset);

    let mut engine = selector.build_engine(&SelectorState::default());
    let result = engine.align(&source, &target, &Matrix4::identity()).unwrap();

    assert!(result.converged);
    assert_relative_eq!(result.transform[(0, 3)], 0.3, epsilon = 1e-5);
    assert_relative_eq!(result.transform[(1, 3)], -0.2, epsilon = 1e-5);
    assert_relative_eq!(result.transform[(2, 3)], 0.1, epsilon = 1e-5);
}

#[test]
fn test_detached_selector_refuses_alignment() {
    let selector = RegistrationSelector::new();
    let cloud = create_box(1.0, 1.0, 1.0);
    let mut engine = selector.build_engine(&SelectorState::with_method(RegistrationMethod::Icp));

    let err = engine.align(&cloud, &cloud, &Matrix4::identity()).unwrap_err();
    assert_eq!(err, RegistrationError::BackendUnavailable(RegistrationMethod::Icp));
}
