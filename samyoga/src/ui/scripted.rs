//! Headless control panel driven by queued edits.

use std::collections::HashMap;

use super::{ControlPanel, DragRange};

/// Edit applied to a widget the next time it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelEdit {
    /// Select a combo item by index.
    Select(usize),
    /// Set a float slider.
    Float(f32),
    /// Set an integer slider.
    Int(u32),
    /// Drag a slider by this many pixels (negative drags down).
    ///
    /// Moves the value by `pixels * speed`; float sliders then round to the
    /// displayed precision.
    Drag(f32),
}

fn round_to_precision(value: f32, precision: usize) -> f32 {
    let scale = 10f32.powi(precision as i32);
    (value * scale).round() / scale
}

/// [`ControlPanel`] without a display.
///
/// Edits are keyed by widget label and consumed when the matching widget is
/// drawn. Edits for widgets that are not drawn stay queued. Drag edits are
/// clamped to the widget range, like an interactive slider.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPanel {
    edits: HashMap<String, PanelEdit>,
    shown: Vec<String>,
}

impl ScriptedPanel {
    /// Create a panel with no pending edits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an edit for the widget with the given label.
    pub fn queue(&mut self, label: &str, edit: PanelEdit) -> &mut Self {
        self.edits.insert(label.to_string(), edit);
        self
    }

    /// Builder form of [`queue`](Self::queue).
    pub fn with_edit(mut self, label: &str, edit: PanelEdit) -> Self {
        self.queue(label, edit);
        self
    }

    /// Whether a widget (or text line) with this label was drawn since the
    /// last [`clear_shown`](Self::clear_shown).
    pub fn was_shown(&self, label: &str) -> bool {
        self.shown.iter().any(|s| s == label)
    }

    /// Forget which widgets were drawn.
    pub fn clear_shown(&mut self) {
        self.shown.clear();
    }

    /// Number of edits still waiting for their widget.
    pub fn pending(&self) -> usize {
        self.edits.len()
    }

    fn take(&mut self, label: &str) -> Option<PanelEdit> {
        self.shown.push(label.to_string());
        self.edits.remove(label)
    }
}

impl ControlPanel for ScriptedPanel {
    fn text(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }

    fn combo(&mut self, label: &str, current: &mut usize, items: &[&str]) -> bool {
        match self.take(label) {
            Some(PanelEdit::Select(index)) if index < items.len() && index != *current => {
                *current = index;
                true
            }
            Some(PanelEdit::Select(index)) if index >= items.len() => {
                log::warn!("{}: item {} out of {} ignored", label, index, items.len());
                false
            }
            Some(PanelEdit::Select(_)) | None => false,
            Some(other) => {
                log::warn!("{}: edit {:?} does not apply to a combo", label, other);
                false
            }
        }
    }

    fn drag_float(&mut self, label: &str, value: &mut f32, range: &DragRange<f32>) -> bool {
        match self.take(label) {
            Some(PanelEdit::Float(v)) => {
                let v = range.clamp(v);
                let changed = v != *value;
                *value = v;
                changed
            }
            Some(PanelEdit::Drag(pixels)) => {
                let v = *value + pixels * range.speed;
                let v = range.clamp(round_to_precision(v, range.precision));
                let changed = v != *value;
                *value = v;
                changed
            }
            None => false,
            Some(other) => {
                log::warn!("{}: edit {:?} does not apply to a float slider", label, other);
                false
            }
        }
    }

    fn drag_int(&mut self, label: &str, value: &mut u32, range: &DragRange<u32>) -> bool {
        match self.take(label) {
            Some(PanelEdit::Int(v)) => {
                let v = range.clamp(v);
                let changed = v != *value;
                *value = v;
                changed
            }
            Some(PanelEdit::Drag(pixels)) => {
                // Float-to-int `as` saturates, so drags below zero land on 0.
                let v = (*value as f32 + pixels * range.speed).round() as u32;
                let v = range.clamp(v);
                let changed = v != *value;
                *value = v;
                changed
            }
            None => false,
            Some(other) => {
                log::warn!("{}: edit {:?} does not apply to an int slider", label, other);
                false
            }
        }
    }
}
