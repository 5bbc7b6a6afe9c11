//! Immediate-mode control surface.
//!
//! The selector describes its widgets through [`ControlPanel`]; a GUI layer
//! implements the trait on top of its widget toolkit. Widgets follow
//! immediate-mode semantics: every call both draws the widget and applies any
//! pending operator edit to the bound value, returning `true` when the value
//! changed.
//!
//! [`ScriptedPanel`] is a headless implementation that applies queued edits by
//! label and records which widgets were shown.

mod scripted;

pub use scripted::{PanelEdit, ScriptedPanel};

/// Drag-slider bounds and behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRange<T> {
    /// Value change per pixel of mouse drag.
    pub speed: f32,
    /// Smallest accepted value.
    pub min: T,
    /// Largest accepted value.
    pub max: T,
    /// Decimal places shown (ignored for integers).
    pub precision: usize,
}

impl<T: PartialOrd + Copy> DragRange<T> {
    /// Clamp a value into `[min, max]`.
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Check whether a value lies in `[min, max]`.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Immediate-mode widget surface.
///
/// Implementations clamp drag inputs to the given range before writing them
/// back to the bound value.
pub trait ControlPanel {
    /// Draw a line of static text.
    fn text(&mut self, text: &str);

    /// Draw a dropdown; `current` is the selected item index.
    fn combo(&mut self, label: &str, current: &mut usize, items: &[&str]) -> bool;

    /// Draw a float drag-slider.
    fn drag_float(&mut self, label: &str, value: &mut f32, range: &DragRange<f32>) -> bool;

    /// Draw an integer drag-slider.
    fn drag_int(&mut self, label: &str, value: &mut u32, range: &DragRange<u32>) -> bool;
}
