//! Input model: pointer samples, mouse buttons, and the gesture state machine.
//!
//! `PointerSample` is what the host hands over for each DOM pointer event.
//! `InputState` is the gesture being tracked between pointer-down and
//! pointer-up, carrying the context needed to apply incremental updates.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button, pen tip, or single-finger touch.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button or pen barrel button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code. Unknown codes are treated as primary.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// One pointer event as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Position in screen space (CSS pixels). `None` when the host could not
    /// resolve a position for the event.
    pub screen: Option<Point>,
    /// Raw pressure, `None` for devices without pressure support.
    pub pressure: Option<f64>,
}

impl PointerSample {
    #[must_use]
    pub fn new(x: f64, y: f64, pressure: Option<f64>) -> Self {
        Self { screen: Some(Point::new(x, y)), pressure }
    }

    /// The screen position, if present and finite.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.screen.filter(|p| p.is_finite())
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The primary button is down and the active stroke is receiving points.
    Drawing,
    /// The user is dragging the whole stage.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute the pan delta.
        last_screen: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}
