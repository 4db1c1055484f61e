//! Stroke model: tools, strokes, and the drawing session that owns them.
//!
//! A `Stroke` is one pointer-down-to-pointer-up gesture. Its `points` and
//! `pressures` grow in lockstep while the gesture is active; once the pointer
//! is released the stroke is finalized and never touched again.
//!
//! `DrawingSession` is the explicit replacement for ambient UI globals: it
//! holds the ordered strokes (insertion order is z-order), the current tool,
//! color and title, and the editing target the strokes are drawn over. The
//! renderer reads it; nothing else mutates it.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{DEFAULT_COLOR, DEFAULT_PRESSURE, ERASER_COLOR};
use crate::style;

/// Drawing mode selecting stroke appearance and compositing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Smooth ink with a soft shadow (default).
    #[default]
    Pen,
    /// Textured graphite made of three composited layers.
    Pencil,
    /// Clears through existing content.
    Eraser,
}

impl Tool {
    /// Lowercase wire name, as used by the host UI's tool picker.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pen => "pen",
            Self::Pencil => "pencil",
            Self::Eraser => "eraser",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown tool name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pen" => Ok(Self::Pen),
            "pencil" => Ok(Self::Pencil),
            "eraser" => Ok(Self::Eraser),
            other => Err(UnknownTool(other.to_owned())),
        }
    }
}

/// Clamp a raw pressure sample into `[0, 1]`, substituting `fallback` for
/// samples the device did not really report (absent, zero, or NaN).
#[must_use]
pub fn normalize_pressure(raw: Option<f64>, fallback: f64) -> f64 {
    match raw {
        Some(p) if p.is_finite() && p > 0.0 => p.min(1.0),
        _ => fallback,
    }
}

/// One continuous drawing action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub tool: Tool,
    /// Points in content space, in capture order.
    pub points: Vec<Point>,
    /// CSS color string. Eraser strokes record the background color.
    pub color: String,
    /// Width derived from the most recent pressure sample. Applies to every point.
    pub stroke_width: f64,
    /// One sample per point, each in `[0, 1]`.
    pub pressures: Vec<f64>,
}

impl Stroke {
    fn begin(tool: Tool, color: &str, point: Point, pressure: f64) -> Self {
        let color = if tool == Tool::Eraser { ERASER_COLOR } else { color };
        Self {
            tool,
            points: vec![point],
            color: color.to_owned(),
            stroke_width: style::stroke_width(tool, pressure),
            pressures: vec![pressure],
        }
    }

    fn push(&mut self, point: Point, pressure: f64) {
        self.points.push(point);
        self.pressures.push(pressure);
        self.stroke_width = style::stroke_width(self.tool, pressure);
    }

    /// Most recent pressure sample.
    #[must_use]
    pub fn last_pressure(&self) -> f64 {
        self.pressures.last().copied().unwrap_or(DEFAULT_PRESSURE)
    }
}

/// The image and note being edited, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTarget {
    /// Data URI of the previously saved drawing, drawn beneath new strokes.
    pub background: Option<String>,
    /// Store id of the note being edited. `None` means the next save creates.
    pub note_id: Option<String>,
}

/// All mutable drawing state for one client.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    strokes: Vec<Stroke>,
    /// Whether the last stroke is still accepting points.
    active: bool,
    tool: Tool,
    color: String,
    title: String,
    target: EditTarget,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self {
            strokes: Vec::new(),
            active: false,
            tool: Tool::default(),
            color: DEFAULT_COLOR.to_owned(),
            title: String::new(),
            target: EditTarget::default(),
        }
    }
}

impl DrawingSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Stroke capture ---

    /// Start a new stroke at `point` with the active tool and color.
    ///
    /// Any stroke still active is finalized first.
    pub fn begin_stroke(&mut self, point: Point, pressure: f64) {
        self.active = false;
        self.strokes.push(Stroke::begin(self.tool, &self.color, point, pressure));
        self.active = true;
    }

    /// Append a sample to the active stroke. Returns `false` when no stroke is active.
    pub fn extend_stroke(&mut self, point: Point, pressure: f64) -> bool {
        if !self.active {
            return false;
        }
        match self.strokes.last_mut() {
            Some(stroke) => {
                stroke.push(point, pressure);
                true
            }
            None => false,
        }
    }

    /// Finalize the active stroke. Returns `false` when none was active.
    pub fn end_stroke(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    /// Drop every stroke, keeping tool, color, title and target.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.active = false;
    }

    /// Switch to a different editing target, discarding strokes and resetting the title.
    pub fn load_target(&mut self, target: EditTarget, title: impl Into<String>) {
        self.clear();
        self.target = target;
        self.title = title.into();
    }

    // --- Settings ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    // --- Queries ---

    /// All strokes in insertion (z) order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// The stroke currently receiving points, if any.
    #[must_use]
    pub fn active_stroke(&self) -> Option<&Stroke> {
        if self.active { self.strokes.last() } else { None }
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn background(&self) -> Option<&str> {
        self.target.background.as_deref()
    }

    #[must_use]
    pub fn editing_note_id(&self) -> Option<&str> {
        self.target.note_id.as_deref()
    }
}
