//! Tool styling: pressure-to-width mapping and per-tool compositing recipes.
//!
//! Widths are part of the saved-image look and must stay exactly as defined
//! here. A recipe is the ordered list of layers a stroke is painted with; all
//! layers share the stroke's point sequence.

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use crate::consts::{
    ERASER_BASE_WIDTH, ERASER_PRESSURE_GAIN, FALLBACK_WIDTH, PEN_BASE_WIDTH, PEN_PRESSURE_GAIN, PENCIL_BASE_WIDTH,
    PENCIL_PRESSURE_GAIN,
};
use crate::stroke::{Stroke, Tool};

/// Pencil texture overlay color.
const PENCIL_TEXTURE_COLOR: &str = "rgba(100, 100, 100, 0.3)";
/// Pencil shading overlay color.
const PENCIL_SHADING_COLOR: &str = "rgba(0, 0, 0, 0.1)";
/// Slight spline tension on the pencil base layer.
const PENCIL_TENSION: f64 = 0.1;

/// Stroke width for `tool` at `pressure`.
#[must_use]
pub fn stroke_width(tool: Tool, pressure: f64) -> f64 {
    match tool {
        Tool::Pen => PEN_BASE_WIDTH + pressure * PEN_PRESSURE_GAIN,
        Tool::Pencil => PENCIL_BASE_WIDTH + pressure * PENCIL_PRESSURE_GAIN,
        Tool::Eraser => ERASER_BASE_WIDTH + pressure * ERASER_PRESSURE_GAIN,
    }
}

/// Stroke width for a tool given by name; unknown names get a fixed width.
#[must_use]
pub fn stroke_width_for_name(tool: &str, pressure: f64) -> f64 {
    tool.parse::<Tool>()
        .map_or(FALLBACK_WIDTH, |tool| stroke_width(tool, pressure))
}

/// How new pixels combine with existing canvas content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeOp {
    /// Normal overlay.
    #[default]
    SourceOver,
    /// Contrast-preserving blend used for pencil grain.
    Overlay,
    /// Darkening blend used for pencil shading.
    Multiply,
    /// Clears existing pixels where the stroke is painted.
    DestinationOut,
}

impl CompositeOp {
    /// Name accepted by `CanvasRenderingContext2D.globalCompositeOperation`.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::Overlay => "overlay",
            Self::Multiply => "multiply",
            Self::DestinationOut => "destination-out",
        }
    }
}

/// Soft glow painted beneath a pen stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub color: String,
    pub blur: f64,
    pub opacity: f64,
}

/// One painted pass over a stroke's points.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeLayer {
    pub color: String,
    pub width: f64,
    /// Layer alpha in `[0, 1]`.
    pub opacity: f64,
    pub composite: CompositeOp,
    /// Cardinal-spline tension. Zero draws straight segments.
    pub tension: f64,
    /// Dash pattern in content units; empty for a solid line.
    pub dash: Vec<f64>,
    pub shadow: Option<Shadow>,
}

impl StrokeLayer {
    fn solid(color: &str, width: f64) -> Self {
        Self {
            color: color.to_owned(),
            width,
            opacity: 1.0,
            composite: CompositeOp::SourceOver,
            tension: 0.0,
            dash: Vec::new(),
            shadow: None,
        }
    }
}

/// Layers for painting `stroke`.
///
/// `last_pressure` is the most recent pressure seen by the input engine; pen
/// opacity follows it (0.9 to 1.0) across every pen stroke on screen.
#[must_use]
pub fn recipe(stroke: &Stroke, last_pressure: f64) -> Vec<StrokeLayer> {
    let width = stroke.stroke_width;
    match stroke.tool {
        Tool::Pen => vec![StrokeLayer {
            opacity: 0.9 + last_pressure * 0.1,
            shadow: Some(Shadow { color: stroke.color.clone(), blur: width / 2.0, opacity: 0.3 }),
            ..StrokeLayer::solid(&stroke.color, width)
        }],
        Tool::Pencil => vec![
            StrokeLayer { opacity: 0.8, tension: PENCIL_TENSION, ..StrokeLayer::solid(&stroke.color, width) },
            StrokeLayer {
                composite: CompositeOp::Overlay,
                dash: vec![1.0, 2.0],
                ..StrokeLayer::solid(PENCIL_TEXTURE_COLOR, width * 1.2)
            },
            StrokeLayer { composite: CompositeOp::Multiply, ..StrokeLayer::solid(PENCIL_SHADING_COLOR, width * 1.5) },
        ],
        Tool::Eraser => vec![StrokeLayer {
            opacity: 0.7,
            composite: CompositeOp::DestinationOut,
            ..StrokeLayer::solid(&stroke.color, width)
        }],
    }
}

/// Apply `alpha` to a `#rgb` / `#rrggbb` color, producing `rgba(...)`.
///
/// Other color syntaxes are returned unchanged.
#[must_use]
pub fn css_with_alpha(color: &str, alpha: f64) -> String {
    match parse_hex(color) {
        Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {alpha})"),
        None => color.to_owned(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| match u8::from_str_radix(s, 16) {
        Ok(v) => Some(v),
        Err(_) => None,
    };
    match hex.len() {
        // #rgb: each digit is doubled (0xf -> 0xff).
        3 => Some((channel(&hex[0..1])? * 17, channel(&hex[1..2])? * 17, channel(&hex[2..3])? * 17)),
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}
