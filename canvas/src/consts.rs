//! Shared numeric constants for the canvas crate.

// ── Pressure ────────────────────────────────────────────────────

/// Pressure assumed when the input device reports none.
pub const DEFAULT_PRESSURE: f64 = 0.5;

// ── Stroke width ────────────────────────────────────────────────

/// Pen width at zero pressure.
pub const PEN_BASE_WIDTH: f64 = 0.5;
/// Pen width gained per unit of pressure.
pub const PEN_PRESSURE_GAIN: f64 = 3.5;

/// Pencil width at zero pressure.
pub const PENCIL_BASE_WIDTH: f64 = 1.0;
/// Pencil width gained per unit of pressure.
pub const PENCIL_PRESSURE_GAIN: f64 = 3.0;

/// Eraser width at zero pressure.
pub const ERASER_BASE_WIDTH: f64 = 5.0;
/// Eraser width gained per unit of pressure.
pub const ERASER_PRESSURE_GAIN: f64 = 15.0;

/// Width used for tool names the styling table does not know.
pub const FALLBACK_WIDTH: f64 = 2.0;

// ── Colors ──────────────────────────────────────────────────────

/// Stroke color recorded for eraser strokes (the canvas background).
pub const ERASER_COLOR: &str = "#ffffff";

/// Initial palette color.
pub const DEFAULT_COLOR: &str = "#000000";

// ── Viewport ────────────────────────────────────────────────────

/// Multiplicative scale step applied per zoom tick.
pub const ZOOM_STEP: f64 = 1.05;

// ── Background ──────────────────────────────────────────────────

/// Width of the background image placement, in content units.
pub const BACKGROUND_WIDTH: f64 = 600.0;
/// Height of the background image placement, in content units.
pub const BACKGROUND_HEIGHT: f64 = 400.0;
