//! Freehand drawing engine for the sketch notebook.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! drawing side of the app: capturing pointer input into strokes, styling
//! them per tool, maintaining the pan/zoom viewport, and redrawing the whole
//! scene on every change. On save it flattens the canvas to a PNG data URI
//! and submits it to the notes store. The host page only wires DOM events to
//! the engine and refreshes its note list when a save completes.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`stroke`] | Tools, strokes, and the drawing session |
//! | [`style`] | Pressure-to-width mapping and per-tool layer recipes |
//! | [`camera`] | Pan/zoom viewport and coordinate conversions |
//! | [`input`] | Pointer samples and the gesture state machine |
//! | [`render`] | Pure scene builder producing draw commands |
//! | [`canvas2d`] | Executes draw commands on a `CanvasRenderingContext2d` |
//! | [`persist`] | Save/list/delete client for the notes store |
//! | [`consts`] | Shared numeric constants (widths, zoom step, background size) |

pub mod camera;
pub mod canvas2d;
pub mod consts;
pub mod engine;
pub mod input;
pub mod persist;
pub mod render;
pub mod stroke;
pub mod style;
