use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement};

use crate::camera::{Camera, Point, ZoomDirection};
use crate::canvas2d::{self, ImageCache};
use crate::consts::DEFAULT_PRESSURE;
use crate::input::{Button, InputState, PointerSample, WheelDelta};
use crate::persist::{self, NoteSnapshot, PersistError, SaveNoteRequest};
use crate::render::{self, DrawCommand, Viewport};
use crate::stroke::{DrawingSession, EditTarget, Tool, normalize_pressure};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new stroke began.
    StrokeStarted,
    /// The active stroke was finalized.
    StrokeFinished,
    /// The viewport transform changed.
    CameraChanged(Camera),
    /// State changed; the host should call `render` on the next frame.
    RenderNeeded,
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub session: DrawingSession,
    pub camera: Camera,
    pub input: InputState,
    pub viewport: Viewport,
    /// Most recent pressure sample from any stroke.
    pub last_pressure: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            session: DrawingSession::new(),
            camera: Camera::default(),
            input: InputState::default(),
            viewport: Viewport::default(),
            last_pressure: DEFAULT_PRESSURE,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Session inputs ---

    /// Load a note for editing (or `EditTarget::default()` for a blank page).
    pub fn load_note(&mut self, target: EditTarget, title: impl Into<String>) -> Vec<Action> {
        self.input = InputState::Idle;
        self.session.load_target(target, title);
        vec![Action::RenderNeeded]
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.session.set_tool(tool);
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.session.set_color(color);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.session.set_title(title);
    }

    /// Drop all strokes on the page.
    pub fn clear(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        self.session.clear();
        vec![Action::RenderNeeded]
    }

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.viewport = Viewport { width: width_css, height: height_css, dpr };
        vec![Action::RenderNeeded]
    }

    // --- Input events ---

    /// Primary button starts a stroke; middle/secondary start a pan.
    pub fn on_pointer_down(&mut self, sample: PointerSample, button: Button) -> Vec<Action> {
        let Some(screen) = sample.position() else {
            return Vec::new();
        };

        match button {
            Button::Primary => {
                let pressure = normalize_pressure(sample.pressure, DEFAULT_PRESSURE);
                self.last_pressure = pressure;
                self.session.begin_stroke(self.camera.screen_to_world(screen), pressure);
                self.input = InputState::Drawing;
                vec![Action::StrokeStarted, Action::RenderNeeded]
            }
            Button::Middle | Button::Secondary => {
                let mut actions = Vec::new();
                // A pan interrupting a stroke finalizes it; pointer-up only ends drawing gestures.
                if self.input == InputState::Drawing && self.session.end_stroke() {
                    actions.push(Action::StrokeFinished);
                }
                self.input = InputState::Panning { last_screen: screen };
                actions
            }
        }
    }

    pub fn on_pointer_move(&mut self, sample: PointerSample) -> Vec<Action> {
        let Some(screen) = sample.position() else {
            return Vec::new();
        };

        match self.input {
            InputState::Idle => Vec::new(),
            InputState::Drawing => {
                let pressure = normalize_pressure(sample.pressure, self.last_pressure);
                self.last_pressure = pressure;
                if self.session.extend_stroke(self.camera.screen_to_world(screen), pressure) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            InputState::Panning { last_screen } => {
                self.camera.pan_by(screen.x - last_screen.x, screen.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen };
                vec![Action::CameraChanged(self.camera), Action::RenderNeeded]
            }
        }
    }

    /// Finalize whatever gesture is active. The release position is not recorded.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let prev = std::mem::take(&mut self.input);
        match prev {
            InputState::Drawing if self.session.end_stroke() => vec![Action::StrokeFinished],
            _ => Vec::new(),
        }
    }

    /// One wheel event is one zoom tick around the pointer.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        if !screen.is_finite() || !delta.dy.is_finite() {
            return Vec::new();
        }
        self.camera.zoom_at(screen, ZoomDirection::from_wheel_dy(delta.dy));
        vec![Action::CameraChanged(self.camera), Action::RenderNeeded]
    }

    /// The host finished dragging the stage to `offset`.
    pub fn on_drag_end(&mut self, offset: Point) -> Vec<Action> {
        if !offset.is_finite() {
            return Vec::new();
        }
        self.camera.pan_to(offset);
        vec![Action::CameraChanged(self.camera), Action::RenderNeeded]
    }

    // --- Queries ---

    /// Draw commands for the current state.
    #[must_use]
    pub fn scene(&self) -> Vec<DrawCommand> {
        render::build_scene(&self.session, &self.camera, self.viewport, self.last_pressure)
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Flatten the scene via `snapshot` and build the save request.
    ///
    /// # Errors
    ///
    /// Propagates snapshot failures.
    pub fn prepare_save(&self, snapshot: &impl NoteSnapshot) -> Result<SaveNoteRequest, PersistError> {
        persist::prepare_save(&self.session, snapshot)
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: ImageCache,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx, images: ImageCache::new(), core: EngineCore::new() })
    }

    // --- Delegated inputs ---

    pub fn load_note(&mut self, target: EditTarget, title: impl Into<String>) -> Vec<Action> {
        let actions = self.core.load_note(target, title);
        self.images.retain_only(self.core.session.background());
        actions
    }

    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.canvas.set_width(device_pixels(width_css, dpr));
        self.canvas.set_height(device_pixels(height_css, dpr));
        self.core.set_viewport(width_css, height_css, dpr)
    }

    pub fn on_pointer_down(&mut self, sample: PointerSample, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(sample, button)
    }

    pub fn on_pointer_move(&mut self, sample: PointerSample) -> Vec<Action> {
        self.core.on_pointer_move(sample)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.on_pointer_up()
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        self.core.on_wheel(screen, delta)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let scene = self.core.scene();
        canvas2d::execute(&self.ctx, &mut self.images, &scene)
    }

    /// Snapshot the canvas and build the save request for the current note.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Snapshot`] if the canvas cannot be encoded.
    pub fn prepare_save(&self) -> Result<SaveNoteRequest, PersistError> {
        self.core.prepare_save(self)
    }

    /// Offer the current canvas as `note.png` through a transient anchor click.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas cannot be encoded or there is no document.
    pub fn download_png(&self) -> Result<(), JsValue> {
        let link = persist::download_link(self).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let anchor = document.create_element("a")?.dyn_into::<HtmlAnchorElement>()?;
        anchor.set_download(link.file_name);
        anchor.set_href(&link.href);
        anchor.click();
        Ok(())
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }
}

impl NoteSnapshot for Engine {
    fn to_data_url(&self) -> Result<String, PersistError> {
        canvas2d::to_data_url(&self.canvas).map_err(|e| PersistError::Snapshot(format!("{e:?}")))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn device_pixels(css: f64, dpr: f64) -> u32 {
    (css * dpr).round().max(0.0) as u32
}
