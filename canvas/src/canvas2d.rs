//! Canvas2D executor: replays a draw command list onto a browser canvas.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives commands from [`crate::render::build_scene`] and produces
//! pixels; it does not mutate any drawing state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::collections::HashMap;

use js_sys::Array;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::render::{DrawCommand, PathSegment};
use crate::style::{StrokeLayer, css_with_alpha};

/// Decoded background images keyed by data URI.
///
/// Images decode asynchronously; a background that has not finished loading
/// is skipped and appears on the next redraw.
#[derive(Default)]
pub struct ImageCache {
    images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_load(&mut self, src: &str) -> Result<&HtmlImageElement, JsValue> {
        if !self.images.contains_key(src) {
            let img = HtmlImageElement::new()?;
            img.set_src(src);
            self.images.insert(src.to_owned(), img);
        }
        self.images
            .get(src)
            .ok_or_else(|| JsValue::from_str("image cache miss"))
    }

    /// Forget every cached image except `keep`.
    pub fn retain_only(&mut self, keep: Option<&str>) {
        self.images.retain(|src, _| Some(src.as_str()) == keep);
    }
}

/// Execute `commands` in order.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn execute(ctx: &CanvasRenderingContext2d, images: &mut ImageCache, commands: &[DrawCommand]) -> Result<(), JsValue> {
    for cmd in commands {
        match cmd {
            DrawCommand::Clear { width, height, dpr } => {
                ctx.set_transform(*dpr, 0.0, 0.0, *dpr, 0.0, 0.0)?;
                ctx.clear_rect(0.0, 0.0, *width, *height);
            }
            DrawCommand::Transform { pan_x, pan_y, zoom } => {
                ctx.translate(*pan_x, *pan_y)?;
                ctx.scale(*zoom, *zoom)?;
            }
            DrawCommand::Image { src, x, y, width, height } => {
                let img = images.get_or_load(src)?;
                if img.complete() && img.natural_width() > 0 {
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, *x, *y, *width, *height)?;
                }
            }
            DrawCommand::Stroke { path, layer } => stroke_layer(ctx, path, layer)?,
        }
    }
    Ok(())
}

fn stroke_layer(ctx: &CanvasRenderingContext2d, path: &[PathSegment], layer: &StrokeLayer) -> Result<(), JsValue> {
    ctx.save();

    ctx.set_global_alpha(layer.opacity);
    ctx.set_global_composite_operation(layer.composite.as_css())?;
    ctx.set_stroke_style_str(&layer.color);
    ctx.set_line_width(layer.width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");

    let dash: Array = layer.dash.iter().map(|d| JsValue::from_f64(*d)).collect();
    ctx.set_line_dash(&dash)?;

    if let Some(shadow) = &layer.shadow {
        ctx.set_shadow_color(&css_with_alpha(&shadow.color, shadow.opacity));
        ctx.set_shadow_blur(shadow.blur);
    }

    ctx.begin_path();
    for seg in path {
        match *seg {
            PathSegment::MoveTo(p) => ctx.move_to(p.x, p.y),
            PathSegment::LineTo(p) => ctx.line_to(p.x, p.y),
            PathSegment::QuadTo { ctrl, to } => ctx.quadratic_curve_to(ctrl.x, ctrl.y, to.x, to.y),
            PathSegment::CubicTo { ctrl1, ctrl2, to } => {
                ctx.bezier_curve_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y);
            }
        }
    }
    ctx.stroke();

    ctx.restore();
    Ok(())
}

/// Flatten the canvas's current pixels to a PNG data URI.
///
/// # Errors
///
/// Returns `Err` if the canvas is tainted or encoding fails.
pub fn to_data_url(canvas: &HtmlCanvasElement) -> Result<String, JsValue> {
    canvas.to_data_url_with_type("image/png")
}
