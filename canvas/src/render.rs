//! Rendering: projects drawing state to a flat list of draw commands.
//!
//! [`build_scene`] is a pure function of the session, the camera, and the
//! viewport. It redraws everything from scratch on every call: clear, apply
//! the viewport transform, paint the background image, then every stroke in
//! insertion order with its tool recipe. Executing the commands is the job
//! of [`crate::canvas2d`]; nothing here touches a graphics API, so the whole
//! pipeline can be tested without a display surface.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::{Camera, Point};
use crate::consts::{BACKGROUND_HEIGHT, BACKGROUND_WIDTH};
use crate::stroke::{DrawingSession, Stroke};
use crate::style::{self, StrokeLayer};

/// Size and pixel density of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
    /// Device pixel ratio.
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, dpr: 1.0 }
    }
}

/// One segment of a stroke path, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Reset to the device-pixel transform and clear the whole surface.
    Clear { width: f64, height: f64, dpr: f64 },
    /// Apply the viewport pan and zoom on top of the current transform.
    Transform { pan_x: f64, pan_y: f64, zoom: f64 },
    /// Paint an image (data URI) into a content-space rectangle.
    Image { src: String, x: f64, y: f64, width: f64, height: f64 },
    /// Stroke a path with one recipe layer.
    Stroke { path: Vec<PathSegment>, layer: StrokeLayer },
}

/// Build the full command list for the current state.
///
/// `last_pressure` drives pen opacity for every pen stroke.
#[must_use]
pub fn build_scene(session: &DrawingSession, camera: &Camera, viewport: Viewport, last_pressure: f64) -> Vec<DrawCommand> {
    let mut out = vec![
        DrawCommand::Clear { width: viewport.width, height: viewport.height, dpr: viewport.dpr },
        DrawCommand::Transform { pan_x: camera.pan_x, pan_y: camera.pan_y, zoom: camera.zoom },
    ];

    if let Some(src) = session.background() {
        out.push(DrawCommand::Image {
            src: src.to_owned(),
            x: 0.0,
            y: 0.0,
            width: BACKGROUND_WIDTH,
            height: BACKGROUND_HEIGHT,
        });
    }

    for stroke in session.strokes() {
        push_stroke(&mut out, stroke, last_pressure);
    }

    out
}

fn push_stroke(out: &mut Vec<DrawCommand>, stroke: &Stroke, last_pressure: f64) {
    if stroke.points.is_empty() {
        return;
    }
    for layer in style::recipe(stroke, last_pressure) {
        let path = stroke_path(&stroke.points, layer.tension);
        out.push(DrawCommand::Stroke { path, layer });
    }
}

// =============================================================
// Path construction
// =============================================================

/// Path through `points`. Positive `tension` fits a cardinal spline
/// (quadratic end segments, cubic interior); zero draws straight segments.
#[must_use]
pub fn stroke_path(points: &[Point], tension: f64) -> Vec<PathSegment> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };

    let mut path = vec![PathSegment::MoveTo(first)];

    if rest.is_empty() {
        // Zero-length segment so round caps still leave a dot.
        path.push(PathSegment::LineTo(first));
        return path;
    }

    if tension <= 0.0 || points.len() < 3 {
        path.extend(rest.iter().map(|&p| PathSegment::LineTo(p)));
        return path;
    }

    // (incoming, outgoing) control points for every interior point.
    let controls: Vec<(Point, Point)> = points
        .windows(3)
        .map(|w| control_points(w[0], w[1], w[2], tension))
        .collect();

    let last = points.len() - 1;
    path.push(PathSegment::QuadTo { ctrl: controls[0].0, to: points[1] });
    for i in 1..controls.len() {
        path.push(PathSegment::CubicTo { ctrl1: controls[i - 1].1, ctrl2: controls[i].0, to: points[i + 1] });
    }
    path.push(PathSegment::QuadTo { ctrl: controls[controls.len() - 1].1, to: points[last] });
    path
}

/// Control points around `p1`, scaled by the neighbouring segment lengths.
fn control_points(p0: Point, p1: Point, p2: Point, tension: f64) -> (Point, Point) {
    let d01 = (p1.x - p0.x).hypot(p1.y - p0.y);
    let d12 = (p2.x - p1.x).hypot(p2.y - p1.y);
    let total = d01 + d12;
    if total <= 0.0 {
        return (p1, p1);
    }
    let fa = tension * d01 / total;
    let fb = tension * d12 / total;
    let dx = p2.x - p0.x;
    let dy = p2.y - p0.y;
    (Point::new(p1.x - fa * dx, p1.y - fa * dy), Point::new(p1.x + fb * dx, p1.y + fb * dy))
}
