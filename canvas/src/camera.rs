#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::ZOOM_STEP;

/// A point in either screen or content space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Point serializes as an `[x, y]` pair.
impl Serialize for Point {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.x, self.y).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (x, y) = <(f64, f64)>::deserialize(deserializer)?;
        Ok(Self { x, y })
    }
}

/// Direction of a discrete zoom tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Scale up by one step.
    In,
    /// Scale down by one step.
    Out,
}

impl ZoomDirection {
    /// Map a wheel delta to a zoom direction. Scrolling down (`dy > 0`) zooms out.
    #[must_use]
    pub fn from_wheel_dy(dy: f64) -> Self {
        if dy > 0.0 { Self::Out } else { Self::In }
    }
}

/// Viewport transform applied uniformly to everything drawn.
///
/// `pan_x` / `pan_y` are the content origin's position in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom). Neither is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to content coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a content-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Zoom one step around `screen`, keeping the content point under it fixed.
    pub fn zoom_at(&mut self, screen: Point, direction: ZoomDirection) {
        let anchor = self.screen_to_world(screen);
        self.zoom = match direction {
            ZoomDirection::In => self.zoom * ZOOM_STEP,
            ZoomDirection::Out => self.zoom / ZOOM_STEP,
        };
        self.pan_x = screen.x - anchor.x * self.zoom;
        self.pan_y = screen.y - anchor.y * self.zoom;
    }

    /// Move the content origin to `offset` (the drag's resulting position).
    pub fn pan_to(&mut self, offset: Point) {
        self.pan_x = offset.x;
        self.pan_y = offset.y;
    }

    /// Shift the content origin by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Current content origin in screen space.
    #[must_use]
    pub fn offset(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }
}
