//! Plan-view camera: maps floor meters onto the canvas in pixels.
//!
//! The plan looks straight down on the room. Floor x runs to the right and
//! floor z runs down the screen, so a plan point `(x, y)` is the floor point
//! `(x, z)`. Screen points are canvas-local pixels with the origin at the
//! canvas' top-left corner.

use crate::room::Boundary;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Pixels per meter at 100% zoom.
pub const BASE_ZOOM: f64 = 100.0;

const MIN_ZOOM: f64 = 10.0;
const MAX_ZOOM: f64 = 1000.0;

/// Camera for the top-down plan view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Floor point shown in the middle of the canvas, in meters.
    pub focus: Point,
    /// Pixels per meter.
    pub zoom: f64,
    /// Canvas size in pixels.
    pub viewport: Size,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0))
    }
}

impl Camera {
    /// Camera looking at the room center at 100% zoom.
    pub fn new(viewport: Size) -> Self {
        Self {
            focus: Point::ZERO,
            zoom: BASE_ZOOM,
            viewport,
        }
    }

    /// Zoom relative to 100 pixels per meter.
    pub fn zoom_level(&self) -> f64 {
        self.zoom / BASE_ZOOM
    }

    /// Middle of the canvas, in pixels.
    pub fn canvas_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    /// Resize the canvas, keeping the focus in its middle.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Floor-to-canvas transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.canvas_center().to_vec2())
            * Affine::scale(self.zoom)
            * Affine::translate(-self.focus.to_vec2())
    }

    /// Floor point under a canvas pixel.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.focus + (screen - self.canvas_center()) / self.zoom
    }

    /// Canvas pixel of a floor point.
    pub fn world_to_screen(&self, world: Point) -> Point {
        self.canvas_center() + (world - self.focus) * self.zoom
    }

    /// Move the view by a pointer delta in pixels. The floor follows the pointer.
    pub fn pan(&mut self, delta: Vec2) {
        self.focus -= delta / self.zoom;
    }

    /// Change the zoom by `factor`, keeping the floor point under `anchor` in place.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let floor = self.screen_to_world(anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.focus = floor - (anchor - self.canvas_center()) / self.zoom;
    }

    /// Center the room and scale it to fill the canvas, leaving `padding`
    /// pixels on the tighter side.
    pub fn fit_room(&mut self, boundary: &Boundary, padding: f64) {
        let floor = boundary.floor_rect();
        self.focus = floor.center();
        if floor.is_zero_area() {
            self.zoom = BASE_ZOOM;
            return;
        }
        let usable_w = (self.viewport.width - 2.0 * padding).max(1.0);
        let usable_h = (self.viewport.height - 2.0 * padding).max(1.0);
        self.zoom = (usable_w / floor.width())
            .min(usable_h / floor.height())
            .clamp(MIN_ZOOM, MAX_ZOOM);
    }
}
