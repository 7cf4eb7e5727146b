//! Renderer trait abstraction.

use kitchenplan_core::camera::Camera;
use kitchenplan_core::scene::Scene;
use kurbo::{Affine, BezPath, Point, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid spacing on the floor, in meters.
pub const GRID_STEP: f64 = 0.5;

/// Floor grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// Plain floor.
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Only intersection dots.
    Dots,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::Dots => "Dots",
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a Scene,
    /// Plan-view camera.
    pub camera: &'a Camera,
    /// Canvas size in logical pixels.
    pub viewport_size: Size,
    /// Top-left corner of the canvas inside the render target, in logical pixels.
    pub canvas_origin: Point,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    pub background_color: Color,
    pub grid_style: GridStyle,
    /// Outline color of the selected item and the manipulator.
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context for the camera's canvas.
    pub fn new(scene: &'a Scene, camera: &'a Camera) -> Self {
        Self {
            scene,
            camera,
            viewport_size: camera.viewport,
            canvas_origin: Point::ZERO,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            grid_style: GridStyle::Lines,
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Place the canvas inside a larger render target.
    pub fn with_canvas_origin(mut self, origin: Point) -> Self {
        self.canvas_origin = origin;
        self
    }

    /// Floor-to-target transform, including canvas offset and HiDPI scaling.
    pub fn transform(&self) -> Affine {
        self.canvas_transform() * self.camera.transform()
    }

    /// Canvas-to-target transform.
    pub fn canvas_transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * Affine::translate(self.canvas_origin.to_vec2())
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Pixels per meter after HiDPI scaling.
    pub fn pixels_per_meter(&self) -> f64 {
        self.camera.zoom * self.scale_factor
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

/// Closed polygon through `points`.
pub fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(&first) = iter.next() {
        path.move_to(first);
        for &p in iter {
            path.line_to(p);
        }
        path.close_path();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchenplan_core::assets::AssetCache;
    use kitchenplan_core::layout::LayoutStore;
    use kurbo::PathEl;

    #[test]
    fn test_grid_style_cycles() {
        let start = GridStyle::default();
        assert_eq!(start.next().next().next(), start);
        assert_eq!(GridStyle::Dots.name(), "Dots");
    }

    #[test]
    fn test_polygon_path() {
        let path = polygon_path(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)]);
        let elements = path.elements();
        assert_eq!(elements.len(), 4);
        assert!(matches!(elements[0], PathEl::MoveTo(_)));
        assert!(matches!(elements[3], PathEl::ClosePath));
        assert!(polygon_path(&[]).elements().is_empty());
    }

    #[test]
    fn test_context_scale() {
        let scene = Scene::build(&LayoutStore::default(), &AssetCache::new());
        let camera = Camera::new(Size::new(800.0, 600.0));
        let ctx = RenderContext::new(&scene, &camera)
            .with_scale_factor(2.0)
            .with_grid(GridStyle::None);
        assert!((ctx.pixels_per_meter() - camera.zoom * 2.0).abs() < 1e-9);
        assert_eq!(ctx.grid_style, GridStyle::None);
        assert_eq!(ctx.viewport_size, camera.viewport);
    }

    #[test]
    fn test_canvas_origin_offsets_plan() {
        let scene = Scene::build(&LayoutStore::default(), &AssetCache::new());
        let camera = Camera::new(Size::new(800.0, 600.0));
        let ctx = RenderContext::new(&scene, &camera)
            .with_canvas_origin(Point::new(170.0, 40.0))
            .with_scale_factor(2.0);
        let center = ctx.transform() * Point::ZERO;
        assert!((center - Point::new(1140.0, 680.0)).hypot() < 1e-9);
    }
}
