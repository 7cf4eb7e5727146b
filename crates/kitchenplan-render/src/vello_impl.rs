//! Vello-based plan-view renderer.

use crate::renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError, GRID_STEP, polygon_path};
use kitchenplan_core::manipulator::{HANDLE_HIT_TOLERANCE, Manipulator};
use kitchenplan_core::scene::{NodeGeometry, NodeKind, SceneNode};
use kurbo::{Affine, BezPath, Circle, Line, Point, Rect, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Screen-space widths, in pixels.
const OUTLINE_WIDTH: f64 = 1.0;
const SELECTION_WIDTH: f64 = 2.5;
const MANIPULATOR_WIDTH: f64 = 2.0;

const OUTLINE_COLOR: Color = Color::from_rgba8(60, 60, 60, 255);
const PART_COLOR: Color = Color::from_rgba8(60, 60, 60, 140);
const GRID_COLOR: Color = Color::from_rgba8(160, 150, 135, 90);
const AXIS_X_COLOR: Color = Color::from_rgba8(220, 60, 60, 255);
const AXIS_Z_COLOR: Color = Color::from_rgba8(60, 110, 220, 255);

/// Vello renderer drawing the layout as a top-down floor plan.
pub struct PlanRenderer {
    scene: Scene,
    /// Pixels per meter of the frame being built.
    zoom: f64,
}

impl Default for PlanRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            zoom: 1.0,
        }
    }

    /// The scene built by the last frame.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the built scene, leaving an empty one behind.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Build a frame, rejecting viewports with no area.
    pub fn render_frame(&mut self, ctx: &RenderContext) -> RenderResult<&Scene> {
        if ctx.viewport_size.width <= 0.0 || ctx.viewport_size.height <= 0.0 {
            return Err(RendererError::RenderFailed(format!(
                "Empty viewport {}x{}",
                ctx.viewport_size.width, ctx.viewport_size.height
            )));
        }
        self.build_scene(ctx);
        Ok(&self.scene)
    }

    /// Stroke width in world units for a width in screen pixels.
    fn world_width(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    fn render_grid(&mut self, floor: Rect, transform: Affine, style: GridStyle) {
        let start_x = (floor.x0 / GRID_STEP).ceil() as i64;
        let end_x = (floor.x1 / GRID_STEP).floor() as i64;
        let start_z = (floor.y0 / GRID_STEP).ceil() as i64;
        let end_z = (floor.y1 / GRID_STEP).floor() as i64;

        match style {
            GridStyle::None => {}
            GridStyle::Lines => {
                let stroke = Stroke::new(self.world_width(0.5));
                for i in start_x..=end_x {
                    let x = i as f64 * GRID_STEP;
                    let line = Line::new((x, floor.y0), (x, floor.y1));
                    self.scene.stroke(&stroke, transform, GRID_COLOR, None, &line);
                }
                for j in start_z..=end_z {
                    let z = j as f64 * GRID_STEP;
                    let line = Line::new((floor.x0, z), (floor.x1, z));
                    self.scene.stroke(&stroke, transform, GRID_COLOR, None, &line);
                }
            }
            GridStyle::Dots => {
                let radius = self.world_width(1.5);
                for i in start_x..=end_x {
                    for j in start_z..=end_z {
                        let center = Point::new(i as f64 * GRID_STEP, j as f64 * GRID_STEP);
                        self.scene
                            .fill(Fill::NonZero, transform, GRID_COLOR, None, &Circle::new(center, radius));
                    }
                }
            }
        }
    }

    fn render_node(&mut self, node: &SceneNode, transform: Affine, selection_color: Color) {
        let outline = polygon_path(&node.footprint);
        self.scene.fill(Fill::NonZero, transform, node.color, None, &outline);

        let outline_stroke = Stroke::new(self.world_width(OUTLINE_WIDTH));
        self.scene
            .stroke(&outline_stroke, transform, OUTLINE_COLOR, None, &outline);

        // Placeholder parts (door panels, handles) seen from above.
        let part_stroke = Stroke::new(self.world_width(OUTLINE_WIDTH * 0.5));
        for outline in node.placeholder_outlines() {
            let part = polygon_path(&outline);
            self.scene.stroke(&part_stroke, transform, PART_COLOR, None, &part);
        }

        // Placeholders get their front face marked so orientation stays readable.
        if let (NodeGeometry::Placeholder(_), [_, _, front_right, front_left]) =
            (&node.geometry, node.footprint.as_slice())
        {
            let front = Line::new(*front_left, *front_right);
            let stroke = Stroke::new(self.world_width(SELECTION_WIDTH));
            self.scene.stroke(&stroke, transform, OUTLINE_COLOR, None, &front);
        }

        if node.selected {
            let stroke = Stroke::new(self.world_width(SELECTION_WIDTH));
            self.scene.stroke(&stroke, transform, selection_color, None, &outline);
        }
    }

    fn render_manipulator(&mut self, manipulator: &Manipulator, transform: Affine, color: Color) {
        let stroke = Stroke::new(self.world_width(MANIPULATOR_WIDTH));
        let handle_radius = HANDLE_HIT_TOLERANCE / 2.0;

        let ring = Circle::new(manipulator.origin, manipulator.ring_radius);
        self.scene.stroke(&stroke, transform, color, None, &ring);

        for (tip, axis_color) in [
            (manipulator.x_tip(), AXIS_X_COLOR),
            (manipulator.z_tip(), AXIS_Z_COLOR),
        ] {
            let mut arrow = BezPath::new();
            arrow.move_to(manipulator.origin);
            arrow.line_to(tip);
            self.scene.stroke(&stroke, transform, axis_color, None, &arrow);
            self.scene
                .fill(Fill::NonZero, transform, axis_color, None, &Circle::new(tip, handle_radius));
        }

        self.scene.fill(
            Fill::NonZero,
            transform,
            color,
            None,
            &Circle::new(manipulator.ring_grip(), handle_radius),
        );
    }
}

impl Renderer for PlanRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.zoom = ctx.pixels_per_meter().max(f64::EPSILON);

        let transform = ctx.transform();

        let viewport = Rect::from_origin_size(Point::ZERO, ctx.viewport_size);
        self.scene
            .fill(Fill::NonZero, ctx.canvas_transform(), ctx.background_color, None, &viewport);

        // Floor first, then the grid on it, then everything standing on the floor.
        let (floor, rest): (Vec<&SceneNode>, Vec<&SceneNode>) = ctx
            .scene
            .nodes
            .iter()
            .partition(|n| matches!(n.kind, NodeKind::Floor));

        for node in floor {
            self.render_node(node, transform, ctx.selection_color);
        }
        self.render_grid(ctx.scene.boundary.floor_rect(), transform, ctx.grid_style);
        for node in rest {
            self.render_node(node, transform, ctx.selection_color);
        }

        if let Some(manipulator) = &ctx.scene.manipulator {
            self.render_manipulator(manipulator, transform, ctx.selection_color);
        }

        log::trace!("Built plan scene with {} nodes", ctx.scene.nodes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchenplan_core::assets::AssetCache;
    use kitchenplan_core::camera::Camera;
    use kitchenplan_core::items::{Item, ItemKind};
    use kitchenplan_core::layout::LayoutStore;
    use kurbo::Size;

    #[test]
    fn test_render_frame_with_selection() {
        let mut store = LayoutStore::default();
        let item = Item::with_defaults(ItemKind::Cabinet, Default::default());
        let id = item.id.clone();
        store.add_item(item);
        store.set_selected_item(Some(id));

        let scene = kitchenplan_core::scene::Scene::build(&store, &AssetCache::new());
        let mut camera = Camera::new(Size::new(800.0, 600.0));
        camera.fit_room(&scene.boundary, 40.0);

        let mut renderer = PlanRenderer::new();
        for style in [GridStyle::None, GridStyle::Lines, GridStyle::Dots] {
            let ctx = RenderContext::new(&scene, &camera)
                .with_grid(style)
                .with_canvas_origin(Point::new(170.0, 40.0));
            assert!(renderer.render_frame(&ctx).is_ok());
        }
        let taken = renderer.take_scene();
        assert!(!taken.encoding().is_empty());
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_empty_viewport_is_rejected() {
        let scene = kitchenplan_core::scene::Scene::build(&LayoutStore::default(), &AssetCache::new());
        let camera = Camera::new(Size::ZERO);
        let ctx = RenderContext::new(&scene, &camera);
        let mut renderer = PlanRenderer::new();
        assert!(matches!(renderer.render_frame(&ctx), Err(RendererError::RenderFailed(_))));
    }
}
