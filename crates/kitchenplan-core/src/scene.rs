//! Scene description built from the layout store.
//!
//! The scene is what a renderer consumes: room shell, fixtures and items
//! with their world transforms and geometry, plus the manipulator on the
//! selected item. Geometry for an item is chosen once per build from the
//! kind's asset state.

use crate::assets::{AssetCache, AssetState};
use crate::items::{Item, ItemId, ItemKind};
use crate::layout::LayoutStore;
use crate::manipulator::Manipulator;
use crate::placeholder::PlaceholderModel;
use crate::room::{Boundary, FixtureKind};
use glam::{EulerRot, Mat4, Quat, Vec3};
use kurbo::{Point, Rect};
use peniko::Color;

/// Thickness of the room walls and floor slab, in meters.
pub const WALL_THICKNESS: f32 = 0.1;

const FLOOR_COLOR: Color = Color::from_rgba8(222, 214, 200, 255);
const WALL_COLOR: Color = Color::from_rgba8(245, 245, 240, 255);
const DOOR_COLOR: Color = Color::from_rgba8(120, 85, 60, 255);
const WINDOW_COLOR: Color = Color::from_rgba8(170, 210, 235, 200);

/// Which wall a wall node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Back,
    Front,
    Left,
    Right,
}

/// What a node represents.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Floor,
    Wall(Wall),
    Fixture(FixtureKind),
    Item { id: ItemId, kind: ItemKind },
}

/// How a node is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeGeometry {
    /// A unit box scaled by the node's transform.
    Box,
    /// A loaded model resource.
    Model(String),
    /// Procedural stand-in for a model that is loading or failed to load.
    Placeholder(PlaceholderModel),
}

/// A drawable node.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub kind: NodeKind,
    /// Local to world transform.
    pub transform: Mat4,
    pub geometry: NodeGeometry,
    pub color: Color,
    pub selected: bool,
    /// Footprint on the plan, already rotated into place.
    pub footprint: Vec<Point>,
}

impl SceneNode {
    pub fn item_id(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Item { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Plan outlines of a placeholder's parts seen from above, in floor
    /// coordinates. Empty for other geometry.
    pub fn placeholder_outlines(&self) -> Vec<[Point; 4]> {
        let NodeGeometry::Placeholder(model) = &self.geometry else {
            return Vec::new();
        };
        model
            .to_mesh()
            .faces()
            .filter(|(normal, _)| normal.y > 0.5)
            .map(|(_, corners)| {
                corners.map(|corner| {
                    let world = self.transform.transform_point3(corner);
                    Point::new(world.x as f64, world.z as f64)
                })
            })
            .collect()
    }
}

/// A frame's worth of drawable state.
#[derive(Debug, Clone)]
pub struct Scene {
    pub boundary: Boundary,
    pub nodes: Vec<SceneNode>,
    pub manipulator: Option<Manipulator>,
}

impl Scene {
    /// Build the scene for the current store state.
    pub fn build(store: &LayoutStore, assets: &AssetCache) -> Self {
        let boundary = *store.boundary();
        let mut nodes = room_nodes(&boundary);

        for fixture in store.fixtures() {
            let rotation = euler_quat(fixture.rotation());
            let color = match fixture.kind() {
                FixtureKind::Door => DOOR_COLOR,
                FixtureKind::Window => WINDOW_COLOR,
            };
            nodes.push(box_node(
                NodeKind::Fixture(fixture.kind()),
                fixture.position(),
                rotation,
                fixture.size(),
                color,
            ));
        }

        for item in store.items() {
            let geometry = match assets.state(item.kind) {
                Some(AssetState::Loaded(model)) => NodeGeometry::Model(model.name.clone()),
                Some(AssetState::Loading | AssetState::Failed(_)) | None => {
                    NodeGeometry::Placeholder(PlaceholderModel::new(item.kind, &item.dimensions))
                }
            };
            let transform = Mat4::from_scale_rotation_translation(
                item.scale,
                euler_quat(item.rotation),
                item.position,
            );
            let footprint = rect_corners(item.local_footprint())
                .map(|c| item.plan_transform() * c)
                .to_vec();
            nodes.push(SceneNode {
                kind: NodeKind::Item {
                    id: item.id.clone(),
                    kind: item.kind,
                },
                transform,
                geometry,
                color: item.display_color(),
                selected: store.is_selected(&item.id),
                footprint,
            });
        }

        let manipulator = store.selected_item().map(Manipulator::for_item);

        Self {
            boundary,
            nodes,
            manipulator,
        }
    }

    /// Item nodes in draw order.
    pub fn item_nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter().filter(|n| matches!(n.kind, NodeKind::Item { .. }))
    }

    /// Number of items drawn with a placeholder.
    pub fn placeholder_count(&self) -> usize {
        self.item_nodes()
            .filter(|n| matches!(n.geometry, NodeGeometry::Placeholder(_)))
            .count()
    }
}

/// Topmost item whose rotated footprint contains a plan point.
///
/// Items added later are drawn over earlier ones, so they win.
pub fn pick_item(store: &LayoutStore, point: Point) -> Option<&Item> {
    store
        .items()
        .iter()
        .rev()
        .find(|item| item.footprint_contains(point))
}

/// Rotation from Euler angles (x, y, z), applied yaw first.
fn euler_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z)
}

fn rect_corners(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

/// A box node centered at `center` with the given size.
fn box_node(kind: NodeKind, center: Vec3, rotation: Quat, size: Vec3, color: Color) -> SceneNode {
    let transform = Mat4::from_scale_rotation_translation(size, rotation, center);
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    let plan = kurbo::Affine::translate((center.x as f64, center.z as f64))
        * kurbo::Affine::rotate(-(yaw as f64));
    let (hx, hz) = ((size.x / 2.0) as f64, (size.z / 2.0) as f64);
    let footprint = rect_corners(Rect::new(-hx, -hz, hx, hz))
        .map(|c| plan * c)
        .to_vec();
    SceneNode {
        kind,
        transform,
        geometry: NodeGeometry::Box,
        color,
        selected: false,
        footprint,
    }
}

/// Floor slab and four walls around the boundary.
fn room_nodes(boundary: &Boundary) -> Vec<SceneNode> {
    let (hw, hd, h, t) = (
        boundary.half_width(),
        boundary.half_depth(),
        boundary.height,
        WALL_THICKNESS,
    );
    let wall_y = h / 2.0;
    vec![
        box_node(
            NodeKind::Floor,
            Vec3::new(0.0, -t / 2.0, 0.0),
            Quat::IDENTITY,
            Vec3::new(boundary.width, t, boundary.depth),
            FLOOR_COLOR,
        ),
        box_node(
            NodeKind::Wall(Wall::Back),
            Vec3::new(0.0, wall_y, -hd - t / 2.0),
            Quat::IDENTITY,
            Vec3::new(boundary.width + 2.0 * t, h, t),
            WALL_COLOR,
        ),
        box_node(
            NodeKind::Wall(Wall::Front),
            Vec3::new(0.0, wall_y, hd + t / 2.0),
            Quat::IDENTITY,
            Vec3::new(boundary.width + 2.0 * t, h, t),
            WALL_COLOR,
        ),
        box_node(
            NodeKind::Wall(Wall::Left),
            Vec3::new(-hw - t / 2.0, wall_y, 0.0),
            Quat::IDENTITY,
            Vec3::new(t, h, boundary.depth),
            WALL_COLOR,
        ),
        box_node(
            NodeKind::Wall(Wall::Right),
            Vec3::new(hw + t / 2.0, wall_y, 0.0),
            Quat::IDENTITY,
            Vec3::new(t, h, boundary.depth),
            WALL_COLOR,
        ),
    ]
}
