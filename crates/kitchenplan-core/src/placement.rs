//! Placement rules: drop coordinates, boundary clamping and manipulator deltas.

use crate::catalog;
use crate::items::{Dimensions, Item, ItemKind, ItemPatch};
use crate::room::Boundary;
use glam::{EulerRot, Mat4, Vec2, Vec3};
use kurbo::{Point, Rect};

/// Distance kept between a dropped item's center and the walls, in meters.
pub const WALL_MARGIN: f32 = 0.3;

/// Clamp `value` into `[-limit, limit]`.
///
/// A negative limit (item larger than the room) pins the value to the center.
fn clamp_axis(value: f32, limit: f32) -> f32 {
    let limit = limit.max(0.0);
    value.clamp(-limit, limit)
}

/// Convert a drop point on the canvas to a floor position (x, z).
///
/// The drop point is normalized to `[-1, 1]` over the canvas rectangle,
/// scaled by the half extents of the room, then kept `margin` away from
/// the walls. Returns `None` when the canvas has no area.
pub fn screen_to_floor(drop: Point, canvas: Rect, boundary: &Boundary, margin: f32) -> Option<Vec2> {
    if canvas.width() <= 0.0 || canvas.height() <= 0.0 {
        return None;
    }

    let nx = ((drop.x - canvas.x0) / canvas.width()) * 2.0 - 1.0;
    let nz = ((drop.y - canvas.y0) / canvas.height()) * 2.0 - 1.0;

    let x = nx as f32 * boundary.half_width();
    let z = nz as f32 * boundary.half_depth();

    Some(Vec2::new(
        clamp_axis(x, boundary.half_width() - margin),
        clamp_axis(z, boundary.half_depth() - margin),
    ))
}

/// World position for a newly dropped item of `kind`.
pub fn drop_position(
    kind: ItemKind,
    drop: Point,
    canvas: Rect,
    boundary: &Boundary,
    margin: f32,
) -> Option<Vec3> {
    let floor = screen_to_floor(drop, canvas, boundary, margin)?;
    Some(Vec3::new(floor.x, catalog::entry(kind).elevation, floor.y))
}

/// World position for an item added from the drawer's Add button.
///
/// The item goes just off the room center, toward the front-right corner,
/// and is pulled back toward the center in rooms too small for that.
pub fn add_position(kind: ItemKind, dimensions: &Dimensions, boundary: &Boundary) -> Vec3 {
    let x = (dimensions.width / 2.0).min(boundary.half_width() - dimensions.width);
    let z = (dimensions.depth / 2.0).min(boundary.half_depth() - dimensions.depth);
    Vec3::new(x, catalog::entry(kind).elevation, z)
}

/// Clamp a position so the item's footprint stays inside the room.
///
/// Only the horizontal axes are touched.
pub fn clamp_to_room(position: Vec3, dimensions: &Dimensions, boundary: &Boundary) -> Vec3 {
    let half = dimensions.half_footprint();
    Vec3::new(
        clamp_axis(position.x, boundary.half_width() - half.x),
        position.y,
        clamp_axis(position.z, boundary.half_depth() - half.y),
    )
}

/// Apply a manipulator delta transform to an item.
///
/// The delta is decomposed into translation and rotation. The horizontal
/// translation is added to the current position and clamped to the room;
/// the vertical component is dropped so items keep their elevation. The
/// delta's yaw accumulates onto the item's yaw, pitch and roll are left
/// untouched.
pub fn apply_drag(item: &Item, delta: Mat4, boundary: &Boundary) -> ItemPatch {
    let (_, rotation, translation) = delta.to_scale_rotation_translation();
    let (delta_yaw, _, _) = rotation.to_euler(EulerRot::YXZ);

    let moved = item.position + Vec3::new(translation.x, 0.0, translation.z);
    let position = clamp_to_room(moved, &item.dimensions, boundary);

    let mut item_rotation = item.rotation;
    item_rotation.y += delta_yaw;

    ItemPatch {
        position: Some(position),
        rotation: Some(item_rotation),
        ..Default::default()
    }
}

/// Patch that zeroes an item's rotation on all axes.
pub fn reset_rotation() -> ItemPatch {
    ItemPatch::rotation(Vec3::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const EPS: f32 = 1e-5;

    fn canvas() -> Rect {
        Rect::new(100.0, 50.0, 900.0, 650.0)
    }

    #[test]
    fn test_center_drop_lands_at_origin() {
        let b = Boundary::default();
        let floor = screen_to_floor(Point::new(500.0, 350.0), canvas(), &b, WALL_MARGIN).unwrap();
        assert!(floor.length() < EPS);
    }

    #[test]
    fn test_drop_is_kept_off_the_walls() {
        let b = Boundary::default();
        // Raw position would be (1.8, 1.3); the margin caps it at (1.7, 1.2).
        let drop = Point::new(100.0 + 800.0 * 0.95, 50.0 + 600.0 * (1.3 / 1.5 + 1.0) / 2.0);
        let pos = drop_position(ItemKind::Cabinet, drop, canvas(), &b, WALL_MARGIN).unwrap();
        assert!((pos.x - 1.7).abs() < EPS);
        assert!((pos.y - 0.0).abs() < EPS);
        assert!((pos.z - 1.2).abs() < EPS);
    }

    #[test]
    fn test_drops_anywhere_stay_within_margin() {
        let b = Boundary::new(5.0, 2.4, 3.5);
        for px in [-300.0, 100.0, 333.0, 900.0, 2000.0] {
            for py in [-100.0, 50.0, 420.0, 650.0, 1500.0] {
                let floor = screen_to_floor(Point::new(px, py), canvas(), &b, WALL_MARGIN).unwrap();
                assert!(floor.x.abs() <= b.half_width() - WALL_MARGIN + EPS);
                assert!(floor.y.abs() <= b.half_depth() - WALL_MARGIN + EPS);
            }
        }
    }

    #[test]
    fn test_countertop_drop_is_elevated() {
        let b = Boundary::default();
        let pos = drop_position(ItemKind::Countertop, Point::new(500.0, 350.0), canvas(), &b, WALL_MARGIN)
            .unwrap();
        assert!((pos.y - catalog::COUNTER_HEIGHT).abs() < EPS);
    }

    #[test]
    fn test_add_position_near_center() {
        let b = Boundary::default();
        let pos = add_position(ItemKind::Cabinet, &Dimensions::new(0.6, 0.8, 0.6), &b);
        assert!((pos - Vec3::new(0.3, 0.0, 0.3)).length() < EPS);

        let pos = add_position(ItemKind::Countertop, &Dimensions::new(1.2, 0.04, 0.6), &b);
        assert!((pos - Vec3::new(0.6, catalog::COUNTER_HEIGHT, 0.3)).length() < EPS);
    }

    #[test]
    fn test_add_position_in_small_room() {
        let b = Boundary::new(2.0, 2.4, 2.0);
        let pos = add_position(ItemKind::Appliance, &Dimensions::new(2.0, 1.8, 1.0), &b);
        assert!((pos.x + 1.0).abs() < EPS);
        assert!(pos.z.abs() < EPS);
        assert_eq!(pos.y, 0.0);
    }

    #[test]
    fn test_zero_area_canvas_is_ignored() {
        let b = Boundary::default();
        let empty = Rect::new(10.0, 10.0, 10.0, 300.0);
        assert!(screen_to_floor(Point::new(10.0, 20.0), empty, &b, WALL_MARGIN).is_none());
    }

    #[test]
    fn test_drag_clamps_to_footprint_bounds() {
        let b = Boundary::default();
        let mut item = Item::with_defaults(ItemKind::Appliance, Vec3::ZERO);
        let limit_x = b.half_width() - item.dimensions.width / 2.0;
        let limit_z = b.half_depth() - item.dimensions.depth / 2.0;

        let patch = apply_drag(&item, Mat4::from_translation(Vec3::new(10.0, 0.0, -10.0)), &b);
        patch.apply(&mut item);
        assert!((item.position.x - limit_x).abs() < EPS);
        assert!((item.position.z + limit_z).abs() < EPS);

        // Further out-of-range deltas keep the same clamped value.
        for step in [1.0, 50.0, 1000.0] {
            let patch = apply_drag(&item, Mat4::from_translation(Vec3::new(step, 0.0, -step)), &b);
            patch.apply(&mut item);
            assert!((item.position.x - limit_x).abs() < EPS);
            assert!((item.position.z + limit_z).abs() < EPS);
        }
    }

    #[test]
    fn test_drag_keeps_elevation() {
        let b = Boundary::default();
        let item = Item::with_defaults(ItemKind::Countertop, Vec3::new(0.0, 0.9, 0.0));
        let patch = apply_drag(&item, Mat4::from_translation(Vec3::new(0.2, 3.0, 0.1)), &b);
        let pos = patch.position.unwrap();
        assert!((pos.y - 0.9).abs() < EPS);
        assert!((pos.x - 0.2).abs() < EPS);
        assert!((pos.z - 0.1).abs() < EPS);
    }

    #[test]
    fn test_drag_accumulates_yaw_only() {
        let b = Boundary::default();
        let mut item = Item::with_defaults(ItemKind::Cabinet, Vec3::ZERO);
        item.rotation = Vec3::new(0.1, 0.5, 0.2);

        let delta = Mat4::from_quat(Quat::from_rotation_y(0.25));
        let rotation = apply_drag(&item, delta, &b).rotation.unwrap();
        assert!((rotation.y - 0.75).abs() < EPS);
        assert!((rotation.x - 0.1).abs() < EPS);
        assert!((rotation.z - 0.2).abs() < EPS);
    }

    #[test]
    fn test_oversized_item_is_centered() {
        let b = Boundary::new(2.0, 2.4, 2.0);
        let dims = Dimensions::new(3.0, 0.04, 0.6);
        let pos = clamp_to_room(Vec3::new(0.7, 0.9, 0.2), &dims, &b);
        assert_eq!(pos.x, 0.0);
        assert!((pos.z - 0.2).abs() < EPS);
    }

    #[test]
    fn test_reset_rotation_patch() {
        let mut item = Item::with_defaults(ItemKind::Cabinet, Vec3::new(1.0, 0.0, 0.5));
        item.rotation = Vec3::new(0.3, 1.2, -0.4);
        let dims = item.dimensions;
        reset_rotation().apply(&mut item);
        assert_eq!(item.rotation, Vec3::ZERO);
        assert_eq!(item.position, Vec3::new(1.0, 0.0, 0.5));
        assert_eq!(item.dimensions, dims);
    }
}
