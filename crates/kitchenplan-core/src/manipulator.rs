//! Drag manipulator attached to the selected item.
//!
//! The manipulator turns pointer drags on the plan view into delta
//! transforms, which the layout store decomposes and clamps.

use crate::items::Item;
use glam::{Mat4, Quat, Vec3};
use kurbo::{Point, Vec2};

/// Length of the axis arrows beyond the item's footprint, in meters.
pub const ARROW_LENGTH: f64 = 0.35;
/// Hit tolerance for handles, in meters.
pub const HANDLE_HIT_TOLERANCE: f64 = 0.08;

/// A grabbable part of the manipulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Arrow along world x.
    MoveX,
    /// Arrow along world z.
    MoveZ,
    /// Ring around the vertical axis.
    Rotate,
    /// The item body: free move on the floor.
    Body,
}

/// A manipulator handle and its plan position.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
}

impl Handle {
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// Check if a plan point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Manipulator placed on an item, in plan coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Manipulator {
    pub target: String,
    /// Item center on the plan.
    pub origin: Point,
    /// Radius of the rotation ring.
    pub ring_radius: f64,
}

impl Manipulator {
    /// Attach a manipulator to an item.
    pub fn for_item(item: &Item) -> Self {
        let bounds = item.local_footprint();
        let ring_radius = (bounds.width().hypot(bounds.height()) / 2.0) + ARROW_LENGTH / 2.0;
        Self {
            target: item.id.clone(),
            origin: Point::new(item.position.x as f64, item.position.z as f64),
            ring_radius,
        }
    }

    /// Tip of the x arrow.
    pub fn x_tip(&self) -> Point {
        self.origin + Vec2::new(self.ring_radius + ARROW_LENGTH, 0.0)
    }

    /// Tip of the z arrow.
    pub fn z_tip(&self) -> Point {
        self.origin + Vec2::new(0.0, self.ring_radius + ARROW_LENGTH)
    }

    /// Grab point on the rotation ring (the ring's "north" on the plan).
    pub fn ring_grip(&self) -> Point {
        self.origin + Vec2::new(0.0, -self.ring_radius)
    }

    /// Handles in hit-test priority order.
    pub fn handles(&self) -> Vec<Handle> {
        vec![
            Handle::new(HandleKind::MoveX, self.x_tip()),
            Handle::new(HandleKind::MoveZ, self.z_tip()),
            Handle::new(HandleKind::Rotate, self.ring_grip()),
        ]
    }

    /// Find the handle under a plan point.
    ///
    /// The rotation ring can be grabbed anywhere along its circle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<HandleKind> {
        if let Some(handle) = self.handles().into_iter().find(|h| h.hit_test(point, tolerance)) {
            return Some(handle.kind);
        }
        let distance = (point - self.origin).hypot();
        if (distance - self.ring_radius).abs() <= tolerance {
            return Some(HandleKind::Rotate);
        }
        None
    }

    /// Delta transform for dragging `handle` from `from` to `to` on the plan.
    pub fn drag_delta(&self, handle: HandleKind, from: Point, to: Point) -> Mat4 {
        let d = to - from;
        match handle {
            HandleKind::MoveX => Mat4::from_translation(Vec3::new(d.x as f32, 0.0, 0.0)),
            HandleKind::MoveZ => Mat4::from_translation(Vec3::new(0.0, 0.0, d.y as f32)),
            HandleKind::Body => Mat4::from_translation(Vec3::new(d.x as f32, 0.0, d.y as f32)),
            HandleKind::Rotate => {
                let a0 = (from - self.origin).atan2();
                let a1 = (to - self.origin).atan2();
                // A positive plan angle is a negative yaw.
                Mat4::from_quat(Quat::from_rotation_y(-(a1 - a0) as f32))
            }
        }
    }
}
