//! Procedural placeholder models shown when a kind's model is unavailable.
//!
//! Placeholders are built from boxes in item-local space: origin at the
//! center of the base, y up, the front face toward +z.

use crate::items::{Dimensions, ItemKind};
use glam::Vec3;

/// Thickness of door panels and handles, in meters.
const PANEL: f32 = 0.02;
/// Gap left around door panels, in meters.
const GAP: f32 = 0.01;

/// Surface role of a placeholder part, mapped to a color by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    /// Main body in the item's color.
    Body,
    /// Door panels, a shade off the body.
    Panel,
    /// Metal handles.
    Handle,
}

/// An axis-aligned box part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub center: Vec3,
    pub size: Vec3,
    pub tint: Tint,
}

impl Cuboid {
    fn new(center: Vec3, size: Vec3, tint: Tint) -> Self {
        Self { center, size, tint }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.size / 2.0
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.size / 2.0
    }
}

/// Triangle mesh with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Quads as (normal, corners). Every face is four consecutive vertices.
    pub fn faces(&self) -> impl Iterator<Item = (Vec3, [Vec3; 4])> + '_ {
        self.positions
            .chunks_exact(4)
            .zip(self.normals.chunks_exact(4))
            .map(|(corners, normals)| (normals[0], [corners[0], corners[1], corners[2], corners[3]]))
    }

    /// Append a box as six quads with outward normals.
    pub fn push_cuboid(&mut self, cuboid: &Cuboid) {
        let (lo, hi) = (cuboid.min(), cuboid.max());
        // (normal, four corners counter-clockwise seen from outside)
        let faces: [(Vec3, [Vec3; 4]); 6] = [
            (Vec3::X, [
                Vec3::new(hi.x, lo.y, hi.z), Vec3::new(hi.x, lo.y, lo.z),
                Vec3::new(hi.x, hi.y, lo.z), Vec3::new(hi.x, hi.y, hi.z),
            ]),
            (Vec3::NEG_X, [
                Vec3::new(lo.x, lo.y, lo.z), Vec3::new(lo.x, lo.y, hi.z),
                Vec3::new(lo.x, hi.y, hi.z), Vec3::new(lo.x, hi.y, lo.z),
            ]),
            (Vec3::Y, [
                Vec3::new(lo.x, hi.y, hi.z), Vec3::new(hi.x, hi.y, hi.z),
                Vec3::new(hi.x, hi.y, lo.z), Vec3::new(lo.x, hi.y, lo.z),
            ]),
            (Vec3::NEG_Y, [
                Vec3::new(lo.x, lo.y, lo.z), Vec3::new(hi.x, lo.y, lo.z),
                Vec3::new(hi.x, lo.y, hi.z), Vec3::new(lo.x, lo.y, hi.z),
            ]),
            (Vec3::Z, [
                Vec3::new(lo.x, lo.y, hi.z), Vec3::new(hi.x, lo.y, hi.z),
                Vec3::new(hi.x, hi.y, hi.z), Vec3::new(lo.x, hi.y, hi.z),
            ]),
            (Vec3::NEG_Z, [
                Vec3::new(hi.x, lo.y, lo.z), Vec3::new(lo.x, lo.y, lo.z),
                Vec3::new(lo.x, hi.y, lo.z), Vec3::new(hi.x, hi.y, lo.z),
            ]),
        ];

        for (normal, corners) in faces {
            let base = self.positions.len() as u32;
            self.positions.extend_from_slice(&corners);
            self.normals.extend_from_slice(&[normal; 4]);
            self.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }
}

/// A placeholder model for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderModel {
    pub kind: ItemKind,
    pub parts: Vec<Cuboid>,
}

impl PlaceholderModel {
    /// Build the placeholder for a kind at the given dimensions.
    pub fn new(kind: ItemKind, dims: &Dimensions) -> Self {
        let parts = match kind {
            ItemKind::Cabinet => cabinet_parts(dims),
            ItemKind::Countertop => vec![body(dims)],
            ItemKind::Appliance => appliance_parts(dims),
        };
        Self { kind, parts }
    }

    /// Local-space bounds as (min, max).
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.parts.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), part| (lo.min(part.min()), hi.max(part.max())),
        )
    }

    /// Triangulate all parts into a single mesh.
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::default();
        for part in &self.parts {
            mesh.push_cuboid(part);
        }
        mesh
    }
}

fn body(dims: &Dimensions) -> Cuboid {
    Cuboid::new(Vec3::new(0.0, dims.height / 2.0, 0.0), dims.size(), Tint::Body)
}

/// A door panel flush with the front face, spanning `y0..y1`.
fn front_panel(dims: &Dimensions, y0: f32, y1: f32) -> Cuboid {
    let width = (dims.width - 2.0 * GAP).max(PANEL);
    let height = (y1 - y0 - 2.0 * GAP).max(PANEL);
    Cuboid::new(
        Vec3::new(0.0, (y0 + y1) / 2.0, dims.depth / 2.0 - PANEL / 2.0),
        Vec3::new(width, height, PANEL),
        Tint::Panel,
    )
}

/// A handle standing proud of the front face.
fn handle(x: f32, y: f32, length: f32, depth: f32) -> Cuboid {
    Cuboid::new(
        Vec3::new(x, y, depth / 2.0 + PANEL / 2.0),
        Vec3::new(PANEL, length, PANEL),
        Tint::Handle,
    )
}

fn cabinet_parts(dims: &Dimensions) -> Vec<Cuboid> {
    let handle_len = (dims.height * 0.3).min(0.12);
    vec![
        body(dims),
        front_panel(dims, 0.0, dims.height),
        handle(
            dims.width / 2.0 - 0.06_f32.min(dims.width / 4.0),
            dims.height * 0.75,
            handle_len,
            dims.depth,
        ),
    ]
}

fn appliance_parts(dims: &Dimensions) -> Vec<Cuboid> {
    let split = dims.height * 0.4;
    let x = dims.width / 2.0 - 0.08_f32.min(dims.width / 4.0);
    vec![
        body(dims),
        front_panel(dims, 0.0, split),
        front_panel(dims, split, dims.height),
        handle(x, split / 2.0 + split * 0.25, (split * 0.4).min(0.3), dims.depth),
        handle(x, split + (dims.height - split) * 0.3, ((dims.height - split) * 0.4).min(0.4), dims.depth),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_countertop_is_a_slab() {
        let dims = Dimensions::new(1.2, 0.04, 0.6);
        let model = PlaceholderModel::new(ItemKind::Countertop, &dims);
        assert_eq!(model.parts.len(), 1);
        let (lo, hi) = model.bounds();
        assert!((lo - Vec3::new(-0.6, 0.0, -0.3)).length() < EPS);
        assert!((hi - Vec3::new(0.6, 0.04, 0.3)).length() < EPS);
    }

    #[test]
    fn test_bounds_match_dimensions() {
        for kind in ItemKind::ALL {
            let dims = crate::catalog::entry(kind).dimensions;
            let (lo, hi) = PlaceholderModel::new(kind, &dims).bounds();
            assert!((hi.x - lo.x - dims.width).abs() < EPS, "{kind}");
            assert!((hi.y - lo.y - dims.height).abs() < EPS, "{kind}");
            assert!(lo.y.abs() < EPS, "{kind} should rest on its base");
            // Only handles may stand out of the front face.
            assert!((lo.z + dims.depth / 2.0).abs() < EPS, "{kind}");
            assert!(hi.z <= dims.depth / 2.0 + PANEL + EPS, "{kind}");
        }
    }

    #[test]
    fn test_cabinet_has_door_and_handle() {
        let model = PlaceholderModel::new(ItemKind::Cabinet, &Dimensions::new(0.6, 0.8, 0.6));
        let tints: Vec<Tint> = model.parts.iter().map(|p| p.tint).collect();
        assert_eq!(tints, vec![Tint::Body, Tint::Panel, Tint::Handle]);
    }

    #[test]
    fn test_mesh_topology() {
        let model = PlaceholderModel::new(ItemKind::Appliance, &Dimensions::new(0.9, 1.8, 0.7));
        let mesh = model.to_mesh();
        assert_eq!(mesh.positions.len(), model.parts.len() * 24);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        assert_eq!(mesh.triangle_count(), model.parts.len() * 12);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.positions.len()));
    }

    #[test]
    fn test_faces_follow_parts() {
        let model = PlaceholderModel::new(ItemKind::Cabinet, &Dimensions::new(0.6, 0.8, 0.6));
        let mesh = model.to_mesh();
        assert_eq!(mesh.faces().count(), model.parts.len() * 6);
        let tops = mesh.faces().filter(|(normal, _)| *normal == Vec3::Y).count();
        assert_eq!(tops, model.parts.len());
    }

    #[test]
    fn test_faces_wind_outward() {
        let mut mesh = Mesh::default();
        mesh.push_cuboid(&Cuboid::new(Vec3::ZERO, Vec3::ONE, Tint::Body));
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
            let face_normal = (b - a).cross(c - a).normalize();
            let vertex_normal = mesh.normals[tri[0] as usize];
            assert!((face_normal - vertex_normal).length() < EPS);
        }
    }
}
