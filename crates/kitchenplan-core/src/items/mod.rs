//! Placeable kitchen items.

mod color;

pub use color::{parse_hex_color, to_hex_color};

use crate::catalog;
use glam::{Vec2, Vec3};
use kurbo::{Affine, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an item.
pub type ItemId = String;

/// The kind of a placeable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Cabinet,
    Countertop,
    Appliance,
}

impl ItemKind {
    /// All kinds in drawer order.
    pub const ALL: [ItemKind; 3] = [ItemKind::Cabinet, ItemKind::Countertop, ItemKind::Appliance];

    /// Lowercase name, also used as the drag-and-drop payload.
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Cabinet => "cabinet",
            ItemKind::Countertop => "countertop",
            ItemKind::Appliance => "appliance",
        }
    }

    /// Human readable label for menus and dialogs.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Cabinet => "Cabinet",
            ItemKind::Countertop => "Countertop",
            ItemKind::Appliance => "Appliance",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized item kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown item kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ItemKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s.trim())
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Width, height and depth of an item in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    /// Dimensions as a (width, height, depth) vector.
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    /// Half of the floor footprint (width, depth).
    pub fn half_footprint(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.depth / 2.0)
    }
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

/// A piece of kitchen furniture placed in the room.
///
/// `position` is the center of the item's base; `rotation` holds Euler
/// angles in radians of which only the yaw (`y`) is driven by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    /// Display color as a CSS hex string. Empty means the kind's color.
    #[serde(default)]
    pub color: String,
    pub dimensions: Dimensions,
}

impl Item {
    /// Create a new item with a freshly generated id.
    pub fn new(kind: ItemKind, position: Vec3, dimensions: Dimensions) -> Self {
        Self {
            id: generate_item_id(kind),
            kind,
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            color: catalog::entry(kind).color.to_string(),
            dimensions,
        }
    }

    /// Create an item with the kind's default dimensions.
    pub fn with_defaults(kind: ItemKind, position: Vec3) -> Self {
        Self::new(kind, position, catalog::entry(kind).dimensions)
    }

    /// Rotation around the vertical axis in radians.
    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }

    /// The color used for display, falling back to the kind's color.
    pub fn display_color(&self) -> Color {
        parse_hex_color(&self.color)
            .or_else(|| parse_hex_color(catalog::entry(self.kind).color))
            .unwrap_or(Color::from_rgba8(128, 128, 128, 255))
    }

    /// Unrotated footprint centered on the origin, in plan coordinates.
    pub fn local_footprint(&self) -> Rect {
        let half = self.dimensions.half_footprint();
        let (hx, hz) = ((half.x * self.scale.x) as f64, (half.y * self.scale.z) as f64);
        Rect::new(-hx, -hz, hx, hz)
    }

    /// Transform from the local footprint to plan coordinates.
    ///
    /// Plan coordinates map world x to x and world z to y. A positive yaw
    /// turns world x toward -z, which is a negative angle on the plan.
    pub fn plan_transform(&self) -> Affine {
        Affine::translate((self.position.x as f64, self.position.z as f64))
            * Affine::rotate(-(self.yaw() as f64))
    }

    /// Check whether a plan point lies on the item's rotated footprint.
    pub fn footprint_contains(&self, point: Point) -> bool {
        let local = self.plan_transform().inverse() * point;
        self.local_footprint().contains(local)
    }

    /// Axis-aligned bounds of the rotated footprint in plan coordinates.
    pub fn plan_bounds(&self) -> Rect {
        let local = self.local_footprint();
        let transform = self.plan_transform();
        let corners = [
            Point::new(local.x0, local.y0),
            Point::new(local.x1, local.y0),
            Point::new(local.x1, local.y1),
            Point::new(local.x0, local.y1),
        ];
        let first = transform * corners[0];
        corners[1..]
            .iter()
            .fold(Rect::from_points(first, first), |acc, &c| {
                acc.union_pt(transform * c)
            })
    }
}

/// Generate a new item id of the form `<kind>-<uuid>`.
pub fn generate_item_id(kind: ItemKind) -> ItemId {
    format!("{}-{}", kind.name(), Uuid::new_v4())
}

/// Partial update merged into an existing item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
    pub color: Option<String>,
    pub dimensions: Option<Dimensions>,
}

impl ItemPatch {
    pub fn position(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn rotation(rotation: Vec3) -> Self {
        Self {
            rotation: Some(rotation),
            ..Default::default()
        }
    }

    /// Check if the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the present fields into `item`.
    pub fn apply(self, item: &mut Item) {
        if let Some(position) = self.position {
            item.position = position;
        }
        if let Some(rotation) = self.rotation {
            item.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            item.scale = scale;
        }
        if let Some(color) = self.color {
            item.color = color;
        }
        if let Some(dimensions) = self.dimensions {
            item.dimensions = dimensions;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("cabinet".parse::<ItemKind>(), Ok(ItemKind::Cabinet));
        assert_eq!(" appliance ".parse::<ItemKind>(), Ok(ItemKind::Appliance));
        assert!("sofa".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_new_item_ids_are_unique() {
        let a = Item::with_defaults(ItemKind::Cabinet, Vec3::ZERO);
        let b = Item::with_defaults(ItemKind::Cabinet, Vec3::ZERO);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("cabinet-"));
        assert_eq!(a.scale, Vec3::ONE);
        assert_eq!(a.rotation, Vec3::ZERO);
    }

    #[test]
    fn test_item_json_shape() {
        let json = r##"{
            "id": "a1",
            "type": "cabinet",
            "position": [0.5, 0.0, -0.5],
            "rotation": [0.0, 1.0, 0.0],
            "dimensions": {"width": 0.6, "height": 0.8, "depth": 0.6}
        }"##;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "a1");
        assert_eq!(item.kind, ItemKind::Cabinet);
        assert_eq!(item.position, Vec3::new(0.5, 0.0, -0.5));
        assert_eq!(item.scale, Vec3::ONE);
        assert!(item.color.is_empty());

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "cabinet");
        assert!(value["position"].is_array());
    }

    #[test]
    fn test_display_color_falls_back_to_kind() {
        let mut item = Item::with_defaults(ItemKind::Appliance, Vec3::ZERO);
        item.color = "not a color".to_string();
        let expected = parse_hex_color(catalog::entry(ItemKind::Appliance).color).unwrap();
        assert_eq!(item.display_color().to_rgba8(), expected.to_rgba8());
    }

    #[test]
    fn test_footprint_follows_yaw() {
        let mut item = Item::new(
            ItemKind::Countertop,
            Vec3::new(1.0, 0.9, 0.0),
            Dimensions::new(2.0, 0.04, 0.6),
        );
        assert!(item.footprint_contains(Point::new(1.9, 0.0)));
        assert!(!item.footprint_contains(Point::new(1.0, 0.9)));

        item.rotation.y = FRAC_PI_2;
        assert!(!item.footprint_contains(Point::new(1.9, 0.0)));
        assert!(item.footprint_contains(Point::new(1.0, 0.9)));

        let bounds = item.plan_bounds();
        assert!((bounds.width() - 0.6).abs() < 1e-4);
        assert!((bounds.height() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_patch_merges_present_fields() {
        let mut item = Item::with_defaults(ItemKind::Cabinet, Vec3::ZERO);
        let dims = item.dimensions;
        ItemPatch {
            position: Some(Vec3::new(1.0, 0.0, 1.0)),
            color: Some("#ffffff".to_string()),
            ..Default::default()
        }
        .apply(&mut item);
        assert_eq!(item.position, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(item.color, "#ffffff");
        assert_eq!(item.dimensions, dims);
        assert!(ItemPatch::default().is_empty());
    }
}
