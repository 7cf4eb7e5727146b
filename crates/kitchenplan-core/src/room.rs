//! Room envelope and the fixed fixtures placed in its walls.

use glam::Vec3;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Allowed room width in meters.
pub const WIDTH_RANGE: RangeInclusive<f32> = 2.0..=10.0;
/// Allowed room height in meters.
pub const HEIGHT_RANGE: RangeInclusive<f32> = 2.0..=4.0;
/// Allowed room depth in meters.
pub const DEPTH_RANGE: RangeInclusive<f32> = 2.0..=10.0;

/// The rectangular room envelope.
///
/// Centered at the origin on the floor plane (x/z), floor at y = 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Extent along x, in meters.
    pub width: f32,
    /// Wall height, in meters.
    pub height: f32,
    /// Extent along z, in meters.
    pub depth: f32,
}

impl Default for Boundary {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 2.4,
            depth: 3.0,
        }
    }
}

impl Boundary {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_depth(&self) -> f32 {
        self.depth / 2.0
    }

    /// The floor outline in plan coordinates (x right, z down).
    pub fn floor_rect(&self) -> Rect {
        let hw = self.half_width() as f64;
        let hd = self.half_depth() as f64;
        Rect::new(-hw, -hd, hw, hd)
    }

    /// Check whether a point lies inside the room volume.
    pub fn contains(&self, point: Vec3) -> bool {
        point.x.abs() <= self.half_width()
            && point.z.abs() <= self.half_depth()
            && (0.0..=self.height).contains(&point.y)
    }
}

/// Errors raised by the room configuration dialog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoomConfigError {
    #[error("Room width {0} m is outside 2-10 m")]
    Width(f32),
    #[error("Room height {0} m is outside 2-4 m")]
    Height(f32),
    #[error("Room depth {0} m is outside 2-10 m")]
    Depth(f32),
}

/// Values collected by the initial room configuration dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomConfig {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        let b = Boundary::default();
        Self {
            width: b.width,
            height: b.height,
            depth: b.depth,
        }
    }
}

impl From<Boundary> for RoomConfig {
    fn from(b: Boundary) -> Self {
        Self {
            width: b.width,
            height: b.height,
            depth: b.depth,
        }
    }
}

impl RoomConfig {
    /// Validate the entered values and produce a boundary.
    pub fn validate(&self) -> Result<Boundary, RoomConfigError> {
        if !WIDTH_RANGE.contains(&self.width) {
            return Err(RoomConfigError::Width(self.width));
        }
        if !HEIGHT_RANGE.contains(&self.height) {
            return Err(RoomConfigError::Height(self.height));
        }
        if !DEPTH_RANGE.contains(&self.depth) {
            return Err(RoomConfigError::Depth(self.depth));
        }
        Ok(Boundary::new(self.width, self.height, self.depth))
    }
}

/// Kind of structural fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureKind {
    Door,
    Window,
}

impl FixtureKind {
    pub fn name(self) -> &'static str {
        match self {
            FixtureKind::Door => "door",
            FixtureKind::Window => "window",
        }
    }
}

/// A non-movable door or window set into a wall.
///
/// Fixtures are created once with the room and never edited afterwards,
/// so all fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedFixture {
    kind: FixtureKind,
    position: Vec3,
    rotation: Vec3,
    width: f32,
    height: f32,
    depth: f32,
}

impl FixedFixture {
    pub fn new(kind: FixtureKind, position: Vec3, rotation: Vec3, size: Vec3) -> Self {
        Self {
            kind,
            position,
            rotation,
            width: size.x,
            height: size.y,
            depth: size.z,
        }
    }

    pub fn kind(&self) -> FixtureKind {
        self.kind
    }

    /// Center of the fixture.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Euler angles (x, y, z) in radians.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Width, height and depth packed as a vector.
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

/// Fixtures of a fresh room, on the right-hand wall (`x = W/2`).
///
/// The door sits at the front corner turned a quarter turn about y. The
/// window is centered on the wall. Both follow the boundary when it changes.
pub fn default_fixtures(boundary: &Boundary) -> Vec<FixedFixture> {
    let right = boundary.half_width();
    vec![
        FixedFixture::new(
            FixtureKind::Door,
            Vec3::new(right, 1.1, boundary.half_depth()),
            Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
            Vec3::new(0.9, 2.2, 0.1),
        ),
        FixedFixture::new(
            FixtureKind::Window,
            Vec3::new(right, 1.5, 0.0),
            Vec3::ZERO,
            Vec3::new(1.2, 1.0, 0.1),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_boundary() {
        let b = Boundary::default();
        assert_eq!(b, Boundary::new(4.0, 2.4, 3.0));
        assert!((b.half_width() - 2.0).abs() < f32::EPSILON);
        assert!((b.half_depth() - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_floor_rect() {
        let rect = Boundary::default().floor_rect();
        assert!((rect.x0 + 2.0).abs() < 1e-6);
        assert!((rect.y1 - 1.5).abs() < 1e-6);
        assert!((rect.width() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_room_config_validation() {
        assert_eq!(RoomConfig::default().validate(), Ok(Boundary::default()));

        let too_narrow = RoomConfig { width: 1.5, ..RoomConfig::default() };
        assert_eq!(too_narrow.validate(), Err(RoomConfigError::Width(1.5)));

        let too_tall = RoomConfig { height: 4.5, ..RoomConfig::default() };
        assert_eq!(too_tall.validate(), Err(RoomConfigError::Height(4.5)));

        let edge = RoomConfig { width: 10.0, height: 2.0, depth: 2.0 };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_default_fixtures() {
        let fixtures = default_fixtures(&Boundary::default());
        assert_eq!(fixtures.len(), 2);

        let door = &fixtures[0];
        assert_eq!(door.kind(), FixtureKind::Door);
        assert_eq!(door.position(), Vec3::new(2.0, 1.1, 1.5));
        assert_eq!(door.rotation(), Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        assert_eq!(door.size(), Vec3::new(0.9, 2.2, 0.1));

        let window = &fixtures[1];
        assert_eq!(window.kind(), FixtureKind::Window);
        assert_eq!(window.position(), Vec3::new(2.0, 1.5, 0.0));
        assert_eq!(window.rotation(), Vec3::ZERO);
        assert_eq!(window.size(), Vec3::new(1.2, 1.0, 0.1));
    }

    #[test]
    fn test_fixtures_follow_boundary() {
        let boundary = Boundary::new(6.0, 2.6, 5.0);
        let fixtures = default_fixtures(&boundary);
        assert_eq!(fixtures[0].position(), Vec3::new(3.0, 1.1, 2.5));
        assert_eq!(fixtures[1].position(), Vec3::new(3.0, 1.5, 0.0));
        for fixture in &fixtures {
            assert!(boundary.contains(fixture.position()));
        }
    }
}
