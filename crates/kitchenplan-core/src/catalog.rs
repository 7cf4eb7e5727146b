//! Per-kind defaults: geometry, colors, models and the measurement dialog limits.

use crate::items::{Dimensions, ItemKind};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Height of the counter surface in meters.
pub const COUNTER_HEIGHT: f32 = 0.9;

/// Accepted measurement ranges, in meters.
#[derive(Debug, Clone)]
pub struct MeasurementRanges {
    pub width: RangeInclusive<f32>,
    pub height: RangeInclusive<f32>,
    pub depth: RangeInclusive<f32>,
}

/// Limits of the measurement dialog. They are the same for every kind.
pub const MEASUREMENT_RANGES: MeasurementRanges = MeasurementRanges {
    width: 0.3..=2.0,
    height: 0.04..=2.4,
    depth: 0.3..=1.0,
};

/// Typical sizes shown next to the dialog fields.
#[derive(Debug, Clone, Copy)]
pub struct MeasurementHints {
    pub width: &'static str,
    pub height: &'static str,
    pub depth: &'static str,
}

/// Static description of an item kind.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub kind: ItemKind,
    /// Dimensions used when the user does not override them.
    pub dimensions: Dimensions,
    /// Height of the item's base above the floor.
    pub elevation: f32,
    /// Default display color.
    pub color: &'static str,
    /// Name of the 3D model resource.
    pub model: &'static str,
    pub hints: MeasurementHints,
}

static ENTRIES: [CatalogEntry; 3] = [
    CatalogEntry {
        kind: ItemKind::Cabinet,
        dimensions: Dimensions { width: 0.6, height: 0.8, depth: 0.6 },
        elevation: 0.0,
        color: "#8B4513",
        model: "models/cabinet.glb",
        hints: MeasurementHints {
            width: "0.3m - 1.2m",
            height: "0.8m (base) or 0.6m-0.9m (wall)",
            depth: "0.6m standard",
        },
    },
    CatalogEntry {
        kind: ItemKind::Countertop,
        dimensions: Dimensions { width: 0.6, height: 0.04, depth: 0.6 },
        elevation: COUNTER_HEIGHT,
        color: "#808080",
        model: "models/countertop.glb",
        hints: MeasurementHints {
            width: "Match cabinet width",
            height: "0.04m standard",
            depth: "0.6m standard",
        },
    },
    CatalogEntry {
        kind: ItemKind::Appliance,
        dimensions: Dimensions { width: 0.9, height: 1.8, depth: 0.7 },
        elevation: 0.0,
        color: "#C0C0C0",
        model: "models/refrigerator.glb",
        hints: MeasurementHints {
            width: "0.6m standard",
            height: "0.85m standard",
            depth: "0.6m standard",
        },
    },
];

/// Look up the catalog entry for a kind.
pub fn entry(kind: ItemKind) -> &'static CatalogEntry {
    match kind {
        ItemKind::Cabinet => &ENTRIES[0],
        ItemKind::Countertop => &ENTRIES[1],
        ItemKind::Appliance => &ENTRIES[2],
    }
}

/// A dimension rejected by the measurement dialog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasurementError {
    #[error("{kind} width {value} m is outside {min}-{max} m")]
    Width { kind: ItemKind, value: f32, min: f32, max: f32 },
    #[error("{kind} height {value} m is outside {min}-{max} m")]
    Height { kind: ItemKind, value: f32, min: f32, max: f32 },
    #[error("{kind} depth {value} m is outside {min}-{max} m")]
    Depth { kind: ItemKind, value: f32, min: f32, max: f32 },
}

/// Values collected by the per-item measurement dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementForm {
    pub kind: ItemKind,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl MeasurementForm {
    /// Open the form prefilled with the kind's defaults.
    pub fn new(kind: ItemKind) -> Self {
        let d = entry(kind).dimensions;
        Self {
            kind,
            width: d.width,
            height: d.height,
            depth: d.depth,
        }
    }

    /// Clamp every field into the dialog limits.
    pub fn clamp_to_ranges(&mut self) {
        let ranges = &MEASUREMENT_RANGES;
        self.width = self.width.clamp(*ranges.width.start(), *ranges.width.end());
        self.height = self.height.clamp(*ranges.height.start(), *ranges.height.end());
        self.depth = self.depth.clamp(*ranges.depth.start(), *ranges.depth.end());
    }

    /// Validate the form and produce the item's dimensions.
    pub fn validate(&self) -> Result<Dimensions, MeasurementError> {
        let kind = self.kind;
        let ranges = &MEASUREMENT_RANGES;
        if !ranges.width.contains(&self.width) {
            return Err(MeasurementError::Width {
                kind,
                value: self.width,
                min: *ranges.width.start(),
                max: *ranges.width.end(),
            });
        }
        if !ranges.height.contains(&self.height) {
            return Err(MeasurementError::Height {
                kind,
                value: self.height,
                min: *ranges.height.start(),
                max: *ranges.height.end(),
            });
        }
        if !ranges.depth.contains(&self.depth) {
            return Err(MeasurementError::Depth {
                kind,
                value: self.depth,
                min: *ranges.depth.start(),
                max: *ranges.depth.end(),
            });
        }
        Ok(Dimensions::new(self.width, self.height, self.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_match_kinds() {
        for kind in ItemKind::ALL {
            assert_eq!(entry(kind).kind, kind);
        }
        assert_eq!(entry(ItemKind::Cabinet).model, "models/cabinet.glb");
        assert_eq!(entry(ItemKind::Countertop).model, "models/countertop.glb");
        assert_eq!(entry(ItemKind::Appliance).model, "models/refrigerator.glb");
    }

    #[test]
    fn test_default_colors() {
        assert_eq!(entry(ItemKind::Cabinet).color, "#8B4513");
        assert_eq!(entry(ItemKind::Countertop).color, "#808080");
        assert_eq!(entry(ItemKind::Appliance).color, "#C0C0C0");
    }

    #[test]
    fn test_default_geometry() {
        assert_eq!(entry(ItemKind::Cabinet).dimensions, Dimensions::new(0.6, 0.8, 0.6));
        assert_eq!(entry(ItemKind::Countertop).dimensions, Dimensions::new(0.6, 0.04, 0.6));
        assert_eq!(entry(ItemKind::Appliance).dimensions, Dimensions::new(0.9, 1.8, 0.7));
        assert!((entry(ItemKind::Countertop).elevation - 0.9).abs() < f32::EPSILON);
        assert_eq!(entry(ItemKind::Appliance).elevation, 0.0);
    }

    #[test]
    fn test_defaults_fall_inside_ranges() {
        for kind in ItemKind::ALL {
            assert!(MeasurementForm::new(kind).validate().is_ok(), "{kind}");
        }
    }

    #[test]
    fn test_ranges_are_shared_by_all_kinds() {
        for kind in ItemKind::ALL {
            let mut form = MeasurementForm::new(kind);
            form.width = 2.0;
            form.height = 0.04;
            form.depth = 0.3;
            assert!(form.validate().is_ok(), "{kind}");

            form.height = 2.4;
            form.depth = 1.0;
            assert!(form.validate().is_ok(), "{kind}");

            form.width = 2.1;
            assert!(matches!(form.validate(), Err(MeasurementError::Width { .. })), "{kind}");
        }
    }

    #[test]
    fn test_depth_limit() {
        let mut form = MeasurementForm::new(ItemKind::Appliance);
        form.depth = 1.2;
        assert!(matches!(
            form.validate(),
            Err(MeasurementError::Depth { value, .. }) if (value - 1.2).abs() < f32::EPSILON
        ));

        form.clamp_to_ranges();
        assert!((form.depth - 1.0).abs() < f32::EPSILON);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_measurement_error_message() {
        let mut form = MeasurementForm::new(ItemKind::Cabinet);
        form.width = 2.5;
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "cabinet width 2.5 m is outside 0.3-2 m");
    }
}
