//! KitchenPlan Core Library
//!
//! Platform-agnostic data structures and placement logic for the KitchenPlan
//! kitchen layout designer.

pub mod assets;
pub mod camera;
pub mod catalog;
pub mod format;
pub mod items;
pub mod layout;
pub mod manipulator;
pub mod placeholder;
pub mod placement;
pub mod room;
pub mod scene;

pub use assets::{AssetCache, AssetError, AssetSource, AssetState, FileAssetSource, ModelAsset};
pub use camera::Camera;
pub use catalog::{MeasurementError, MeasurementForm, COUNTER_HEIGHT};
pub use format::{LayoutFile, LayoutFileError};
pub use items::{Dimensions, Item, ItemId, ItemKind, ItemPatch};
pub use layout::LayoutStore;
pub use manipulator::{HandleKind, Manipulator};
pub use placeholder::{Mesh, PlaceholderModel};
pub use placement::WALL_MARGIN;
pub use room::{Boundary, FixedFixture, FixtureKind, RoomConfig, RoomConfigError};
pub use scene::{pick_item, NodeGeometry, NodeKind, Scene, SceneNode};
