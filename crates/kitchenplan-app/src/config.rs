//! Application configuration.

use kitchenplan_core::room::{Boundary, RoomConfig, RoomConfigError};
use kitchenplan_core::WALL_MARGIN;
use kitchenplan_render::GridStyle;
use peniko::Color;
use std::path::PathBuf;

/// Environment variable overriding the model directory.
pub const ASSET_ROOT_ENV: &str = "KITCHENPLAN_ASSETS";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Viewport size used until the shell reports a real one.
    pub width: u32,
    pub height: u32,
    /// Room values the configuration dialog opens with.
    pub room: RoomConfig,
    /// Distance kept between dropped items and the walls, in meters.
    pub wall_margin: f32,
    /// Directory the item models are loaded from.
    pub asset_root: PathBuf,
    pub grid_style: GridStyle,
    pub background_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "KitchenPlan".to_string(),
            width: 1280,
            height: 800,
            room: RoomConfig::default(),
            wall_margin: WALL_MARGIN,
            asset_root: PathBuf::from("assets"),
            grid_style: GridStyle::Lines,
            background_color: Color::from_rgba8(250, 250, 250, 255),
        }
    }
}

impl AppConfig {
    /// Default configuration with the asset root taken from the environment when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(ASSET_ROOT_ENV) {
            config.asset_root = PathBuf::from(root);
        }
        config
    }

    /// Validated room boundary for the configured defaults.
    pub fn boundary(&self) -> Result<Boundary, RoomConfigError> {
        self.room.validate()
    }
}
