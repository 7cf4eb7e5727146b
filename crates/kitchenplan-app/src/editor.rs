//! The editor: single owner of the layout store, driven by UI actions.

use crate::config::AppConfig;
use crate::ui::{UiAction, UiState};
use glam::Vec3;
use kitchenplan_core::assets::{AssetCache, AssetSource, FileAssetSource};
use kitchenplan_core::camera::Camera;
use kitchenplan_core::catalog::MeasurementForm;
use kitchenplan_core::format::{self, LayoutFileResult};
use kitchenplan_core::items::{to_hex_color, ItemId, ItemKind};
use kitchenplan_core::layout::LayoutStore;
use kitchenplan_core::manipulator::{HANDLE_HIT_TOLERANCE, HandleKind, Manipulator};
use kitchenplan_core::placement;
use kitchenplan_core::room::RoomConfig;
use kitchenplan_core::scene::Scene;
use kitchenplan_render::{GridStyle, RenderContext};
use kurbo::{Point, Rect, Size};
use std::path::Path;

/// Padding around the room when fitting it into the viewport, in pixels.
const FIT_PADDING: f64 = 40.0;
/// Zoom step of the zoom buttons.
const ZOOM_STEP: f64 = 1.25;

/// Where a pending item goes once its measurements are in.
#[derive(Debug, Clone, Copy)]
enum PendingPlacement {
    /// Floor position computed at drop time.
    Dropped(Vec3),
    /// Near the room center, from the submitted dimensions.
    Added,
}

/// An item waiting for its measurements.
#[derive(Debug, Clone, Copy)]
struct PendingItem {
    form: MeasurementForm,
    placement: PendingPlacement,
}

/// An in-progress manipulator drag.
#[derive(Debug, Clone)]
struct DragState {
    target: ItemId,
    handle: HandleKind,
    /// Last pointer position on the plan, in meters.
    last: Point,
}

/// Application state behind the UI.
pub struct Editor {
    config: AppConfig,
    store: LayoutStore,
    assets: AssetCache,
    camera: Camera,
    grid_style: GridStyle,
    pending: Option<PendingItem>,
    drag: Option<DragState>,
}

impl Editor {
    /// Create an editor with the configured room, or the default room when
    /// the configured values are out of range.
    pub fn new(config: AppConfig) -> Self {
        let boundary = config.boundary().unwrap_or_else(|e| {
            log::warn!("Invalid room configuration ({}), using defaults", e);
            Default::default()
        });
        let viewport = Size::new(config.width as f64, config.height as f64);
        let mut editor = Self {
            grid_style: config.grid_style,
            config,
            store: LayoutStore::new(boundary),
            assets: AssetCache::new(),
            camera: Camera::new(viewport),
            pending: None,
            drag: None,
        };
        editor.fit_room();
        editor
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn grid_style(&self) -> GridStyle {
        self.grid_style
    }

    /// Measurement form of a pending add or drop, if the dialog is open.
    pub fn pending_measurement(&self) -> Option<&MeasurementForm> {
        self.pending.as_ref().map(|p| &p.form)
    }

    /// Request all item models from the configured asset root.
    pub fn load_assets(&mut self) {
        let source = FileAssetSource::new(self.config.asset_root.clone());
        self.load_assets_from(&source);
    }

    /// Request all item models from `source`.
    pub fn load_assets_from(&mut self, source: &dyn AssetSource) {
        self.assets.load_all(source);
    }

    /// Update the canvas size, refitting the room when it changed.
    ///
    /// Empty sizes (a minimized window) are ignored.
    pub fn set_viewport(&mut self, size: Size) {
        if size.is_zero_area() || size == self.camera.viewport {
            return;
        }
        self.camera.set_viewport(size);
        self.fit_room();
    }

    fn fit_room(&mut self) {
        self.camera.fit_room(self.store.boundary(), FIT_PADDING);
    }

    /// Build the scene for the current state.
    pub fn scene(&self) -> Scene {
        Scene::build(&self.store, &self.assets)
    }

    /// Render context for a scene built by [`Editor::scene`].
    pub fn render_context<'a>(&'a self, scene: &'a Scene) -> RenderContext<'a> {
        RenderContext::new(scene, &self.camera)
            .with_grid(self.grid_style)
            .with_background(self.config.background_color)
    }

    /// Mirror editor state into the UI state.
    pub fn sync_ui(&self, ui_state: &mut UiState) {
        ui_state.grid_style = self.grid_style;
        ui_state.item_count = self.store.len();
        ui_state.selection = self
            .store
            .selected_item()
            .map(|item| {
                format!(
                    "{} selected ({})",
                    item.kind.label(),
                    to_hex_color(item.display_color())
                )
            });
        ui_state.can_undo = self.store.can_undo();
        ui_state.can_redo = self.store.can_redo();
        ui_state.zoom_level = self.camera.zoom_level();

        match (&self.pending, ui_state.measurement.is_some()) {
            (Some(pending), false) => {
                ui_state.measurement = Some(pending.form);
                ui_state.measurement_error = None;
            }
            (None, true) => ui_state.measurement = None,
            _ => {}
        }
    }

    /// Apply a UI action. Returns true if the plan needs redrawing.
    pub fn apply(&mut self, action: UiAction) -> bool {
        log::debug!("Applying {:?}", action);
        match action {
            UiAction::ConfigureRoom(room) => self.configure_room(room),
            UiAction::AddItem(kind) => {
                self.pending = Some(PendingItem {
                    form: MeasurementForm::new(kind),
                    placement: PendingPlacement::Added,
                });
                true
            }
            UiAction::DropItem {
                kind,
                point,
                canvas,
            } => self.open_measurement(&kind, point, canvas),
            UiAction::SubmitMeasurement(form) => self.submit_measurement(form).is_some(),
            UiAction::CancelMeasurement => self.pending.take().is_some(),
            UiAction::SelectAt(point) => {
                let world = self.camera.screen_to_world(point);
                self.store.select_at(world);
                true
            }
            UiAction::BeginDrag(point) => self.begin_drag(point),
            UiAction::Drag(point) => self.drag_to(point),
            UiAction::EndDrag => self.drag.take().is_some(),
            UiAction::ResetRotation => self.store.reset_selected_rotation(),
            UiAction::DeleteSelected => self.store.delete_selected().is_some(),
            UiAction::Undo => self.store.undo(),
            UiAction::Redo => self.store.redo(),
            UiAction::ExportLayout => {
                self.export_to_file();
                false
            }
            UiAction::ImportLayout => self.import_from_file(),
            UiAction::ToggleGrid => {
                self.grid_style = self.grid_style.next();
                true
            }
            UiAction::Pan(delta) => {
                self.camera.pan(delta);
                true
            }
            UiAction::ZoomIn => self.zoom(ZOOM_STEP),
            UiAction::ZoomOut => self.zoom(1.0 / ZOOM_STEP),
            UiAction::FitRoom => {
                self.fit_room();
                true
            }
        }
    }

    /// Apply new room dimensions.
    fn configure_room(&mut self, room: RoomConfig) -> bool {
        let boundary = match room.validate() {
            Ok(boundary) => boundary,
            Err(e) => {
                log::warn!("Rejected room configuration: {}", e);
                return false;
            }
        };
        self.store.set_boundary(boundary);
        log::info!(
            "Room set to {} x {} x {} m",
            boundary.width,
            boundary.height,
            boundary.depth
        );
        self.fit_room();
        true
    }

    /// Start the measurement dialog for an item dropped at `point`.
    fn open_measurement(&mut self, kind: &str, point: Point, canvas: Rect) -> bool {
        let Ok(kind) = kind.parse::<ItemKind>() else {
            log::debug!("Ignoring drop of unknown item type {:?}", kind);
            return false;
        };
        let Some(position) = placement::drop_position(
            kind,
            point,
            canvas,
            self.store.boundary(),
            self.config.wall_margin,
        ) else {
            log::debug!("Ignoring drop without canvas geometry");
            return false;
        };
        self.pending = Some(PendingItem {
            form: MeasurementForm::new(kind),
            placement: PendingPlacement::Dropped(position),
        });
        true
    }

    /// Place the pending item with the submitted measurements.
    fn submit_measurement(&mut self, form: MeasurementForm) -> Option<ItemId> {
        let Some(pending) = self.pending else {
            log::debug!("Measurement submitted without a pending item");
            return None;
        };
        if form.kind != pending.form.kind {
            log::warn!(
                "Measurement for {} does not match pending {}",
                form.kind,
                pending.form.kind
            );
            return None;
        }
        let dimensions = match form.validate() {
            Ok(dimensions) => dimensions,
            Err(e) => {
                log::warn!("Rejected measurements: {}", e);
                return None;
            }
        };
        self.pending = None;
        let position = match pending.placement {
            PendingPlacement::Dropped(position) => position,
            PendingPlacement::Added => {
                placement::add_position(form.kind, &dimensions, self.store.boundary())
            }
        };
        let id = self.store.place_item(form.kind, position, dimensions);
        self.store.set_selected_item(Some(id.clone()));
        Some(id)
    }

    /// Grab the selected item's manipulator, or select and grab the body of
    /// the item under the pointer.
    fn begin_drag(&mut self, point: Point) -> bool {
        let world = self.camera.screen_to_world(point);
        let tolerance = HANDLE_HIT_TOLERANCE.max(4.0 / self.camera.zoom);

        let handle = self.store.selected_item().and_then(|item| {
            Manipulator::for_item(item)
                .hit_test(world, tolerance)
                .map(|handle| (item.id.clone(), handle))
        });
        let grabbed = handle.or_else(|| {
            self.store
                .select_at(world)
                .map(|item| (item.id.clone(), HandleKind::Body))
        });

        match grabbed {
            Some((target, handle)) => {
                self.store.push_undo();
                self.drag = Some(DragState {
                    target,
                    handle,
                    last: world,
                });
                true
            }
            None => false,
        }
    }

    fn drag_to(&mut self, point: Point) -> bool {
        let world = self.camera.screen_to_world(point);
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let Some(item) = self.store.get_item(&drag.target) else {
            self.drag = None;
            return false;
        };
        let delta = Manipulator::for_item(item).drag_delta(drag.handle, drag.last, world);
        drag.last = world;
        let target = drag.target.clone();
        self.store.drag_item(&target, delta)
    }

    fn zoom(&mut self, factor: f64) -> bool {
        self.camera.zoom_at(self.camera.canvas_center(), factor);
        true
    }

    /// Serialize the layout as pretty JSON.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        self.store.export_layout().to_json()
    }

    /// Import layout JSON; the store is unchanged on failure.
    pub fn import_json(&mut self, json: &str) -> LayoutFileResult<usize> {
        self.drag = None;
        self.store.import_json(json)
    }

    /// Import the items of a layout file on disk; the store is unchanged on failure.
    pub fn import_file(&mut self, path: &Path) -> LayoutFileResult<usize> {
        let items = format::read_items(path).inspect_err(|e| {
            log::error!("Failed to import layout: {}", e);
        })?;
        let count = items.len();
        self.drag = None;
        self.store.push_undo();
        self.store.import_layout(items);
        log::info!("Imported {} items from {:?}", count, path);
        Ok(count)
    }

    #[cfg(feature = "native")]
    fn export_to_file(&self) {
        crate::file_ops::save_layout(&self.store.export_layout());
    }

    #[cfg(not(feature = "native"))]
    fn export_to_file(&self) {
        log::warn!("File export needs the native feature");
    }

    #[cfg(feature = "native")]
    fn import_from_file(&mut self) -> bool {
        match crate::file_ops::load_layout() {
            Some(json) => self.import_json(&json).is_ok(),
            None => false,
        }
    }

    #[cfg(not(feature = "native"))]
    fn import_from_file(&mut self) -> bool {
        log::warn!("File import needs the native feature");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchenplan_core::assets::{AssetError, AssetState, ModelAsset};

    fn editor() -> Editor {
        Editor::new(AppConfig::default())
    }

    fn canvas() -> Rect {
        Rect::new(100.0, 50.0, 900.0, 650.0)
    }

    /// Drop `kind` at the canvas center and accept the default measurements.
    fn drop_and_place(editor: &mut Editor, kind: ItemKind) -> ItemId {
        assert!(editor.apply(UiAction::DropItem {
            kind: kind.name().to_string(),
            point: canvas().center(),
            canvas: canvas(),
        }));
        let form = *editor.pending_measurement().unwrap();
        assert!(editor.apply(UiAction::SubmitMeasurement(form)));
        editor.store().selected_item_id().unwrap().to_string()
    }

    struct MissingModels;

    impl AssetSource for MissingModels {
        fn load(&self, name: &str) -> Result<ModelAsset, AssetError> {
            Err(AssetError::NotFound(name.to_string()))
        }
    }

    #[test]
    fn test_drop_opens_measurement_then_places() {
        let mut editor = editor();
        let id = drop_and_place(&mut editor, ItemKind::Countertop);

        let item = editor.store().get_item(&id).unwrap();
        assert_eq!(item.kind, ItemKind::Countertop);
        assert_eq!(item.position, Vec3::new(0.0, 0.9, 0.0));
        assert!(editor.pending_measurement().is_none());
    }

    #[test]
    fn test_add_button_places_near_center() {
        let mut editor = editor();
        assert!(editor.apply(UiAction::AddItem(ItemKind::Cabinet)));
        let mut form = *editor.pending_measurement().unwrap();
        assert_eq!(form, MeasurementForm::new(ItemKind::Cabinet));
        assert!(editor.store().is_empty());

        form.width = 1.2;
        assert!(editor.apply(UiAction::SubmitMeasurement(form)));
        let item = editor.store().selected_item().unwrap();
        assert_eq!(item.kind, ItemKind::Cabinet);
        assert!((item.position - Vec3::new(0.6, 0.0, 0.3)).length() < 1e-5);
        assert!((item.dimensions.width - 1.2).abs() < 1e-6);
        assert!(editor.pending_measurement().is_none());
    }

    #[test]
    fn test_add_button_countertop_in_small_room() {
        let mut editor = editor();
        assert!(editor.apply(UiAction::ConfigureRoom(RoomConfig {
            width: 2.0,
            height: 2.4,
            depth: 2.0,
        })));
        editor.apply(UiAction::AddItem(ItemKind::Countertop));
        let mut form = *editor.pending_measurement().unwrap();
        form.width = 2.0;
        form.depth = 1.0;
        editor.apply(UiAction::SubmitMeasurement(form));
        let item = &editor.store().items()[0];
        assert!((item.position - Vec3::new(-1.0, 0.9, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_drop_is_clamped_by_margin() {
        let mut editor = editor();
        editor.apply(UiAction::DropItem {
            kind: "cabinet".to_string(),
            point: Point::new(900.0, 650.0),
            canvas: canvas(),
        });
        let form = *editor.pending_measurement().unwrap();
        editor.apply(UiAction::SubmitMeasurement(form));
        let item = &editor.store().items()[0];
        assert!((item.position.x - 1.7).abs() < 1e-5);
        assert!((item.position.z - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_kind_and_empty_canvas_are_ignored() {
        let mut editor = editor();
        assert!(!editor.apply(UiAction::DropItem {
            kind: "sofa".to_string(),
            point: Point::new(10.0, 10.0),
            canvas: canvas(),
        }));
        assert!(!editor.apply(UiAction::DropItem {
            kind: "cabinet".to_string(),
            point: Point::new(10.0, 10.0),
            canvas: Rect::ZERO,
        }));
        assert!(editor.pending_measurement().is_none());
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_invalid_measurement_keeps_dialog() {
        let mut editor = editor();
        editor.apply(UiAction::DropItem {
            kind: "appliance".to_string(),
            point: canvas().center(),
            canvas: canvas(),
        });
        let mut form = *editor.pending_measurement().unwrap();
        form.height = 3.0;
        assert!(!editor.apply(UiAction::SubmitMeasurement(form)));
        assert!(editor.pending_measurement().is_some());
        assert!(editor.store().is_empty());

        assert!(editor.apply(UiAction::CancelMeasurement));
        assert!(editor.pending_measurement().is_none());
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_configure_room() {
        let mut editor = editor();
        assert!(!editor.apply(UiAction::ConfigureRoom(RoomConfig {
            width: 1.0,
            height: 2.4,
            depth: 3.0,
        })));
        assert!(editor.apply(UiAction::ConfigureRoom(RoomConfig {
            width: 6.0,
            height: 2.6,
            depth: 5.0,
        })));
        assert_eq!(editor.store().boundary().width, 6.0);
        let door = &editor.store().fixtures()[0];
        assert_eq!(door.position(), glam::Vec3::new(3.0, 1.1, 2.5));
        let window = &editor.store().fixtures()[1];
        assert_eq!(window.position(), glam::Vec3::new(3.0, 1.5, 0.0));
    }

    #[test]
    fn test_click_selects_and_misses_clear() {
        let mut editor = editor();
        let id = drop_and_place(&mut editor, ItemKind::Cabinet);
        editor.store.set_selected_item(None);

        let center = editor.camera().world_to_screen(Point::ZERO);
        editor.apply(UiAction::SelectAt(center));
        assert_eq!(editor.store().selected_item_id(), Some(id.as_str()));

        let corner = editor.camera().world_to_screen(Point::new(1.9, 1.4));
        editor.apply(UiAction::SelectAt(corner));
        assert!(editor.store().selected_item_id().is_none());
    }

    #[test]
    fn test_body_drag_moves_and_clamps() {
        let mut editor = editor();
        let id = drop_and_place(&mut editor, ItemKind::Cabinet);

        let start = editor.camera().world_to_screen(Point::ZERO);
        let end = editor.camera().world_to_screen(Point::new(5.0, 0.5));
        assert!(editor.apply(UiAction::BeginDrag(start)));
        editor.apply(UiAction::Drag(end));
        assert!(editor.apply(UiAction::EndDrag));

        let item = editor.store().get_item(&id).unwrap();
        assert!((item.position.x - 1.7).abs() < 1e-4);
        assert!((item.position.z - 0.5).abs() < 1e-4);
        assert_eq!(item.position.y, 0.0);

        // One undo point for the whole drag.
        assert!(editor.apply(UiAction::Undo));
        assert_eq!(editor.store().get_item(&id).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn test_rotate_handle_then_reset() {
        let mut editor = editor();
        let id = drop_and_place(&mut editor, ItemKind::Cabinet);
        let manipulator = Manipulator::for_item(editor.store().get_item(&id).unwrap());

        // Quarter turn along the ring, from north to east on the plan.
        let grip = editor.camera().world_to_screen(manipulator.ring_grip());
        let east = editor
            .camera()
            .world_to_screen(Point::new(manipulator.ring_radius, 0.0));
        assert!(editor.apply(UiAction::BeginDrag(grip)));
        editor.apply(UiAction::Drag(east));
        editor.apply(UiAction::EndDrag);

        let item = editor.store().get_item(&id).unwrap();
        assert!((item.rotation.y.abs() - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
        assert_eq!(item.position, Vec3::ZERO);

        assert!(editor.apply(UiAction::ResetRotation));
        assert_eq!(editor.store().get_item(&id).unwrap().rotation, Vec3::ZERO);
    }

    #[test]
    fn test_drag_on_empty_floor_does_nothing() {
        let mut editor = editor();
        let p = editor.camera().world_to_screen(Point::new(1.5, 1.0));
        assert!(!editor.apply(UiAction::BeginDrag(p)));
        assert!(!editor.apply(UiAction::Drag(p)));
        assert!(!editor.apply(UiAction::EndDrag));
    }

    #[test]
    fn test_delete_undo_redo() {
        let mut editor = editor();
        let id = drop_and_place(&mut editor, ItemKind::Appliance);

        assert!(editor.apply(UiAction::DeleteSelected));
        assert!(editor.store().is_empty());
        assert!(editor.store().selected_item_id().is_none());
        assert!(!editor.apply(UiAction::DeleteSelected));

        assert!(editor.apply(UiAction::Undo));
        assert!(editor.store().get_item(&id).is_some());
        assert!(editor.apply(UiAction::Redo));
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_export_import_round() {
        let mut editor = editor();
        drop_and_place(&mut editor, ItemKind::Cabinet);
        drop_and_place(&mut editor, ItemKind::Countertop);
        let json = editor.export_json().unwrap();

        let mut other = Editor::new(AppConfig::default());
        assert_eq!(other.import_json(&json).unwrap(), 2);
        assert_eq!(other.store().items(), editor.store().items());

        assert!(other.import_json("{not json").is_err());
        assert_eq!(other.store().len(), 2);
    }

    #[test]
    fn test_sync_ui_mirrors_state() {
        let mut editor = editor();
        let mut ui_state = UiState::default();
        editor.apply(UiAction::ToggleGrid);
        editor.apply(UiAction::DropItem {
            kind: "cabinet".to_string(),
            point: canvas().center(),
            canvas: canvas(),
        });
        editor.sync_ui(&mut ui_state);
        assert_eq!(ui_state.grid_style, GridStyle::Dots);
        assert_eq!(ui_state.measurement.map(|f| f.kind), Some(ItemKind::Cabinet));

        editor.apply(UiAction::CancelMeasurement);
        editor.sync_ui(&mut ui_state);
        assert!(ui_state.measurement.is_none());
        assert_eq!(ui_state.item_count, 0);
        assert!(ui_state.selection.is_none());
    }

    #[test]
    fn test_selection_label() {
        let mut editor = editor();
        let mut ui_state = UiState::default();
        drop_and_place(&mut editor, ItemKind::Cabinet);
        editor.sync_ui(&mut ui_state);
        assert_eq!(ui_state.selection.as_deref(), Some("Cabinet selected (#8b4513)"));
        assert!(ui_state.can_undo);
    }

    #[test]
    fn test_failed_assets_render_placeholders() {
        let mut editor = editor();
        drop_and_place(&mut editor, ItemKind::Cabinet);
        editor.load_assets_from(&MissingModels);
        assert!(matches!(
            editor.assets().state(ItemKind::Cabinet),
            Some(AssetState::Failed(_))
        ));
        let scene = editor.scene();
        assert_eq!(scene.placeholder_count(), 1);

        let ctx = editor.render_context(&scene);
        assert_eq!(ctx.grid_style, GridStyle::Lines);
    }

    #[test]
    fn test_viewport_follows_canvas() {
        let mut editor = editor();
        editor.set_viewport(Size::new(600.0, 400.0));
        assert_eq!(editor.camera().viewport, Size::new(600.0, 400.0));
        // Room center sits in the middle of the new canvas.
        let center = editor.camera().world_to_screen(Point::ZERO);
        assert!((center - Point::new(300.0, 200.0)).hypot() < 1e-9);
        // (600 - 80) / 4 = 130, (400 - 80) / 3 = 106.6
        assert!((editor.camera().zoom - 320.0 / 3.0).abs() < 1e-9);

        editor.set_viewport(Size::ZERO);
        assert_eq!(editor.camera().viewport, Size::new(600.0, 400.0));

        let mut ui_state = UiState::default();
        editor.sync_ui(&mut ui_state);
        assert!((ui_state.zoom_level - editor.camera().zoom / 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_moves_plan() {
        let mut editor = editor();
        let before = editor.camera().world_to_screen(Point::ZERO);
        assert!(editor.apply(UiAction::Pan(kurbo::Vec2::new(25.0, -10.0))));
        let after = editor.camera().world_to_screen(Point::ZERO);
        assert!((after - before - kurbo::Vec2::new(25.0, -10.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_zoom_buttons() {
        let mut editor = editor();
        let before = editor.camera().zoom;
        editor.apply(UiAction::ZoomIn);
        assert!(editor.camera().zoom > before);
        editor.apply(UiAction::FitRoom);
        assert!((editor.camera().zoom - before).abs() < 1e-9);
    }
}
