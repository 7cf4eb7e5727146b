//! UI components using egui.

use egui::{
    Align2, Button, Color32, Context, CornerRadius, Frame, Key, Margin, Modifiers, PointerButton,
    Pos2, RichText, Sense, Stroke, Ui, Vec2,
};
use kitchenplan_core::catalog::{self, MeasurementForm};
use kitchenplan_core::items::ItemKind;
use kitchenplan_core::room::{self, RoomConfig};
use kitchenplan_render::GridStyle;
use kurbo::{Point, Rect};

const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
const ERROR: Color32 = Color32::from_rgb(220, 38, 38);

/// Actions triggered by UI interactions.
///
/// Pointer positions of canvas actions are relative to the canvas origin,
/// except for `DropItem`, which carries the screen drop point together with
/// the canvas rectangle it landed in.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Apply validated room dimensions.
    ConfigureRoom(RoomConfig),
    /// The Add button of a drawer entry was pressed.
    AddItem(ItemKind),
    /// An item from the drawer was released over the canvas.
    DropItem {
        kind: String,
        point: Point,
        canvas: Rect,
    },
    /// Confirm the measurement dialog of a pending add or drop.
    SubmitMeasurement(MeasurementForm),
    /// Dismiss the measurement dialog without placing anything.
    CancelMeasurement,
    /// Click on the canvas.
    SelectAt(Point),
    /// Start of a drag on the canvas.
    BeginDrag(Point),
    /// Pointer moved while dragging.
    Drag(Point),
    /// Drag released.
    EndDrag,
    /// Move the plan view by a pointer delta in pixels.
    Pan(kurbo::Vec2),
    /// Zero the rotation of the selected item.
    ResetRotation,
    DeleteSelected,
    Undo,
    Redo,
    /// Write the layout to a JSON file.
    ExportLayout,
    /// Replace the items with those of a JSON file.
    ImportLayout,
    /// Cycle grid style.
    ToggleGrid,
    ZoomIn,
    ZoomOut,
    /// Fit the whole room into the canvas.
    FitRoom,
}

/// UI state that persists across frames.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether the room configuration dialog is shown.
    pub room_dialog_open: bool,
    /// Values being edited in the room dialog.
    pub room_input: RoomConfig,
    pub room_error: Option<String>,
    /// Form of the pending add or drop, while the measurement dialog is shown.
    pub measurement: Option<MeasurementForm>,
    pub measurement_error: Option<String>,
    /// Kind being dragged out of the item drawer.
    pub dragging_kind: Option<ItemKind>,
    /// Canvas rectangle of the last frame, in screen points.
    pub canvas_rect: Option<egui::Rect>,
    // Mirrored from the editor
    pub grid_style: GridStyle,
    pub item_count: usize,
    /// Label of the selected item.
    pub selection: Option<String>,
    pub can_undo: bool,
    pub can_redo: bool,
    /// Current zoom level (1.0 = 100 px per meter).
    pub zoom_level: f64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            room_dialog_open: true,
            room_input: RoomConfig::default(),
            room_error: None,
            measurement: None,
            measurement_error: None,
            dragging_kind: None,
            canvas_rect: None,
            grid_style: GridStyle::default(),
            item_count: 0,
            selection: None,
            can_undo: false,
            can_redo: false,
            zoom_level: 1.0,
        }
    }
}

impl UiState {
    /// Whether a modal dialog currently captures input.
    pub fn modal_open(&self) -> bool {
        self.room_dialog_open || self.measurement.is_some()
    }
}

/// Render the whole UI and return the first triggered action.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let toolbar_action = render_toolbar(ctx, ui_state);
    let drawer_action = render_item_drawer(ctx, ui_state);
    let shortcut_action = handle_shortcuts(ctx, ui_state);

    let modal_action = if ui_state.room_dialog_open {
        render_room_dialog(ctx, ui_state)
    } else if ui_state.measurement.is_some() {
        render_measurement_dialog(ctx, ui_state)
    } else {
        None
    };

    let canvas_action = render_canvas(ctx, ui_state);

    toolbar_action
        .or(drawer_action)
        .or(modal_action)
        .or(shortcut_action)
        .or(canvas_action)
}

fn primary_btn(ui: &mut Ui, text: &str) -> bool {
    ui.add(
        Button::new(RichText::new(text).color(Color32::WHITE))
            .fill(ACCENT)
            .corner_radius(CornerRadius::same(4)),
    )
    .clicked()
}

fn secondary_btn(ui: &mut Ui, text: &str) -> bool {
    ui.add(
        Button::new(RichText::new(text).color(TEXT))
            .fill(Color32::WHITE)
            .stroke(Stroke::new(1.0, BORDER))
            .corner_radius(CornerRadius::same(4)),
    )
    .clicked()
}

fn section_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(TEXT_MUTED));
}

fn dialog_frame() -> Frame {
    Frame::new()
        .fill(Color32::WHITE)
        .corner_radius(CornerRadius::same(12))
        .stroke(Stroke::new(1.0, Color32::from_gray(200)))
        .inner_margin(Margin::same(20))
}

/// Dim the screen behind a modal. Returns true when the backdrop was clicked.
fn modal_backdrop(ctx: &Context, id: &str) -> bool {
    let mut clicked = false;
    egui::Area::new(egui::Id::new(id))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            let screen_rect = ctx.input(|i| i.content_rect());
            let response = ui.allocate_rect(screen_rect, Sense::click());
            ui.painter()
                .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
            clicked = response.clicked();
        });
    clicked
}

/// Render the top toolbar.
fn render_toolbar(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Room…").clicked() {
                ui_state.room_dialog_open = true;
                ui_state.room_error = None;
            }
            if ui.button("Import").clicked() {
                action = Some(UiAction::ImportLayout);
            }
            if ui.button("Export").clicked() {
                action = Some(UiAction::ExportLayout);
            }

            ui.separator();

            if ui.add_enabled(ui_state.can_undo, Button::new("Undo")).clicked() {
                action = Some(UiAction::Undo);
            }
            if ui.add_enabled(ui_state.can_redo, Button::new("Redo")).clicked() {
                action = Some(UiAction::Redo);
            }

            ui.separator();

            let has_selection = ui_state.selection.is_some();
            if ui
                .add_enabled(has_selection, Button::new("Reset rotation"))
                .clicked()
            {
                action = Some(UiAction::ResetRotation);
            }
            if ui.add_enabled(has_selection, Button::new("Delete")).clicked() {
                action = Some(UiAction::DeleteSelected);
            }

            ui.separator();

            if ui
                .button(format!("Grid: {}", ui_state.grid_style.name()))
                .clicked()
            {
                action = Some(UiAction::ToggleGrid);
            }
            if ui.button("−").clicked() {
                action = Some(UiAction::ZoomOut);
            }
            ui.label(format!("{:.0}%", ui_state.zoom_level * 100.0));
            if ui.button("+").clicked() {
                action = Some(UiAction::ZoomIn);
            }
            if ui.button("Fit").clicked() {
                action = Some(UiAction::FitRoom);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let status = match &ui_state.selection {
                    Some(label) => format!("{} items · {}", ui_state.item_count, label),
                    None => format!("{} items", ui_state.item_count),
                };
                ui.label(RichText::new(status).color(TEXT_MUTED));
            });
        });
    });

    action
}

/// Render the item drawer. Dragging an entry arms a drop on the canvas;
/// its Add button asks for measurements and places the item near the center.
fn render_item_drawer(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;
    let enabled = !ui_state.modal_open();

    egui::SidePanel::left("item_drawer")
        .resizable(false)
        .default_width(170.0)
        .show(ctx, |ui| {
            section_label(ui, "ITEMS");
            ui.add_space(4.0);
            for kind in ItemKind::ALL {
                let d = catalog::entry(kind).dimensions;
                ui.horizontal(|ui| {
                    let response = ui
                        .add_enabled(enabled, Button::new(kind.label()).min_size(Vec2::new(110.0, 36.0)))
                        .interact(Sense::click_and_drag())
                        .on_hover_text(format!(
                            "{:.2} × {:.2} × {:.2} m",
                            d.width, d.height, d.depth
                        ));
                    if enabled && response.drag_started() {
                        ui_state.dragging_kind = Some(kind);
                    }
                    if ui.add_enabled(enabled, Button::new("Add")).clicked() {
                        action = Some(UiAction::AddItem(kind));
                    }
                });
            }
            ui.add_space(8.0);
            ui.label(
                RichText::new("Drag an item onto the floor plan, or press Add.")
                    .size(11.0)
                    .color(TEXT_MUTED),
            );
        });

    if let Some(kind) = ui_state.dragging_kind {
        if let Some(pos) = ctx.pointer_hover_pos() {
            egui::Area::new(egui::Id::new("drag_preview"))
                .fixed_pos(pos + Vec2::new(8.0, 8.0))
                .order(egui::Order::Tooltip)
                .interactable(false)
                .show(ctx, |ui| {
                    ui.label(RichText::new(kind.label()).color(ACCENT).strong());
                });
        }
    }

    action
}

/// Keyboard shortcuts, ignored while a text field has focus.
fn handle_shortcuts(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    if ctx.wants_keyboard_input() || ui_state.modal_open() {
        return None;
    }
    ctx.input_mut(|i| {
        if i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z)
            || i.consume_key(Modifiers::COMMAND, Key::Y)
        {
            Some(UiAction::Redo)
        } else if i.consume_key(Modifiers::COMMAND, Key::Z) {
            Some(UiAction::Undo)
        } else if i.consume_key(Modifiers::NONE, Key::Delete)
            || i.consume_key(Modifiers::NONE, Key::Backspace)
        {
            Some(UiAction::DeleteSelected)
        } else if i.consume_key(Modifiers::NONE, Key::R) {
            Some(UiAction::ResetRotation)
        } else if i.consume_key(Modifiers::NONE, Key::G) {
            Some(UiAction::ToggleGrid)
        } else {
            None
        }
    })
}

/// The plan canvas. The plan itself is drawn underneath by the renderer;
/// this only turns pointer input into actions.
fn render_canvas(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::CentralPanel::default()
        .frame(Frame::new())
        .show(ctx, |ui| {
            let rect = ui.max_rect();
            ui_state.canvas_rect = Some(rect);
            let response = ui.allocate_rect(rect, Sense::click_and_drag());
            let local = |p: Pos2| Point::new((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64);

            if ui_state.modal_open() {
                ui_state.dragging_kind = None;
                return;
            }

            let released = ctx.input(|i| i.pointer.any_released());
            if released && ui_state.dragging_kind.is_some() {
                let pos = ctx.input(|i| i.pointer.interact_pos());
                action = release_drawer_item(ui_state, pos, rect);
                return;
            }

            if response.dragged_by(PointerButton::Middle)
                || response.dragged_by(PointerButton::Secondary)
            {
                let delta = response.drag_delta();
                action = Some(UiAction::Pan(kurbo::Vec2::new(delta.x as f64, delta.y as f64)));
            } else if response.clicked() {
                action = response.interact_pointer_pos().map(|p| UiAction::SelectAt(local(p)));
            } else if response.drag_started_by(PointerButton::Primary) {
                let origin = ctx.input(|i| i.pointer.press_origin());
                action = origin.map(|p| UiAction::BeginDrag(local(p)));
            } else if response.dragged_by(PointerButton::Primary) {
                action = response.interact_pointer_pos().map(|p| UiAction::Drag(local(p)));
            } else if response.drag_stopped_by(PointerButton::Primary) {
                action = Some(UiAction::EndDrag);
            }
        });

    action
}

/// Finish a drag out of the drawer. Only a release inside the canvas drops
/// the item; either way the drag ends.
fn release_drawer_item(
    ui_state: &mut UiState,
    pos: Option<Pos2>,
    canvas: egui::Rect,
) -> Option<UiAction> {
    let kind = ui_state.dragging_kind.take()?;
    if ui_state.modal_open() {
        return None;
    }
    let pos = pos.filter(|p| canvas.contains(*p))?;
    Some(UiAction::DropItem {
        kind: kind.name().to_string(),
        point: Point::new(pos.x as f64, pos.y as f64),
        canvas: Rect::new(
            canvas.min.x as f64,
            canvas.min.y as f64,
            canvas.max.x as f64,
            canvas.max.y as f64,
        ),
    })
}

/// Validate the room dialog input. Closes the dialog on success.
fn submit_room(ui_state: &mut UiState) -> Option<UiAction> {
    match ui_state.room_input.validate() {
        Ok(_) => {
            ui_state.room_dialog_open = false;
            ui_state.room_error = None;
            Some(UiAction::ConfigureRoom(ui_state.room_input))
        }
        Err(e) => {
            ui_state.room_error = Some(e.to_string());
            None
        }
    }
}

/// Validate the measurement dialog input. Closes the dialog on success.
fn submit_measurement(ui_state: &mut UiState) -> Option<UiAction> {
    let form = ui_state.measurement?;
    match form.validate() {
        Ok(_) => {
            ui_state.measurement = None;
            ui_state.measurement_error = None;
            Some(UiAction::SubmitMeasurement(form))
        }
        Err(e) => {
            ui_state.measurement_error = Some(e.to_string());
            None
        }
    }
}

fn meter_row(ui: &mut Ui, label: &str, value: &mut f32, hint: String) {
    ui.horizontal(|ui| {
        ui.add_sized([60.0, 20.0], egui::Label::new(RichText::new(label).color(TEXT)));
        ui.add(egui::DragValue::new(value).speed(0.01).fixed_decimals(2).suffix(" m"));
        ui.label(RichText::new(hint).size(11.0).color(TEXT_MUTED));
    });
}

/// Render the room configuration dialog.
fn render_room_dialog(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    // Closing keeps the current room.
    if modal_backdrop(ctx, "room_dialog_backdrop") {
        ui_state.room_dialog_open = false;
        ui_state.room_error = None;
        return None;
    }

    egui::Area::new(egui::Id::new("room_dialog"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            dialog_frame().show(ui, |ui| {
                ui.set_width(300.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new("Room").size(16.0).strong().color(Color32::from_gray(30)));
                    ui.add_space(12.0);

                    let range = |r: &std::ops::RangeInclusive<f32>| format!("{}-{} m", r.start(), r.end());
                    meter_row(ui, "Width", &mut ui_state.room_input.width, range(&room::WIDTH_RANGE));
                    meter_row(ui, "Height", &mut ui_state.room_input.height, range(&room::HEIGHT_RANGE));
                    meter_row(ui, "Depth", &mut ui_state.room_input.depth, range(&room::DEPTH_RANGE));

                    if let Some(error) = &ui_state.room_error {
                        ui.add_space(8.0);
                        ui.label(RichText::new(error).size(12.0).color(ERROR));
                    }

                    ui.add_space(12.0);
                    ui.horizontal(|ui| {
                        if secondary_btn(ui, "Cancel") {
                            ui_state.room_dialog_open = false;
                            ui_state.room_error = None;
                        }
                        if primary_btn(ui, "Apply") {
                            action = submit_room(ui_state);
                        }
                    });
                });
            });
        });

    action
}

/// Render the measurement dialog of a pending drop.
fn render_measurement_dialog(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    if modal_backdrop(ctx, "measurement_dialog_backdrop") {
        ui_state.measurement = None;
        ui_state.measurement_error = None;
        return Some(UiAction::CancelMeasurement);
    }
    let Some(mut form) = ui_state.measurement else {
        return None;
    };

    egui::Area::new(egui::Id::new("measurement_dialog"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            dialog_frame().show(ui, |ui| {
                ui.set_width(320.0);
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(format!("{} measurements", form.kind.label()))
                            .size(16.0)
                            .strong()
                            .color(Color32::from_gray(30)),
                    );
                    ui.add_space(12.0);

                    let ranges = &catalog::MEASUREMENT_RANGES;
                    let hints = catalog::entry(form.kind).hints;
                    let hint = |r: &std::ops::RangeInclusive<f32>, typical: &str| {
                        format!("{}-{} m, recommended {typical}", r.start(), r.end())
                    };
                    meter_row(ui, "Width", &mut form.width, hint(&ranges.width, hints.width));
                    meter_row(ui, "Height", &mut form.height, hint(&ranges.height, hints.height));
                    meter_row(ui, "Depth", &mut form.depth, hint(&ranges.depth, hints.depth));

                    if let Some(error) = &ui_state.measurement_error {
                        ui.add_space(8.0);
                        ui.label(RichText::new(error).size(12.0).color(ERROR));
                    }

                    ui.add_space(12.0);
                    ui.horizontal(|ui| {
                        if secondary_btn(ui, "Cancel") {
                            action = Some(UiAction::CancelMeasurement);
                        }
                        if secondary_btn(ui, "Fit to range") {
                            form.clamp_to_ranges();
                        }
                        if primary_btn(ui, "Place") {
                            ui_state.measurement = Some(form);
                            action = submit_measurement(ui_state);
                        }
                    });
                });
            });
        });

    if action == Some(UiAction::CancelMeasurement) {
        ui_state.measurement = None;
        ui_state.measurement_error = None;
    } else if action.is_none() {
        ui_state.measurement = Some(form);
    }
    action
}
