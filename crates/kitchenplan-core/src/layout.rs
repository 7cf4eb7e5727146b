//! Layout store: the room boundary, fixtures, placed items and selection.

use crate::format::{self, LayoutFile, LayoutFileResult};
use crate::items::{Dimensions, Item, ItemId, ItemKind, ItemPatch};
use crate::placement;
use crate::room::{self, Boundary, FixedFixture};
use glam::{Mat4, Vec3};
use kurbo::{Point, Rect};

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// A snapshot of the item collection for undo/redo.
#[derive(Debug, Clone)]
struct LayoutSnapshot {
    items: Vec<Item>,
}

/// Holds the state of one kitchen layout.
///
/// All operations are synchronous. The low-level mutations (`add_item`,
/// `remove_item`, `update_item`, `import_layout`, `set_boundary`) trust
/// their input and never record history; the editing operations built on
/// top of them push an undo point first.
#[derive(Debug, Clone)]
pub struct LayoutStore {
    boundary: Boundary,
    fixtures: Vec<FixedFixture>,
    items: Vec<Item>,
    selected: Option<ItemId>,
    undo_stack: Vec<LayoutSnapshot>,
    redo_stack: Vec<LayoutSnapshot>,
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new(Boundary::default())
    }
}

impl LayoutStore {
    /// Create an empty layout with the default fixtures for `boundary`.
    pub fn new(boundary: Boundary) -> Self {
        let fixtures = room::default_fixtures(&boundary);
        Self::with_fixtures(boundary, fixtures)
    }

    /// Create an empty layout with explicit fixtures.
    pub fn with_fixtures(boundary: Boundary, fixtures: Vec<FixedFixture>) -> Self {
        Self {
            boundary,
            fixtures,
            items: Vec::new(),
            selected: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn fixtures(&self) -> &[FixedFixture] {
        &self.fixtures
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by id.
    pub fn get_item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The raw selection id, which may dangle after `remove_item`.
    pub fn selected_item_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected item, if the selection refers to an existing item.
    pub fn selected_item(&self) -> Option<&Item> {
        self.selected.as_deref().and_then(|id| self.get_item(id))
    }

    /// Check if an item is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    // --- Primitive mutations ---

    /// Append an item. Ids are not checked for uniqueness.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove an item by id. Selection is left as is.
    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Merge `patch` into the item with `id`.
    /// Returns true if the item was found.
    pub fn update_item(&mut self, id: &str, patch: ItemPatch) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                patch.apply(item);
                true
            }
            None => false,
        }
    }

    /// Replace the selection unconditionally.
    pub fn set_selected_item(&mut self, id: Option<ItemId>) {
        self.selected = id;
    }

    /// Replace the whole item collection. Selection is left as is.
    pub fn import_layout(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Replace the boundary. Existing items are not re-clamped.
    ///
    /// Default fixtures move with the walls; custom fixtures stay put.
    pub fn set_boundary(&mut self, boundary: Boundary) {
        if self.fixtures == room::default_fixtures(&self.boundary) {
            self.fixtures = room::default_fixtures(&boundary);
        }
        self.boundary = boundary;
    }

    // --- Editing operations ---

    /// Add a new item of `kind` at a floor position, returning its id.
    ///
    /// The elevation comes from the kind, so countertops sit on the counter.
    pub fn place_item(&mut self, kind: ItemKind, floor: Vec3, dimensions: Dimensions) -> ItemId {
        self.push_undo();
        let position = Vec3::new(floor.x, crate::catalog::entry(kind).elevation, floor.z);
        let item = Item::new(kind, position, dimensions);
        let id = item.id.clone();
        log::debug!("Placed {} {} at {:?}", kind, id, position);
        self.add_item(item);
        id
    }

    /// Add an item dropped onto the canvas at `drop`.
    ///
    /// Returns `None` when the canvas has no geometry.
    pub fn drop_item(
        &mut self,
        kind: ItemKind,
        drop: Point,
        canvas: Rect,
        dimensions: Option<Dimensions>,
    ) -> Option<ItemId> {
        let Some(position) =
            placement::drop_position(kind, drop, canvas, &self.boundary, placement::WALL_MARGIN)
        else {
            log::debug!("Ignoring drop without canvas geometry");
            return None;
        };
        let dimensions = dimensions.unwrap_or(crate::catalog::entry(kind).dimensions);
        Some(self.place_item(kind, position, dimensions))
    }

    /// Move/rotate an item by a manipulator delta.
    /// Returns true if the item was found.
    pub fn drag_item(&mut self, id: &str, delta: Mat4) -> bool {
        let Some(item) = self.get_item(id) else {
            return false;
        };
        let patch = placement::apply_drag(item, delta, &self.boundary);
        self.update_item(id, patch)
    }

    /// Zero the rotation of the selected item.
    /// Returns true if an item was reset.
    pub fn reset_selected_rotation(&mut self) -> bool {
        let Some(id) = self.selected_item().map(|item| item.id.clone()) else {
            return false;
        };
        self.push_undo();
        self.update_item(&id, placement::reset_rotation())
    }

    /// Remove the selected item and clear the selection.
    pub fn delete_selected(&mut self) -> Option<Item> {
        let id = self.selected.take()?;
        if self.get_item(&id).is_none() {
            return None;
        }
        self.push_undo();
        self.remove_item(&id)
    }

    /// Select the topmost item whose footprint contains a plan point,
    /// or clear the selection when nothing is hit.
    pub fn select_at(&mut self, point: Point) -> Option<&Item> {
        self.selected = crate::scene::pick_item(self, point).map(|item| item.id.clone());
        self.selected_item()
    }

    /// Snapshot the layout for export.
    pub fn export_layout(&self) -> LayoutFile {
        LayoutFile::new(self.items.clone(), self.boundary)
    }

    /// Import items from layout JSON.
    ///
    /// On failure the error is logged and the store is left unchanged.
    pub fn import_json(&mut self, json: &str) -> LayoutFileResult<usize> {
        match format::parse_items(json) {
            Ok(items) => {
                let count = items.len();
                self.push_undo();
                self.import_layout(items);
                log::info!("Imported {} items", count);
                Ok(count)
            }
            Err(e) => {
                log::error!("Failed to import layout: {}", e);
                Err(e)
            }
        }
    }

    // --- History ---

    fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            items: self.items.clone(),
        }
    }

    /// Restore a snapshot, dropping a selection that no longer resolves.
    fn restore(&mut self, snapshot: LayoutSnapshot) {
        self.items = snapshot.items;
        if self.selected_item().is_none() {
            self.selected = None;
        }
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
