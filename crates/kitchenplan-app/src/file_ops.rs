//! Native file dialogs for layout export and import.

use kitchenplan_core::format::LayoutFile;

/// Save the layout to a JSON file chosen with a native file dialog.
pub fn save_layout(layout: &LayoutFile) {
    let dialog = rfd::FileDialog::new()
        .set_title("Export Layout")
        .set_file_name("kitchen-layout.json")
        .add_filter("Kitchen Layout", &["json"]);

    if let Some(path) = dialog.save_file() {
        match layout.write_to(&path) {
            Ok(()) => log::info!("Exported {} items to: {:?}", layout.items.len(), path),
            Err(e) => log::error!("Failed to export layout: {}", e),
        }
    }
}

/// Read layout JSON from a file chosen with a native file dialog.
pub fn load_layout() -> Option<String> {
    let dialog = rfd::FileDialog::new()
        .set_title("Import Layout")
        .add_filter("Kitchen Layout", &["json"]);

    let path = dialog.pick_file()?;
    match std::fs::read_to_string(&path) {
        Ok(content) => {
            log::info!("Read layout from: {:?}", path);
            Some(content)
        }
        Err(e) => {
            log::error!("Failed to read file: {}", e);
            None
        }
    }
}
