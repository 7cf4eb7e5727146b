//! Layout file format for export and import.
//!
//! A layout file is a JSON object `{ "items": [...], "boundary": {...} }`.
//! On import only `items` is read; the room boundary is managed separately.

use crate::items::Item;
use crate::room::Boundary;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Layout file errors.
#[derive(Debug, Error)]
pub enum LayoutFileError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing 'items' array")]
    MissingItems,
    #[error("Invalid item at index {index}: {source}")]
    InvalidItem {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for layout file operations.
pub type LayoutFileResult<T> = Result<T, LayoutFileError>;

/// The exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFile {
    pub items: Vec<Item>,
    pub boundary: Boundary,
}

impl LayoutFile {
    pub fn new(items: Vec<Item>, boundary: Boundary) -> Self {
        Self { items, boundary }
    }

    /// Serialize the layout to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the layout to a file.
    pub fn write_to(&self, path: &Path) -> LayoutFileResult<()> {
        let json = self.to_json()?;
        fs::write(path, json)
            .map_err(|e| LayoutFileError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}

/// Extract the item list from layout JSON.
///
/// The document must be an object with an `items` array. Any `boundary`
/// field is ignored.
pub fn parse_items(json: &str) -> LayoutFileResult<Vec<Item>> {
    let data: serde_json::Value = serde_json::from_str(json)?;

    let elements = data
        .get("items")
        .and_then(|items| items.as_array())
        .ok_or(LayoutFileError::MissingItems)?;

    elements
        .iter()
        .enumerate()
        .map(|(index, elem)| {
            Item::deserialize(elem).map_err(|source| LayoutFileError::InvalidItem { index, source })
        })
        .collect()
}

/// Read the item list from a layout file on disk.
pub fn read_items(path: &Path) -> LayoutFileResult<Vec<Item>> {
    let json = fs::read_to_string(path)
        .map_err(|e| LayoutFileError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    parse_items(&json)
}
