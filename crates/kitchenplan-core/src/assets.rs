//! 3D model assets per item kind and their load state.
//!
//! Each kind has a named model resource. Loading goes through an
//! [`AssetSource`]; the outcome is recorded per kind in an [`AssetCache`]
//! as one of three states. A failed load is only logged: the scene falls
//! back to a placeholder mesh and the layout data is never touched.

use crate::catalog;
use crate::items::ItemKind;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Magic bytes at the start of a binary glTF file.
const GLB_MAGIC: &[u8; 4] = b"glTF";

/// Asset loading errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid asset {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// A loaded model resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    /// Resource name the model was loaded from.
    pub name: String,
    /// Raw binary glTF payload.
    pub bytes: Vec<u8>,
}

/// Load state of a kind's model.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetState {
    Loading,
    Loaded(ModelAsset),
    Failed(AssetError),
}

impl AssetState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Something that can produce model bytes for a resource name.
pub trait AssetSource {
    fn load(&self, name: &str) -> Result<ModelAsset, AssetError>;
}

/// Loads `.glb` models from a directory on disk.
pub struct FileAssetSource {
    root: PathBuf,
}

impl FileAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl AssetSource for FileAssetSource {
    fn load(&self, name: &str) -> Result<ModelAsset, AssetError> {
        let path = self.root.join(name);
        if !path.exists() {
            return Err(AssetError::NotFound(name.to_string()));
        }

        let bytes = fs::read(&path)
            .map_err(|e| AssetError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        if !bytes.starts_with(GLB_MAGIC) {
            return Err(AssetError::Invalid {
                name: name.to_string(),
                reason: "missing glTF header".to_string(),
            });
        }

        Ok(ModelAsset {
            name: name.to_string(),
            bytes,
        })
    }
}

/// Per-kind model load states.
#[derive(Debug, Default)]
pub struct AssetCache {
    states: HashMap<ItemKind, AssetState>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a kind, `None` if never requested.
    pub fn state(&self, kind: ItemKind) -> Option<&AssetState> {
        self.states.get(&kind)
    }

    /// The loaded model for a kind, if any.
    pub fn model(&self, kind: ItemKind) -> Option<&ModelAsset> {
        match self.states.get(&kind) {
            Some(AssetState::Loaded(model)) => Some(model),
            _ => None,
        }
    }

    /// Mark a kind as loading.
    /// Returns false if the kind was already requested.
    pub fn begin(&mut self, kind: ItemKind) -> bool {
        if self.states.contains_key(&kind) {
            return false;
        }
        self.states.insert(kind, AssetState::Loading);
        true
    }

    /// Record the outcome of a load. A later completion replaces an earlier one.
    pub fn finish(&mut self, kind: ItemKind, result: Result<ModelAsset, AssetError>) {
        let state = match result {
            Ok(model) => {
                log::info!("Loaded model {} for {}", model.name, kind);
                AssetState::Loaded(model)
            }
            Err(e) => {
                log::warn!("Using placeholder for {}: {}", kind, e);
                AssetState::Failed(e)
            }
        };
        self.states.insert(kind, state);
    }

    /// Request every kind's model from `source` that has not been requested yet.
    pub fn load_all(&mut self, source: &dyn AssetSource) {
        for kind in ItemKind::ALL {
            if self.begin(kind) {
                let result = source.load(catalog::entry(kind).model);
                self.finish(kind, result);
            }
        }
    }

    /// Forget all states so the next `load_all` retries.
    pub fn clear(&mut self) {
        self.states.clear();
    }
}
