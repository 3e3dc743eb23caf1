//! The ground-truth → binary → multiclass association map.
//!
//! The map is built once by the `map` command (or supplied externally)
//! and persisted as nested JSON keyed by file path. All evaluation
//! commands consume it rather than re-deriving associations.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Nested lookup: ground-truth path → binary log path → multiclass
/// log paths.
///
/// `BTreeMap` keeps iteration deterministic across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMap {
    /// The association entries.
    pub entries: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl FileMap {
    /// Load a file map from JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::FileMapRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| Error::FileMapParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Persist the file map as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_failed = |source: Box<dyn std::error::Error + Send + Sync>| Error::FileMapWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_failed(Box::new(e)))?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(|e| write_failed(Box::new(e)))?;
        std::fs::write(path, contents).map_err(|e| write_failed(Box::new(e)))
    }

    /// Number of ground-truth files in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
