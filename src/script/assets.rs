use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ReelError, ReelResult};

/// Scene number (as a string key) to asset file path.
///
/// Serialized as a plain JSON object: `{"1": "images/a.png", "2": "images/b.png"}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneAssetMap(BTreeMap<String, PathBuf>);

impl SceneAssetMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the asset for `scene_number`, replacing any previous entry.
    pub fn insert(&mut self, scene_number: u32, path: impl Into<PathBuf>) {
        self.0.insert(scene_number.to_string(), path.into());
    }

    /// Asset path for `scene_number`, if any.
    pub fn get(&self, scene_number: u32) -> Option<&Path> {
        self.0.get(&scene_number.to_string()).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a JSON object file.
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReelError::validation(format!("read asset map '{}': {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl FromIterator<(u32, PathBuf)> for SceneAssetMap {
    fn from_iter<I: IntoIterator<Item = (u32, PathBuf)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(n, p)| (n.to_string(), p))
                .collect(),
        )
    }
}
