// Directory-backed assets

use std::path::{Path, PathBuf};

use crate::assets::{is_valid_asset_path, AssetRef, AssetSource, Location};

/// Assets stored as plain files under a root directory.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssets {
    fn resolve(&self, path: &str) -> Option<AssetRef> {
        if !is_valid_asset_path(path) {
            return None;
        }

        let full = path.split('/').fold(self.root.clone(), |acc, segment| acc.join(segment));
        let metadata = std::fs::metadata(&full).ok()?;
        if !metadata.is_file() {
            return None;
        }
        let size = usize::try_from(metadata.len()).ok()?;
        Some(AssetRef::new(path, size, Location::File(full)))
    }
}
