//! In-memory, content-addressed assets.
//!
//! Paths map to a BLAKE3 digest, digests map to a shared blob. Two paths with
//! identical content share one blob. Used for bundled scripts and tests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::{is_valid_asset_path, AssetRef, AssetSource, Location};

#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    index: HashMap<String, blake3::Hash>,
    blobs: HashMap<blake3::Hash, Arc<[u8]>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `path`, replacing any previous entry.
    /// Returns the content digest. Invalid paths are not stored.
    pub fn insert(&mut self, path: &str, bytes: impl AsRef<[u8]>) -> Option<blake3::Hash> {
        if !is_valid_asset_path(path) {
            return None;
        }
        let bytes = bytes.as_ref();
        let digest = blake3::hash(bytes);
        self.blobs.entry(digest).or_insert_with(|| Arc::from(bytes));

        if let Some(old) = self.index.insert(path.to_string(), digest) {
            if old != digest && !self.index.values().any(|d| *d == old) {
                self.blobs.remove(&old);
            }
        }
        Some(digest)
    }

    /// Builder-style insert.
    pub fn with(mut self, path: &str, bytes: impl AsRef<[u8]>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Remove `path`. Its blob is dropped once nothing else points at it.
    pub fn remove(&mut self, path: &str) -> bool {
        match self.index.remove(path) {
            Some(digest) => {
                if !self.index.values().any(|d| *d == digest) {
                    self.blobs.remove(&digest);
                }
                true
            }
            None => false,
        }
    }

    pub fn digest(&self, path: &str) -> Option<blake3::Hash> {
        self.index.get(path).copied()
    }

    /// Number of distinct blobs held.
    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl AssetSource for MemoryAssets {
    fn resolve(&self, path: &str) -> Option<AssetRef> {
        let digest = self.index.get(path)?;
        let blob = self.blobs.get(digest)?;
        Some(AssetRef::new(path, blob.len(), Location::Blob(blob.clone())))
    }
}
