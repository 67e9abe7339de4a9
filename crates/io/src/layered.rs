// Ordered stack of asset sources; the first source that has a path wins.

use crate::assets::{AssetRef, AssetSource};
use crate::dir::DirAssets;

#[derive(Default)]
pub struct LayeredAssets {
    layers: Vec<Box<dyn AssetSource>>,
}

impl LayeredAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// One directory layer per root, in the given order.
    pub fn from_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<std::path::PathBuf>,
    {
        let mut layered = Self::new();
        for root in roots {
            layered.push(DirAssets::new(root));
        }
        layered
    }

    /// Add a layer below the existing ones.
    pub fn push(&mut self, source: impl AssetSource + 'static) {
        self.layers.push(Box::new(source));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl AssetSource for LayeredAssets {
    fn resolve(&self, path: &str) -> Option<AssetRef> {
        self.layers.iter().find_map(|layer| layer.resolve(path))
    }
}
