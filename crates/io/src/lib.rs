// Asset resolution for scripts

pub mod assets;
pub mod dir;
pub mod layered;
pub mod memory;

pub use assets::{AssetHandle, AssetRef, AssetSource, is_valid_asset_path};
pub use dir::DirAssets;
pub use layered::LayeredAssets;
pub use memory::MemoryAssets;
