//! Read-only asset lookup.
//!
//! A logical asset path (`lua/init.lua`) resolves to an [`AssetRef`] that
//! knows its byte size. Opening the ref yields an [`AssetHandle`] that reads
//! the whole asset in one call. Every step may come back empty; callers treat
//! that as "asset not present", not as an error.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;

/// Something that maps logical paths to assets.
pub trait AssetSource {
    /// Look up `path`. `None` when the asset does not exist or the path is
    /// not a valid logical path.
    fn resolve(&self, path: &str) -> Option<AssetRef>;
}

impl<T: AssetSource + ?Sized> AssetSource for Box<T> {
    fn resolve(&self, path: &str) -> Option<AssetRef> {
        (**self).resolve(path)
    }
}

impl<T: AssetSource + ?Sized> AssetSource for std::rc::Rc<T> {
    fn resolve(&self, path: &str) -> Option<AssetRef> {
        (**self).resolve(path)
    }
}

/// Where the bytes of a resolved asset live.
#[derive(Debug, Clone)]
pub(crate) enum Location {
    File(PathBuf),
    Blob(Arc<[u8]>),
}

/// A resolved asset. Cheap to clone; holds no open file.
#[derive(Debug, Clone)]
pub struct AssetRef {
    path: String,
    size: usize,
    location: Location,
}

impl AssetRef {
    pub(crate) fn new(path: &str, size: usize, location: Location) -> Self {
        Self {
            path: path.to_string(),
            size,
            location,
        }
    }

    /// Logical path this ref was resolved from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Size in bytes as reported at resolve time.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Open the asset for reading. `None` if the backing file vanished or
    /// cannot be opened.
    pub fn open(self) -> Option<AssetHandle> {
        let inner = match self.location {
            Location::File(path) => Handle::File(File::open(path).ok()?),
            Location::Blob(bytes) => Handle::Blob(Cursor::new(bytes)),
        };
        Some(AssetHandle { inner })
    }
}

enum Handle {
    File(File),
    Blob(Cursor<Arc<[u8]>>),
}

/// An open asset.
pub struct AssetHandle {
    inner: Handle,
}

impl AssetHandle {
    /// Fill `buf` completely. Returns false on a short or failed read.
    pub fn read(&mut self, buf: &mut [u8]) -> bool {
        let result = match &mut self.inner {
            Handle::File(file) => file.read_exact(buf),
            Handle::Blob(cursor) => cursor.read_exact(buf),
        };
        result.is_ok()
    }
}

/// Logical paths are relative, `/`-separated, and never step outside the
/// root they are resolved against.
pub fn is_valid_asset_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return false;
    }
    path.split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != ".." && !segment.contains(':'))
}
