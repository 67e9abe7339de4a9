//! Best-effort script loading.
//!
//! Used for bootstrap scripts. A script that does not exist, cannot be opened
//! or comes back short is skipped without a word; a script that fails while
//! running is logged by the result translator. Nothing is returned as an
//! error: callers that need the failure text use ad hoc execution instead.

use scripthost_io::AssetSource;

use crate::result::check_result;
use crate::runtime::Runtime;

/// What happened to a script handed to [`run_script`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Not found, not openable, or short read. Nothing ran.
    Skipped,
    /// Ran to completion.
    Executed,
    /// Ran and failed; the failure was logged.
    Failed,
}

/// Resolve `path` and read the whole asset into an owned buffer.
pub fn read_script(assets: &dyn AssetSource, path: &str) -> Option<Vec<u8>> {
    let asset = assets.resolve(path)?;
    let size = asset.size();
    let mut source = vec![0u8; size];

    let mut handle = asset.open()?;
    if size > 0 && !handle.read(&mut source) {
        return None;
    }
    Some(source)
}

/// Load and execute `path` as a protected call.
pub fn run_script(runtime: &Runtime, assets: &dyn AssetSource, path: &str) -> LoadOutcome {
    let Some(source) = read_script(assets, path) else {
        return LoadOutcome::Skipped;
    };

    let outcome = runtime.run_chunk(&source, &format!("@{}", path));
    match check_result(outcome) {
        Ok(_) => LoadOutcome::Executed,
        Err(_) => LoadOutcome::Failed,
    }
}
