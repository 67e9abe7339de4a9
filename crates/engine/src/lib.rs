//! Embedded Lua host.
//!
//! # Architecture
//!
//! The host owns exactly one Lua state at a time and never lets a script
//! failure escape into host control flow:
//!
//! 1. **Runtime** owns the `mlua::Lua` instance, the pristine `pcall` and
//!    `tostring`, and the panic handler. Every call into Lua is protected.
//! 2. **Registrar** installs `print`, `_VERSION` and the capability table
//!    (`<namespace>.log`, `<namespace>.render`, `<namespace>.message`).
//! 3. **Loader** resolves a script through an [`AssetSource`] and runs it
//!    best-effort: missing scripts are skipped, failing scripts are logged.
//! 4. **Result translator** turns every call outcome into a value or a
//!    [`ScriptError`], logging failures exactly once.
//! 5. **Events** dispatches `Events.<name>.Trigger` by convention.
//! 6. **ScriptHost** ties it together: initialize, shutdown, trigger_event,
//!    execute_text.
//!
//! # Failure Classes
//!
//! - Missing asset: silent skip.
//! - Script error: logged, returned as `ScriptError` where a caller asked.
//! - Runtime panic: routed to the [`PanicHandler`], which never returns.
//!
//! [`AssetSource`]: scripthost_io::AssetSource

pub mod error;
pub mod events;
pub mod host;
pub mod loader;
pub mod modules;
pub mod panic;
pub mod registrar;
pub mod result;
pub mod runtime;
pub mod services;

#[cfg(test)]
pub(crate) mod harness;

pub use error::{HostError, ScriptError};
pub use events::EventOutcome;
pub use host::ScriptHost;
pub use loader::LoadOutcome;
pub use panic::{abort_on_panic, PanicHandler};
pub use runtime::{CallOutcome, ErrorPayload, Runtime, RuntimeOptions, LUA_VERSION};
pub use services::{
    BufferConsole, Console, DrawCommand, HostServices, MessageLog, MessageSink, RenderQueue,
    Renderer, StdoutConsole, TextColor,
};
