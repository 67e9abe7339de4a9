//! The Lua runtime instance.
//!
//! # Architecture Notes
//!
//! All calls into Lua go through the `pcall` captured right after the state
//! is created, so a script that reassigns the global `pcall` cannot weaken
//! host-side protection. The captured `pcall` is mlua's replacement, which
//! refuses to swallow Rust panics (`catch_rust_panics(false)`): those unwind
//! back to `Runtime::protect` and are routed to the panic handler.

use std::panic::{self, AssertUnwindSafe};

use mlua::{Function, Lua, LuaOptions, MultiValue, StdLib, Value};

use crate::error::HostError;
use crate::panic::{panic_payload_message, PanicHandler};

/// Value installed as the `_VERSION` global.
pub const LUA_VERSION: &str = "Lua 5.4";

/// Chunk name for ad hoc text; errors read `console:1: ...`.
pub const CONSOLE_CHUNK: &str = "=console";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Open the `debug` library (script development only).
    pub debug_library: bool,
}

/// Failure payload of a protected call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorPayload {
    /// The error value was a string (or a host error with a message).
    Message(String),
    /// The error value carried no text (`error({})`, `error(42)`, `error()`).
    Unknown,
}

impl ErrorPayload {
    fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Message(s.to_string_lossy().to_string()),
            Value::Error(err) => Self::from_error(&err),
            _ => Self::Unknown,
        }
    }

    fn from_error(err: &mlua::Error) -> Self {
        let message = error_message(err);
        if message.is_empty() {
            Self::Unknown
        } else {
            Self::Message(message)
        }
    }
}

/// Raw outcome of a protected call, before translation.
#[derive(Debug)]
pub enum CallOutcome {
    Returned(MultiValue),
    Failed(ErrorPayload),
}

impl CallOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, CallOutcome::Returned(_))
    }
}

/// Owns the Lua state. One per [`crate::ScriptHost`] lifetime.
pub struct Runtime {
    lua: Lua,
    pcall: Function,
    tostring: Function,
    panic_handler: PanicHandler,
}

impl Runtime {
    /// Create a Lua state with the host's library subset and attach the
    /// panic handler before anything else can run.
    pub fn new(options: RuntimeOptions, panic_handler: PanicHandler) -> Result<Self, HostError> {
        let libs = StdLib::PACKAGE
            | StdLib::COROUTINE
            | StdLib::TABLE
            | StdLib::STRING
            | StdLib::MATH
            | StdLib::UTF8;

        // Script-side pcall/xpcall must not swallow Rust panics either.
        let lua_options = LuaOptions::new().catch_rust_panics(false);

        let lua = if options.debug_library {
            // SAFETY: `debug` can break VM invariants from script code. It is
            // only opened when explicitly requested for script development.
            unsafe { Lua::unsafe_new_with(libs | StdLib::DEBUG, lua_options) }
        } else {
            Lua::new_with(libs, lua_options)?
        };

        let globals = lua.globals();
        let pcall: Function = globals.get("pcall")?;
        let tostring: Function = globals.get("tostring")?;

        log::debug!(
            "Lua runtime created (debug library: {})",
            if options.debug_library { "on" } else { "off" }
        );

        Ok(Self {
            lua,
            pcall,
            tostring,
            panic_handler,
        })
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// The `tostring` captured at construction.
    pub fn tostring(&self) -> &Function {
        &self.tostring
    }

    /// Compile and run `source` as a protected call.
    pub fn run_chunk(&self, source: &[u8], chunk_name: &str) -> CallOutcome {
        let compiled = self.protect(|| self.lua.load(source).set_name(chunk_name).into_function());
        match compiled {
            Ok(function) => self.call(Value::Function(function)),
            Err(err) => CallOutcome::Failed(ErrorPayload::from_error(&err)),
        }
    }

    /// Call `callable` with no arguments as a protected call.
    pub fn call(&self, callable: Value) -> CallOutcome {
        match self.protect(|| self.pcall.call::<MultiValue>(callable)) {
            Ok(values) => split_pcall(values),
            Err(err) => CallOutcome::Failed(ErrorPayload::from_error(&err)),
        }
    }

    /// Canonical text for a value.
    ///
    /// nil, booleans, integers and strings are converted directly. Floats,
    /// tables and every other kind go through Lua's own `tostring` so
    /// `__tostring` is honoured; if that raises, the type name is used.
    pub fn stringify(&self, value: &Value) -> String {
        match value {
            Value::Nil => "nil".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::String(s) => s.to_string_lossy().to_string(),
            other => self
                .protect(|| self.tostring.call::<mlua::String>(other.clone()))
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|_| other.type_name().to_string()),
        }
    }

    /// Log the global namespace at debug level and return the logged line.
    pub fn dump_globals(&self, section: &str) -> String {
        let mut entries: Vec<String> = self
            .lua
            .globals()
            .pairs::<Value, Value>()
            .filter_map(|pair| pair.ok())
            .map(|(key, value)| format!("{}:{}", self.stringify(&key), value.type_name()))
            .collect();
        entries.sort();

        let line = format!("-- {} -- [ {} ]", section, entries.join(", "));
        log::debug!("{}", line);
        line
    }

    /// Run `f`, routing unrecoverable failures to the panic handler.
    fn protect<R>(&self, f: impl FnOnce() -> mlua::Result<R>) -> mlua::Result<R> {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(Err(err)) if is_unrecoverable(&err) => {
                let message = error_message(&err);
                (self.panic_handler)(Some(&message))
            }
            Ok(result) => result,
            Err(payload) => (self.panic_handler)(panic_payload_message(payload.as_ref())),
        }
    }
}

/// `pcall` returns `true, ...` or `false, err`.
fn split_pcall(values: MultiValue) -> CallOutcome {
    let mut values = values.into_iter();
    match values.next() {
        Some(Value::Boolean(true)) => CallOutcome::Returned(values.collect()),
        _ => CallOutcome::Failed(ErrorPayload::from_value(values.next().unwrap_or(Value::Nil))),
    }
}

fn is_unrecoverable(err: &mlua::Error) -> bool {
    match err {
        mlua::Error::MemoryError(_)
        | mlua::Error::StackError
        | mlua::Error::PreviouslyResumedPanic => true,
        mlua::Error::CallbackError { cause, .. } => is_unrecoverable(cause),
        _ => false,
    }
}

/// Message text of an mlua error, without callback wrapping.
fn error_message(err: &mlua::Error) -> String {
    match err {
        mlua::Error::SyntaxError { message, .. } => message.clone(),
        mlua::Error::RuntimeError(msg) => msg.clone(),
        mlua::Error::MemoryError(msg) => msg.clone(),
        mlua::Error::CallbackError { cause, .. } => error_message(cause),
        _ => err.to_string(),
    }
}
