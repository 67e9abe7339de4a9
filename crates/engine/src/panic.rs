//! Unrecoverable runtime failure.
//!
//! When the Lua state can no longer be trusted (allocation failure outside a
//! protected call, exhausted C stack, a Rust panic unwinding out of a host
//! callback) the runtime hands control to a [`PanicHandler`]. The handler
//! type returns `!`: a panic is never turned into a [`crate::ScriptError`],
//! retried, or caught by callers.

/// Fallback text when the runtime gives no description.
pub const UNKNOWN_PANIC: &str = "unknown error";

/// Called by the runtime with an optional description. Never returns.
pub type PanicHandler = fn(Option<&str>) -> !;

/// Log the panic message. Returns the text that was logged.
pub fn report_panic(message: Option<&str>) -> String {
    let text = message.unwrap_or(UNKNOWN_PANIC);
    log::error!(
        "Lua is in a panic state and will now abort() the application:\n{}",
        text
    );
    text.to_string()
}

/// Default handler: log, then abort the process.
pub fn abort_on_panic(message: Option<&str>) -> ! {
    report_panic(message);
    log::logger().flush();
    std::process::abort()
}

/// Best-effort text from a Rust panic payload.
pub(crate) fn panic_payload_message(payload: &(dyn std::any::Any + Send)) -> Option<&str> {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        Some(*s)
    } else {
        payload.downcast_ref::<String>().map(String::as_str)
    }
}
