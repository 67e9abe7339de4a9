//! Convention-based event dispatch.
//!
//! Scripts opt into an event by populating `Events.<name>.Trigger`. The host
//! never registers names; it looks the slot up on every dispatch. A missing
//! `Events` table, a missing entry and a non-callable `Trigger` all produce
//! the same diagnostic.

use mlua::{Lua, Table, Value};

use crate::error::ScriptError;
use crate::result::check_result;
use crate::runtime::Runtime;

pub const EVENTS_TABLE: &str = "Events";
pub const TRIGGER_FIELD: &str = "Trigger";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The trigger ran to completion.
    Handled,
    /// The trigger raised; the error was logged.
    HandlerFailed(ScriptError),
    /// No callable trigger for this name.
    NoHandler,
}

/// Look up `Events.<name>.Trigger` and return it if it can be called.
pub fn find_trigger(lua: &Lua, name: &str) -> Option<Value> {
    let Value::Table(events) = lua.globals().get::<Value>(EVENTS_TABLE).ok()? else {
        return None;
    };
    let Value::Table(entry) = events.get::<Value>(name).ok()? else {
        return None;
    };
    let trigger = entry.get::<Value>(TRIGGER_FIELD).ok()?;
    is_callable(&trigger).then_some(trigger)
}

/// Functions, and tables or userdata whose metatable has a `__call` function.
fn is_callable(value: &Value) -> bool {
    match value {
        Value::Function(_) => true,
        Value::Table(table) => table
            .metatable()
            .map(|mt| has_call(&mt))
            .unwrap_or(false),
        Value::UserData(ud) => ud
            .metatable()
            .map(|mt| matches!(mt.get::<Value>("__call"), Ok(Value::Function(_))))
            .unwrap_or(false),
        _ => false,
    }
}

fn has_call(metatable: &Table) -> bool {
    matches!(metatable.raw_get::<Value>("__call"), Ok(Value::Function(_)))
}

/// Fire `name`. Script failures are logged, never propagated.
pub fn trigger_event(runtime: &Runtime, name: &str) -> EventOutcome {
    let Some(trigger) = find_trigger(runtime.lua(), name) else {
        log::error!("{}.{}.{} is not a function", EVENTS_TABLE, name, TRIGGER_FIELD);
        return EventOutcome::NoHandler;
    };

    log::debug!("dispatching event {}", name);
    match check_result(runtime.call(trigger)) {
        Ok(_) => EventOutcome::Handled,
        Err(err) => EventOutcome::HandlerFailed(err),
    }
}
