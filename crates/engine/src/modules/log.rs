//! `<namespace>.log`: `log.info("loaded {} mods", n)`.

use log::Level;
use mlua::{Function, Lua, MultiValue, Table};

/// Log target for script-originated lines.
pub const SCRIPT_LOG_TARGET: &str = "lua";

const LEVELS: &[(&str, Level)] = &[
    ("trace", Level::Trace),
    ("debug", Level::Debug),
    ("info", Level::Info),
    ("warn", Level::Warn),
    ("error", Level::Error),
];

pub fn create_module(lua: &Lua, tostring: Function) -> mlua::Result<Table> {
    let module = lua.create_table()?;
    for &(name, level) in LEVELS {
        let tostring = tostring.clone();
        let function = lua.create_function(move |_, args: MultiValue| {
            let mut parts = Vec::with_capacity(args.len());
            for value in args.iter() {
                let text: mlua::String = tostring.call(value.clone())?;
                parts.push(text.to_string_lossy().to_string());
            }
            let message = match parts.split_first() {
                Some((fmt, rest)) => format_message(fmt, rest),
                None => String::new(),
            };
            log::log!(target: SCRIPT_LOG_TARGET, level, "{}", message);
            Ok(())
        })?;
        module.set(name, function)?;
    }
    Ok(module)
}

/// Substitute `{}` placeholders in order. `{{` and `}}` are literal braces.
/// Surplus arguments are appended, space separated; unfilled placeholders
/// stay as `{}`.
pub fn format_message(fmt: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(fmt.len());
    let mut args = args.iter();
    let mut chars = fmt.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' if chars.peek() == Some(&'}') => {
                chars.next();
                match args.next() {
                    Some(arg) => out.push_str(arg),
                    None => out.push_str("{}"),
                }
            }
            other => out.push(other),
        }
    }

    for arg in args {
        out.push(' ');
        out.push_str(arg);
    }
    out
}
