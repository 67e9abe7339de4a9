//! Host API registration.
//!
//! Runs once per runtime, before any user script: installs `print`,
//! `_VERSION`, and the capability table under the configured namespace.

use std::rc::Rc;

use mlua::{Function, Lua, MultiValue};

use crate::modules;
use crate::runtime::{Runtime, LUA_VERSION};
use crate::services::{Console, HostServices};

pub fn register_host_api(
    runtime: &Runtime,
    namespace: &str,
    services: &HostServices,
) -> mlua::Result<()> {
    let lua = runtime.lua();
    let tostring = runtime.tostring().clone();
    let globals = lua.globals();

    globals.set("print", create_print(lua, tostring.clone(), services.console.clone())?)?;
    globals.set("_VERSION", LUA_VERSION)?;

    let host = lua.create_table()?;
    host.set("log", modules::log::create_module(lua, tostring)?)?;
    host.set("render", modules::render::create_module(lua, services.renderer.clone())?)?;
    host.set("message", modules::message::create_function(lua, services.messages.clone())?)?;
    globals.set(namespace, host)?;

    log::debug!("host API registered under {:?}", namespace);
    Ok(())
}

/// `print(...)`: tab-separated `tostring` of every argument, then a newline.
fn create_print(lua: &Lua, tostring: Function, console: Rc<dyn Console>) -> mlua::Result<Function> {
    lua.create_function(move |_, args: MultiValue| {
        for (i, value) in args.iter().enumerate() {
            if i > 0 {
                console.print("\t");
            }
            let text: mlua::String = tostring.call(value.clone())?;
            console.print(&text.to_string_lossy());
        }
        console.newline();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{capture_log, unwinding_panic_handler};
    use crate::runtime::{RuntimeOptions, CONSOLE_CHUNK};
    use crate::services::{BufferConsole, MessageLog, RenderQueue, TextColor, DrawCommand};

    struct Fixture {
        runtime: Runtime,
        console: BufferConsole,
        renderer: Rc<RenderQueue>,
        messages: Rc<MessageLog>,
    }

    fn fixture(namespace: &str) -> Fixture {
        let runtime = Runtime::new(RuntimeOptions::default(), unwinding_panic_handler).unwrap();
        let console = BufferConsole::new();
        let renderer = Rc::new(RenderQueue::new(800, 600));
        let messages = Rc::new(MessageLog::new());
        let services = HostServices::new(Rc::new(console.clone()), renderer.clone(), messages.clone());
        register_host_api(&runtime, namespace, &services).unwrap();
        Fixture { runtime, console, renderer, messages }
    }

    fn run(f: &Fixture, code: &str) {
        assert!(f.runtime.run_chunk(code.as_bytes(), CONSOLE_CHUNK).is_ok(), "{}", code);
    }

    #[test]
    fn print_tab_separates_and_terminates() {
        let f = fixture("host");
        run(&f, "print('a', 1, true, nil)");
        assert_eq!(f.console.contents(), "a\t1\ttrue\tnil\n");
    }

    #[test]
    fn print_without_arguments_writes_newline() {
        let f = fixture("host");
        run(&f, "print()");
        assert_eq!(f.console.contents(), "\n");
    }

    #[test]
    fn print_handles_values_without_string_form() {
        let f = fixture("host");
        run(&f, "print({}, print, coroutine.create(function() end))");
        let out = f.console.contents();
        let parts: Vec<&str> = out.trim_end().split('\t').collect();
        assert!(parts[0].starts_with("table: "));
        assert!(parts[1].starts_with("function: "));
        assert!(parts[2].starts_with("thread: "));
    }

    #[test]
    fn print_uses_tostring_metamethod() {
        let f = fixture("host");
        run(&f, "print(setmetatable({}, { __tostring = function() return 'vec(1, 2)' end }))");
        assert_eq!(f.console.contents(), "vec(1, 2)\n");
    }

    #[test]
    fn print_survives_tostring_reassignment() {
        let f = fixture("host");
        run(&f, "tostring = nil; print(1.5)");
        assert_eq!(f.console.contents(), "1.5\n");
    }

    #[test]
    fn version_global() {
        let f = fixture("host");
        let version: String = f.runtime.lua().globals().get("_VERSION").unwrap();
        assert_eq!(version, LUA_VERSION);
    }

    #[test]
    fn namespace_is_configurable() {
        let f = fixture("game");
        run(&f, "assert(type(game.log) == 'table'); assert(type(game.render) == 'table'); assert(type(game.message) == 'function')");
        run(&f, "assert(host == nil)");
    }

    #[test]
    fn message_broadcasts_red() {
        let f = fixture("host");
        run(&f, "host.message('Welcome back')");
        assert_eq!(f.messages.messages(), vec![("Welcome back".to_string(), TextColor::Red)]);
    }

    #[test]
    fn render_queues_text() {
        let f = fixture("host");
        run(&f, "host.render.string('FPS ' .. host.render.screen_width(), 4, host.render.screen_height() - 12)");
        assert_eq!(
            f.renderer.drain(),
            vec![DrawCommand { text: "FPS 800".to_string(), x: 4, y: 588 }]
        );
    }

    #[test]
    fn log_module_formats_and_levels() {
        let f = fixture("host");
        let (_, lines) = capture_log(|| {
            run(&f, "host.log.warn('{} of {} loaded', 3, 4); host.log.info('plain')");
        });
        let script_lines: Vec<_> = lines.iter().filter(|l| l.target == "lua").collect();
        assert_eq!(script_lines.len(), 2);
        assert_eq!(script_lines[0].level, log::Level::Warn);
        assert_eq!(script_lines[0].message, "3 of 4 loaded");
        assert_eq!(script_lines[1].level, log::Level::Info);
        assert_eq!(script_lines[1].message, "plain");
    }

    #[test]
    fn bad_render_arguments_are_script_errors() {
        let f = fixture("host");
        assert!(!f
            .runtime
            .run_chunk(b"host.render.string('x', 'left', 0)", CONSOLE_CHUNK)
            .is_ok());
        assert!(f.renderer.is_empty());
    }
}
