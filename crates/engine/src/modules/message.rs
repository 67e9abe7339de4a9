//! `<namespace>.message(text)`: broadcast into the in-game message log, always red.

use std::rc::Rc;

use mlua::{Function, Lua};

use crate::services::{MessageSink, TextColor};

pub const MESSAGE_COLOR: TextColor = TextColor::Red;

pub fn create_function(lua: &Lua, sink: Rc<dyn MessageSink>) -> mlua::Result<Function> {
    lua.create_function(move |_, text: String| {
        sink.broadcast(&text, MESSAGE_COLOR);
        Ok(())
    })
}
