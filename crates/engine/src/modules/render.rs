//! `<namespace>.render`: render.string(text, x, y), render.screen_width(), render.screen_height()

use std::rc::Rc;

use mlua::{Lua, Table};

use crate::services::Renderer;

pub fn create_module(lua: &Lua, renderer: Rc<dyn Renderer>) -> mlua::Result<Table> {
    let module = lua.create_table()?;

    let target = renderer.clone();
    module.set(
        "string",
        lua.create_function(move |_, (text, x, y): (String, i32, i32)| {
            target.draw_text(&text, x, y);
            Ok(())
        })?,
    )?;

    let target = renderer.clone();
    module.set(
        "screen_width",
        lua.create_function(move |_, ()| Ok(target.screen_size().0))?,
    )?;

    let target = renderer;
    module.set(
        "screen_height",
        lua.create_function(move |_, ()| Ok(target.screen_size().1))?,
    )?;

    Ok(module)
}
