// Integration tests: a host over on-disk script directories.
// Run with: cargo test -p scripthost-engine --test lifecycle

use std::fs;
use std::path::Path;
use std::rc::Rc;

use scripthost_config::HostSettings;
use scripthost_engine::{
    BufferConsole, EventOutcome, HostServices, LoadOutcome, MessageLog, RenderQueue, ScriptError,
    ScriptHost, TextColor,
};
use scripthost_io::LayeredAssets;

struct Fixture {
    host: ScriptHost,
    console: BufferConsole,
    renderer: Rc<RenderQueue>,
    messages: Rc<MessageLog>,
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn host_over(roots: &[&Path]) -> Fixture {
    let console = BufferConsole::new();
    let renderer = Rc::new(RenderQueue::new(1024, 768));
    let messages = Rc::new(MessageLog::new());
    let services = HostServices::new(Rc::new(console.clone()), renderer.clone(), messages.clone());
    let assets = LayeredAssets::from_roots(roots.iter().map(|r| r.to_path_buf()));
    let host = ScriptHost::new(HostSettings::default(), Rc::new(assets), services);
    Fixture { host, console, renderer, messages }
}

const ENGINE_INIT: &str = r#"
Events = {}
Events.OnGameBoot = { Trigger = function() print("boot") end }
Events.OnFrame = {
    Trigger = function()
        host.render.string("frame", 0, host.render.screen_height() - 10)
    end
}
"#;

#[test]
fn boot_runs_engine_scripts_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lua/init.lua", ENGINE_INIT);

    let mut f = host_over(&[dir.path()]);
    f.host.initialize().unwrap();
    assert_eq!(f.console.contents(), "boot\n");

    assert_eq!(f.host.trigger_event("OnFrame"), Ok(EventOutcome::Handled));
    let drawn = f.renderer.drain();
    assert_eq!(drawn.len(), 1);
    assert_eq!(drawn[0].text, "frame");
    assert_eq!(drawn[0].y, 758);
}

#[test]
fn user_layer_overrides_engine_layer() {
    let user = tempfile::tempdir().unwrap();
    let engine = tempfile::tempdir().unwrap();
    write(engine.path(), "lua/init.lua", ENGINE_INIT);
    write(engine.path(), "lua/util.lua", "source = 'engine'");
    write(user.path(), "lua/util.lua", "source = 'user'");
    write(
        user.path(),
        "lua/user.lua",
        "Events.OnGameBoot.Trigger = function() host.message('modded') end",
    );

    let mut f = host_over(&[user.path(), engine.path()]);
    f.host.initialize().unwrap();
    assert_eq!(f.console.contents(), "");
    assert_eq!(f.messages.messages(), vec![("modded".to_string(), TextColor::Red)]);

    assert_eq!(f.host.run_script("lua/util.lua"), Ok(LoadOutcome::Executed));
    assert_eq!(f.host.execute_text("return source"), Ok("user".to_string()));
}

#[test]
fn missing_and_broken_scripts_do_not_stop_boot() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lua/user.lua", "this is not lua");

    let mut f = host_over(&[dir.path()]);
    assert!(f.host.initialize().is_ok());
    assert!(f.host.is_initialized());
    assert_eq!(f.host.run_script("lua/absent.lua"), Ok(LoadOutcome::Skipped));
    assert_eq!(f.host.run_script("lua/user.lua"), Ok(LoadOutcome::Failed));
    assert_eq!(f.host.trigger_event("OnGameBoot"), Ok(EventOutcome::NoHandler));
}

#[test]
fn script_errors_come_back_as_values() {
    let dir = tempfile::tempdir().unwrap();
    let mut f = host_over(&[dir.path()]);
    f.host.initialize().unwrap();

    match f.host.execute_text("error('bad thing')") {
        Err(ScriptError::Lua(message)) => assert!(message.contains("bad thing"), "{}", message),
        other => panic!("expected script error, got {:?}", other),
    }
    assert_eq!(f.host.execute_text("error({})"), Err(ScriptError::Unknown));
    assert_eq!(f.host.execute_text("return 'still alive'"), Ok("still alive".to_string()));
}

#[test]
fn reinitialize_reads_edited_scripts() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lua/init.lua", "generation = 1");

    let mut f = host_over(&[dir.path()]);
    f.host.initialize().unwrap();
    assert_eq!(f.host.execute_text("return generation"), Ok("1".to_string()));

    write(dir.path(), "lua/init.lua", "generation = 2");
    assert!(f.host.shutdown());
    assert_eq!(f.host.execute_text("return generation"), Err(ScriptError::NotInitialized));
    f.host.initialize().unwrap();
    assert_eq!(f.host.execute_text("return generation"), Ok("2".to_string()));
}
