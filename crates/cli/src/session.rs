// Host wiring for one CLI invocation: layered directory assets, a console,
// and a render queue that is drained into the debug log after each command.

use std::rc::Rc;

use scripthost_config::HostSettings;
use scripthost_engine::{Console, HostServices, MessageLog, RenderQueue, ScriptHost};
use scripthost_io::LayeredAssets;

pub struct Session {
    pub host: ScriptHost,
    renderer: Rc<RenderQueue>,
}

impl Session {
    pub fn new(settings: HostSettings, console: Rc<dyn Console>) -> Self {
        let assets = LayeredAssets::from_roots(settings.asset_roots.iter().cloned());
        log::debug!("asset roots: {:?}", settings.asset_roots);

        let renderer = Rc::new(RenderQueue::default());
        let services = HostServices::new(console, renderer.clone(), Rc::new(MessageLog::new()));
        let host = ScriptHost::new(settings, Rc::new(assets), services);
        Self { host, renderer }
    }

    /// There is no window: log whatever scripts drew since the last call.
    /// Returns the number of draw commands discarded.
    pub fn flush_frame(&self) -> usize {
        let commands = self.renderer.drain();
        for command in &commands {
            log::debug!("draw ({}, {}): {}", command.x, command.y, command.text);
        }
        commands.len()
    }
}
