//! Runtime lifecycle.
//!
//! `ScriptHost` owns the optional runtime. Absent is a valid state (before
//! `initialize`, after `shutdown`); operations that need a runtime report
//! `NotInitialized` instead of touching a dead state.

use std::rc::Rc;

use scripthost_config::HostSettings;
use scripthost_io::AssetSource;

use crate::error::{HostError, ScriptError};
use crate::events::{self, EventOutcome};
use crate::loader::{self, LoadOutcome};
use crate::panic::{abort_on_panic, PanicHandler};
use crate::registrar::register_host_api;
use crate::result::check_result_text;
use crate::runtime::{Runtime, RuntimeOptions, CONSOLE_CHUNK};
use crate::services::HostServices;

pub struct ScriptHost {
    settings: HostSettings,
    assets: Rc<dyn AssetSource>,
    services: HostServices,
    panic_handler: PanicHandler,
    runtime: Option<Runtime>,
}

impl ScriptHost {
    pub fn new(settings: HostSettings, assets: Rc<dyn AssetSource>, services: HostServices) -> Self {
        Self {
            settings,
            assets,
            services,
            panic_handler: abort_on_panic,
            runtime: None,
        }
    }

    /// Replace the default abort-on-panic handler. Takes effect on the next
    /// `initialize`.
    pub fn with_panic_handler(mut self, handler: PanicHandler) -> Self {
        self.panic_handler = handler;
        self
    }

    pub fn settings(&self) -> &HostSettings {
        &self.settings
    }

    pub fn is_initialized(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn runtime(&self) -> Result<&Runtime, HostError> {
        self.runtime.as_ref().ok_or(HostError::NotInitialized)
    }

    /// Create the runtime, register the host API, run the bootstrap scripts
    /// (initializer, then user override) and fire the boot event.
    ///
    /// Bootstrap is best-effort: a missing or failing script is skipped or
    /// logged and initialization carries on.
    pub fn initialize(&mut self) -> Result<(), HostError> {
        if self.runtime.is_some() {
            return Err(HostError::AlreadyInitialized);
        }

        let options = RuntimeOptions {
            debug_library: self.settings.debug_library_enabled(),
        };
        let runtime = Runtime::new(options, self.panic_handler)?;
        register_host_api(&runtime, &self.settings.namespace, &self.services)?;
        let runtime = self.runtime.insert(runtime);

        for path in [&self.settings.init_script, &self.settings.user_script] {
            // Skipped scripts are optional and stay out of the log.
            if loader::run_script(runtime, self.assets.as_ref(), path) == LoadOutcome::Executed {
                log::debug!("bootstrap script {} executed", path);
            }
        }

        events::trigger_event(runtime, &self.settings.boot_event);
        Ok(())
    }

    /// Destroy the runtime and all script state. Returns false if there was
    /// nothing to destroy.
    pub fn shutdown(&mut self) -> bool {
        match self.runtime.take() {
            Some(runtime) => {
                drop(runtime);
                log::debug!("Lua runtime destroyed");
                true
            }
            None => false,
        }
    }

    /// Fire a named event through the `Events` convention.
    pub fn trigger_event(&self, name: &str) -> Result<EventOutcome, HostError> {
        Ok(events::trigger_event(self.runtime()?, name))
    }

    /// Run ad hoc source text. Success carries the text of the first
    /// returned value; failure carries the runtime's message.
    pub fn execute_text(&self, code: &str) -> Result<String, ScriptError> {
        let runtime = self.runtime()?;
        check_result_text(runtime, runtime.run_chunk(code.as_bytes(), CONSOLE_CHUNK))
    }

    /// Best-effort load of another script from the asset source.
    pub fn run_script(&self, path: &str) -> Result<LoadOutcome, HostError> {
        Ok(loader::run_script(self.runtime()?, self.assets.as_ref(), path))
    }

    /// Debug-level dump of the global namespace.
    pub fn dump_globals(&self, section: &str) -> Result<String, HostError> {
        Ok(self.runtime()?.dump_globals(section))
    }
}

impl Drop for ScriptHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}
