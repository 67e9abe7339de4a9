//! Test harness: log capture and a panic handler that unwinds instead of
//! aborting, so panic routing can be observed from a test.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use scripthost_config::HostSettings;
use scripthost_io::MemoryAssets;

use crate::host::ScriptHost;
use crate::services::{BufferConsole, HostServices, MessageLog, RenderQueue};

#[derive(Debug, Clone)]
pub struct CapturedLine {
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

thread_local! {
    static LINES: RefCell<Vec<CapturedLine>> = const { RefCell::new(Vec::new()) };
    static PANIC_MESSAGE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let line = CapturedLine {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        LINES.with(|lines| lines.borrow_mut().push(line));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Run `f` and return everything it logged on this thread.
pub fn capture_log<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedLine>) {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
    });
    LINES.with(|lines| lines.borrow_mut().clear());
    let result = f();
    let lines = LINES.with(|lines| std::mem::take(&mut *lines.borrow_mut()));
    (result, lines)
}

pub fn errors(lines: &[CapturedLine]) -> Vec<&CapturedLine> {
    lines.iter().filter(|l| l.level == log::Level::Error).collect()
}

/// Marker payload for [`unwinding_panic_handler`].
pub struct PanicRouted;

/// Records the message, then unwinds with [`PanicRouted`].
pub fn unwinding_panic_handler(message: Option<&str>) -> ! {
    PANIC_MESSAGE.with(|slot| *slot.borrow_mut() = Some(message.map(str::to_string)));
    std::panic::panic_any(PanicRouted)
}

/// What the last [`unwinding_panic_handler`] call on this thread received.
pub fn take_panic_message() -> Option<Option<String>> {
    PANIC_MESSAGE.with(|slot| slot.borrow_mut().take())
}

/// A host over in-memory assets with capturing services.
pub struct TestHost {
    pub host: ScriptHost,
    pub console: BufferConsole,
    pub renderer: Rc<RenderQueue>,
    pub messages: Rc<MessageLog>,
}

impl TestHost {
    pub fn new(assets: MemoryAssets) -> Self {
        Self::with_settings(HostSettings::default(), assets)
    }

    pub fn with_settings(settings: HostSettings, assets: MemoryAssets) -> Self {
        let console = BufferConsole::new();
        let renderer = Rc::new(RenderQueue::new(640, 480));
        let messages = Rc::new(MessageLog::new());
        let services = HostServices::new(
            Rc::new(console.clone()),
            renderer.clone(),
            messages.clone(),
        );
        let host = ScriptHost::new(settings, Rc::new(assets), services)
            .with_panic_handler(unwinding_panic_handler);
        Self {
            host,
            console,
            renderer,
            messages,
        }
    }

    /// Host with no scripts, already initialized.
    pub fn initialized() -> Self {
        let mut test = Self::new(MemoryAssets::new());
        test.host.initialize().expect("initialize");
        test
    }
}
