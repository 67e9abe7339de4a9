//! Host-side collaborators exposed to scripts.
//!
//! Scripts reach the outside world only through these traits. The host
//! supplies implementations; the ones here cover headless use and tests.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

/// Console sink for `print`.
pub trait Console {
    /// Write a text fragment, no newline.
    fn print(&self, text: &str);
    /// Terminate the current line.
    fn newline(&self);
}

/// Writes straight to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn print(&self, text: &str) {
        let _ = std::io::stdout().lock().write_all(text.as_bytes());
    }

    fn newline(&self) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(b"\n");
        let _ = out.flush();
    }
}

/// Collects console output in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    buffer: Rc<RefCell<String>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buffer.borrow().clone()
    }

    /// Return and clear everything written so far.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.buffer.borrow_mut())
    }
}

impl Console for BufferConsole {
    fn print(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    fn newline(&self) {
        self.buffer.borrow_mut().push('\n');
    }
}

/// Rendering facade behind `<namespace>.render`.
pub trait Renderer {
    fn draw_text(&self, text: &str, x: i32, y: i32);
    /// (width, height) in pixels.
    fn screen_size(&self) -> (u32, u32);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCommand {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// Records draw requests until the host drains them for the next frame.
#[derive(Debug)]
pub struct RenderQueue {
    commands: RefCell<Vec<DrawCommand>>,
    width: u32,
    height: u32,
}

impl RenderQueue {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            width,
            height,
        }
    }

    pub fn drain(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl Renderer for RenderQueue {
    fn draw_text(&self, text: &str, x: i32, y: i32) {
        self.commands.borrow_mut().push(DrawCommand {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Colors available to in-game messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    White,
    Blue,
    Gold,
    Red,
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextColor::White => write!(f, "white"),
            TextColor::Blue => write!(f, "blue"),
            TextColor::Gold => write!(f, "gold"),
            TextColor::Red => write!(f, "red"),
        }
    }
}

/// In-game message system behind `<namespace>.message`.
pub trait MessageSink {
    fn broadcast(&self, text: &str, color: TextColor);
}

/// Keeps broadcast messages and mirrors them to the log.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: RefCell<Vec<(String, TextColor)>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(String, TextColor)> {
        self.messages.borrow().clone()
    }
}

impl MessageSink for MessageLog {
    fn broadcast(&self, text: &str, color: TextColor) {
        log::info!("message [{}]: {}", color, text);
        self.messages.borrow_mut().push((text.to_string(), color));
    }
}

/// Everything the registrar wires into a fresh runtime.
#[derive(Clone)]
pub struct HostServices {
    pub console: Rc<dyn Console>,
    pub renderer: Rc<dyn Renderer>,
    pub messages: Rc<dyn MessageSink>,
}

impl HostServices {
    pub fn new(
        console: Rc<dyn Console>,
        renderer: Rc<dyn Renderer>,
        messages: Rc<dyn MessageSink>,
    ) -> Self {
        Self {
            console,
            renderer,
            messages,
        }
    }

    /// Stdout console, an undrained render queue, and a logging message sink.
    pub fn headless() -> Self {
        Self::new(
            Rc::new(StdoutConsole),
            Rc::new(RenderQueue::default()),
            Rc::new(MessageLog::new()),
        )
    }
}
