// Line-oriented script console.
//
// Every line is ad hoc source text unless it starts with `:`.

use std::io::{self, BufRead, Write};

use scripthost_engine::EventOutcome;

use crate::session::Session;

pub const PROMPT: &str = "> ";

const HELP: &str = "\
:event NAME   fire Events.NAME.Trigger
:globals      list global names and their types
:reset        shut the runtime down and boot it again
:help         show this text
:quit         leave the console";

#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Code(String),
    Event(String),
    Globals,
    Reset,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Self::Code(line.to_string());
        };
        let mut words = rest.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("quit" | "q" | "exit"), None, _) => Self::Quit,
            (Some("globals"), None, _) => Self::Globals,
            (Some("reset"), None, _) => Self::Reset,
            (Some("help" | "h"), None, _) => Self::Help,
            (Some("event"), Some(name), None) => Self::Event(name.to_string()),
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Run the console until `:quit` or end of input.
pub fn run(session: &mut Session, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
    write!(out, "{}", PROMPT)?;
    out.flush()?;

    for line in input.lines() {
        let command = ReplCommand::parse(&line?);
        if command == ReplCommand::Quit {
            break;
        }
        execute(session, command, out)?;
        session.flush_frame();
        write!(out, "{}", PROMPT)?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

fn execute(session: &mut Session, command: ReplCommand, out: &mut impl Write) -> io::Result<()> {
    match command {
        ReplCommand::Code(code) => match session.host.execute_text(&code) {
            Ok(value) => writeln!(out, "{}", value),
            Err(e) => writeln!(out, "error: {}", e),
        },
        ReplCommand::Event(name) => match session.host.trigger_event(&name) {
            Ok(EventOutcome::Handled) => writeln!(out, "ok"),
            Ok(EventOutcome::NoHandler) => writeln!(out, "no handler for {}", name),
            Ok(EventOutcome::HandlerFailed(e)) => writeln!(out, "error: {}", e),
            Err(e) => writeln!(out, "error: {}", e),
        },
        ReplCommand::Globals => match session.host.dump_globals("globals") {
            Ok(dump) => writeln!(out, "{}", dump),
            Err(e) => writeln!(out, "error: {}", e),
        },
        ReplCommand::Reset => {
            session.host.shutdown();
            match session.host.initialize() {
                Ok(()) => writeln!(out, "runtime reset"),
                Err(e) => writeln!(out, "error: {}", e),
            }
        }
        ReplCommand::Help => writeln!(out, "{}", HELP),
        ReplCommand::Unknown(line) => writeln!(out, "unknown command {:?} (try :help)", line),
        ReplCommand::Empty | ReplCommand::Quit => Ok(()),
    }
}
