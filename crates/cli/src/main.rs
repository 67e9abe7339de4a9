// shost - drive the embedded Lua host from a terminal

mod exit_codes;
mod logger;
mod repl;
mod session;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use scripthost_config::{HostSettings, SettingsError};
use scripthost_engine::{EventOutcome, ScriptError, StdoutConsole, LUA_VERSION};

use exit_codes::{EXIT_CONFIG, EXIT_ERROR, EXIT_IO, EXIT_SCRIPT, EXIT_SUCCESS, EXIT_USAGE};
use session::Session;

#[derive(Parser)]
#[command(name = "shost")]
#[command(about = "Embedded Lua scripting host (headless)")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (default: the per-user config path)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Asset directory, searched in order. Repeatable; replaces asset_roots.
    #[arg(long = "assets", global = true, value_name = "DIR")]
    assets: Vec<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace). Overrides SHOST_LOG.
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Boot the host, fire events, run snippets, shut down
    #[command(after_help = "\
Examples:
  shost run --assets ./game
  shost run --event OnFrame --event OnFrame
  shost run --exec 'return host.render.screen_width()'")]
    Run {
        /// Event to fire after boot. Repeatable, fired in order.
        #[arg(long, value_name = "NAME")]
        event: Vec<String>,

        /// Lua source to execute after the events. Repeatable.
        #[arg(long, value_name = "CODE")]
        exec: Vec<String>,
    },

    /// Boot the host and execute one snippet
    #[command(after_help = "\
Examples:
  shost exec 'return 1 + 1'
  shost exec 'return _VERSION' --json")]
    Exec {
        /// Lua source text
        code: String,

        /// Print {\"ok\": bool, \"value\"|\"error\": string}
        #[arg(long)]
        json: bool,
    },

    /// Interactive console (each line is executed; :help for commands)
    Repl,

    /// Show effective settings
    Config {
        /// Print the settings path instead
        #[arg(long)]
        path: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\nengine:  scripthost-engine ", env!("CARGO_PKG_VERSION"),
        "\nruntime: Lua 5.4 (vendored)",
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let result = match cli.command {
        None => {
            eprintln!("Usage: shost <command> [options]");
            eprintln!("       shost --help for more information");
            Ok(())
        }
        Some(Commands::Config { path: true }) => {
            let path = cli.config.clone().unwrap_or_else(HostSettings::config_path);
            println!("{}", path.display());
            Ok(())
        }
        Some(command) => resolve_settings(cli.config, cli.assets).and_then(|settings| match command {
            Commands::Run { event, exec } => cmd_run(settings, event, exec),
            Commands::Exec { code, json } => cmd_exec(settings, code, json),
            Commands::Repl => cmd_repl(settings),
            Commands::Config { .. } => cmd_config(&settings),
        }),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(err: SettingsError) -> Self {
        let hint = match &err {
            SettingsError::Io(_) => Some("pass --config FILE or create the default settings file".to_string()),
            SettingsError::Parse(_) => Some("settings are TOML; see `shost config` for the expected keys".to_string()),
            SettingsError::Invalid(_) => None,
        };
        Self { code: EXIT_CONFIG, message: err.to_string(), hint }
    }

    /// Script failures are already logged by the host; only the exit code
    /// carries them out.
    pub fn script(msg: impl Into<String>) -> Self {
        Self { code: EXIT_SCRIPT, message: msg.into(), hint: None }
    }

    pub fn io(err: io::Error) -> Self {
        Self { code: EXIT_IO, message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// `--config` is strict; the default path falls back to defaults when
/// missing or unreadable. `--assets` replaces the configured roots.
fn resolve_settings(config: Option<PathBuf>, assets: Vec<PathBuf>) -> Result<HostSettings, CliError> {
    let mut settings = match config {
        Some(path) => HostSettings::load_from(&path).map_err(CliError::config)?,
        None => HostSettings::load(),
    };
    if !assets.is_empty() {
        settings.asset_roots = assets;
    }
    settings.validate().map_err(CliError::config)?;
    Ok(settings)
}

fn boot(settings: HostSettings) -> Result<Session, CliError> {
    let mut session = Session::new(settings, Rc::new(StdoutConsole));
    session
        .host
        .initialize()
        .map_err(|e| CliError::general(e.to_string()))?;
    session.flush_frame();
    Ok(session)
}

// ============================================================================
// run
// ============================================================================

fn cmd_run(settings: HostSettings, events: Vec<String>, snippets: Vec<String>) -> Result<(), CliError> {
    let mut session = boot(settings)?;
    let mut failures = 0usize;

    for name in &events {
        match session.host.trigger_event(name) {
            Ok(EventOutcome::Handled) => {}
            Ok(EventOutcome::HandlerFailed(_)) => failures += 1,
            Ok(EventOutcome::NoHandler) => {}
            Err(e) => return Err(CliError::general(e.to_string())),
        }
        session.flush_frame();
    }

    for code in &snippets {
        match session.host.execute_text(code) {
            Ok(value) => println!("ok: {}", value),
            Err(e) => {
                println!("error: {}", e);
                failures += 1;
            }
        }
        session.flush_frame();
    }

    session.host.shutdown();
    if failures > 0 {
        return Err(CliError::script(format!("{} script failure(s)", failures)));
    }
    Ok(())
}

// ============================================================================
// exec
// ============================================================================

#[derive(Debug, serde::Serialize)]
struct ExecOutput {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ExecOutput {
    fn from_result(result: &Result<String, ScriptError>) -> Self {
        match result {
            Ok(value) => Self { ok: true, value: Some(value.clone()), error: None },
            Err(e) => Self { ok: false, value: None, error: Some(e.message()) },
        }
    }
}

fn cmd_exec(settings: HostSettings, code: String, json: bool) -> Result<(), CliError> {
    if code.trim().is_empty() {
        return Err(CliError::args("nothing to execute").with_hint("pass Lua source, e.g. shost exec 'return 1'"));
    }
    let session = boot(settings)?;
    let result = session.host.execute_text(&code);
    session.flush_frame();

    if json {
        let output = ExecOutput::from_result(&result);
        let text = serde_json::to_string(&output).map_err(|e| CliError::general(e.to_string()))?;
        println!("{}", text);
        return match result {
            Ok(_) => Ok(()),
            Err(_) => Err(CliError::script("")),
        };
    }

    match result {
        Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        Err(e) => Err(CliError::script(e.message())),
    }
}

// ============================================================================
// repl
// ============================================================================

fn cmd_repl(settings: HostSettings) -> Result<(), CliError> {
    let mut session = boot(settings)?;
    eprintln!("shost {} ({}), :help for commands", env!("CARGO_PKG_VERSION"), LUA_VERSION);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    repl::run(&mut session, stdin.lock(), &mut stdout).map_err(CliError::io)?;
    stdout.flush().map_err(CliError::io)?;
    Ok(())
}

// ============================================================================
// config
// ============================================================================

fn cmd_config(settings: &HostSettings) -> Result<(), CliError> {
    let text = settings.to_toml().map_err(|e| {
        CliError::general(e.to_string()).with_hint("check the settings file for values TOML cannot hold")
    })?;
    print!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_output_shapes() {
        let ok = ExecOutput::from_result(&Ok("2".to_string()));
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"ok":true,"value":"2"}"#);

        let failed = ExecOutput::from_result(&Err(ScriptError::Unknown));
        assert_eq!(
            serde_json::to_string(&failed).unwrap(),
            r#"{"ok":false,"error":"Unknown Lua error"}"#
        );
    }

    #[test]
    fn assets_flag_replaces_roots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "asset_roots = [\"from-file\"]\nnamespace = \"game\"\n").unwrap();

        let settings = resolve_settings(Some(path.clone()), vec![]).unwrap();
        assert_eq!(settings.asset_roots, vec![PathBuf::from("from-file")]);
        assert_eq!(settings.namespace, "game");

        let settings = resolve_settings(Some(path), vec![PathBuf::from("override")]).unwrap();
        assert_eq!(settings.asset_roots, vec![PathBuf::from("override")]);
    }

    #[test]
    fn explicit_config_errors_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = resolve_settings(Some(dir.path().join("nope.toml")), vec![]).unwrap_err();
        assert_eq!(missing.code, EXIT_CONFIG);
        assert!(missing.hint.is_some());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "namespace = \"print\"\n").unwrap();
        assert_eq!(resolve_settings(Some(bad), vec![]).unwrap_err().code, EXIT_CONFIG);
    }
}
