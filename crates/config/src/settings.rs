// Host settings
// Loaded from ~/.config/scripthost/settings.toml

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Lua keywords; none of them can name the capability table.
const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if",
    "in", "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Globals the host or the standard library already owns.
const RESERVED_GLOBALS: &[&str] = &[
    "_G", "_VERSION", "Events", "print", "tostring", "tonumber", "pcall", "xpcall", "error",
    "assert", "type", "pairs", "ipairs", "next", "select", "rawget", "rawset", "rawequal",
    "rawlen", "setmetatable", "getmetatable", "require", "package", "coroutine", "table",
    "string", "math", "utf8", "debug", "load", "dofile", "loadfile", "collectgarbage", "io",
    "os",
];

#[derive(Debug)]
pub enum SettingsError {
    /// Settings file could not be read.
    Io(String),
    /// TOML parse / deserialization error.
    Parse(String),
    /// A field holds a value the host cannot use.
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
            Self::Invalid(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Settings for one scripting host instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Asset directories, searched in order. Earlier roots shadow later ones.
    pub asset_roots: Vec<PathBuf>,

    /// Engine-provided initializer, run first during bootstrap.
    pub init_script: String,

    /// User override script, run after the initializer. Usually absent.
    pub user_script: String,

    /// Global name of the capability table exposed to scripts.
    pub namespace: String,

    /// Event fired once bootstrap scripts have run.
    pub boot_event: String,

    /// Force the Lua `debug` library on or off. `None` = debug builds only.
    pub debug_library: Option<bool>,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            asset_roots: vec![PathBuf::from(".")],
            init_script: "lua/init.lua".to_string(),
            user_script: "lua/user.lua".to_string(),
            namespace: "host".to_string(),
            boot_event: "OnGameBoot".to_string(),
            debug_library: None,
        }
    }
}

impl HostSettings {
    /// Parse settings from TOML and validate them.
    pub fn from_toml(input: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            toml::from_str(input).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.asset_roots.is_empty() {
            return Err(SettingsError::Invalid("asset_roots must not be empty".to_string()));
        }
        if self.init_script.trim().is_empty() {
            return Err(SettingsError::Invalid("init_script must not be empty".to_string()));
        }
        if self.user_script.trim().is_empty() {
            return Err(SettingsError::Invalid("user_script must not be empty".to_string()));
        }
        if self.boot_event.trim().is_empty() {
            return Err(SettingsError::Invalid("boot_event must not be empty".to_string()));
        }
        if !is_lua_identifier(&self.namespace) {
            return Err(SettingsError::Invalid(format!(
                "namespace {:?} is not a Lua identifier",
                self.namespace
            )));
        }
        if RESERVED_GLOBALS.contains(&self.namespace.as_str()) {
            return Err(SettingsError::Invalid(format!(
                "namespace {:?} would shadow a standard global",
                self.namespace
            )));
        }
        Ok(())
    }

    /// Whether the Lua `debug` library should be opened.
    pub fn debug_library_enabled(&self) -> bool {
        self.debug_library.unwrap_or(cfg!(debug_assertions))
    }

    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scripthost");
        config_dir.join("settings.toml")
    }

    /// Load settings from an explicit file. Errors are returned, not defaulted.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error loading {}: {}", path.display(), e);
                eprintln!("Using default settings");
                Self::default()
            }
        }
    }
}

fn is_lua_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }
    !LUA_KEYWORDS.contains(&name)
}
