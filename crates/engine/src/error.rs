use std::fmt;

/// Lifecycle and setup failures of the host itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// `initialize` called while a runtime already exists.
    AlreadyInitialized,
    /// An operation that needs the runtime ran before `initialize` or after `shutdown`.
    NotInitialized,
    /// Creating the Lua state or installing the host API failed.
    Setup(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "Lua runtime is already initialized"),
            Self::NotInitialized => write!(f, "Lua runtime is not initialized"),
            Self::Setup(msg) => write!(f, "Lua setup error: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

impl From<mlua::Error> for HostError {
    fn from(err: mlua::Error) -> Self {
        Self::Setup(err.to_string())
    }
}

/// Failure arm of ad hoc execution.
///
/// A runtime panic is deliberately not a variant: it is handled by
/// [`crate::PanicHandler`] and never reaches a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The runtime reported a failure with a string payload.
    Lua(String),
    /// The runtime reported a failure without a string payload.
    Unknown,
    /// No runtime exists.
    NotInitialized,
}

impl ScriptError {
    /// Text handed back to callers and written to the log.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lua(msg) => write!(f, "{msg}"),
            Self::Unknown => write!(f, "Unknown Lua error"),
            Self::NotInitialized => write!(f, "{}", HostError::NotInitialized),
        }
    }
}

impl std::error::Error for ScriptError {}

impl From<HostError> for ScriptError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::NotInitialized => Self::NotInitialized,
            other => Self::Lua(other.to_string()),
        }
    }
}
