//! Result translation.
//!
//! Every protected call ends up here. Failures are logged exactly once and
//! become a [`ScriptError`]; successes keep their values for the caller.

use mlua::MultiValue;

use crate::error::ScriptError;
use crate::runtime::{CallOutcome, ErrorPayload, Runtime};

impl From<ErrorPayload> for ScriptError {
    fn from(payload: ErrorPayload) -> Self {
        match payload {
            ErrorPayload::Message(msg) => ScriptError::Lua(msg),
            ErrorPayload::Unknown => ScriptError::Unknown,
        }
    }
}

/// Normalize an outcome, logging on failure.
pub fn check_result(outcome: CallOutcome) -> Result<MultiValue, ScriptError> {
    match outcome {
        CallOutcome::Returned(values) => Ok(values),
        CallOutcome::Failed(payload) => {
            let err = ScriptError::from(payload);
            log_failure(&err);
            Err(err)
        }
    }
}

/// Like [`check_result`], with the first returned value as text.
/// A chunk that returns nothing reads as `nil`.
pub fn check_result_text(runtime: &Runtime, outcome: CallOutcome) -> Result<String, ScriptError> {
    check_result(outcome).map(|values| match values.iter().next() {
        Some(value) => runtime.stringify(value),
        None => "nil".to_string(),
    })
}

fn log_failure(err: &ScriptError) {
    match err {
        ScriptError::Lua(msg) => log::error!("Lua error: {}", msg),
        other => log::error!("{}", other),
    }
}
