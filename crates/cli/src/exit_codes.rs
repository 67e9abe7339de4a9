//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `shost` exit codes.
//! Scripts wrapping `shost` rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | General error (unspecified)                      |
//! | 2    | Usage error (bad arguments)                      |
//! | 3    | Settings could not be read, parsed or validated  |
//! | 4    | A script snippet failed                          |
//! | 5    | Terminal or filesystem IO failed                 |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - host setup failed or another unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown console command.
pub const EXIT_USAGE: u8 = 2;

/// Settings file unreadable, malformed, or invalid.
pub const EXIT_CONFIG: u8 = 3;

/// At least one `--exec` snippet (or the `exec` code) raised a script error.
pub const EXIT_SCRIPT: u8 = 4;

/// Reading stdin or writing stdout failed.
pub const EXIT_IO: u8 = 5;
