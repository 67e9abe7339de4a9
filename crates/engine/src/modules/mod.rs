//! Capability modules installed under the host namespace.
//!
//! - `log`: leveled logging with `{}` placeholders
//! - `render`: text drawing through the host renderer
//! - `message`: in-game broadcast (a plain function, not a table)

pub mod log;
pub mod message;
pub mod render;
