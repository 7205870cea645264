//! Shared CLI argument types

mod common;
mod global;

pub use common::{ClockOutStatusArg, OutputFormat};
pub use global::GlobalOptions;
