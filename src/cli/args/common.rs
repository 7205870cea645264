//! Common CLI types shared across commands

use crate::client::ClockOutStatus;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - human-optimized colored text
    #[default]
    Pretty,
    /// JSON format - structured for scripts
    Json,
}

/// Work-order state reported at clock-out
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClockOutStatusArg {
    /// The work order is finished
    Complete,
    /// Work will continue later
    Incomplete,
}

impl From<ClockOutStatusArg> for ClockOutStatus {
    fn from(arg: ClockOutStatusArg) -> Self {
        match arg {
            ClockOutStatusArg::Complete => ClockOutStatus::Complete,
            ClockOutStatusArg::Incomplete => ClockOutStatus::Incomplete,
        }
    }
}
