//! JSON output for scripts driving the terminal

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;

/// Envelope around every JSON payload
#[derive(Serialize)]
pub struct JsonOutput<'a, T: ?Sized> {
    pub data: &'a T,
    pub meta: Metadata,
}

/// When and by which build the payload was produced
#[derive(Debug, Serialize)]
pub struct Metadata {
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

impl<'a, T: ?Sized> JsonOutput<'a, T> {
    pub fn new(data: &'a T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now(),
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

/// Pretty-printed JSON wrapped in the `{data, meta}` envelope
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonOutput::new(data))?)
}
