//! Parsers for Nagios plugin check output
//!
//! Each parser extracts a single `status` context attribute from the first
//! line of the plugin stdout. Remaining lines (e.g. perf-data) are ignored.
//! Entity identity is owned by the host request, not by the plugin output,
//! so these parsers never produce an entity descriptor.

mod check_http;
mod check_tcp;

pub use check_http::CheckHttpParser;
pub use check_tcp::CheckTcpParser;

/// Context attribute holding the check status
pub(crate) const STATUS_ATTR: &str = "status";

/// Status levels produced by well-formed plugin output
pub(crate) const STATUS_LEVELS: [&str; 3] = ["OK", "WARNING", "CRITICAL"];

/// Plugin output payload carried between the two parser calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOutput {
    /// First line of the plugin stdout
    pub first_line: String,
}

impl PluginOutput {
    /// Keep only the first line of the raw body
    pub(crate) fn from_body(body: &str) -> Self {
        Self {
            first_line: body.lines().next().unwrap_or_default().to_string(),
        }
    }
}
