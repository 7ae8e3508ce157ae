//! Parser for Nagios `check_http` plugin output
//!
//! Sample outputs from the plugin:
//!
//! ```text
//! HTTP OK: HTTP/1.1 200 OK - 108168 bytes in 0.070 second response time |time=1.794274s;...
//! HTTP WARNING: HTTP/1.1 200 OK - 108168 bytes in 5.783 second response time |time=1.783226s;...
//! CRITICAL - Socket timeout after 10 seconds
//! ```
//!
//! The `status` attribute is whatever text precedes the first `:` or `-`
//! delimiter once the literal `HTTP` is stripped. Unrecognized text passes
//! through verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseResult;
use crate::parser::{AttributeMap, ContextParser};

use super::{PluginOutput, STATUS_ATTR};

/// Delimiter ending the status portion of the first line
static STATUS_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[:-]").expect("hardcoded pattern"));

/// Parser for `check_http` plugin output
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckHttpParser;

impl ContextParser for CheckHttpParser {
    type Payload = PluginOutput;

    fn parse_request(&self, body: &str) -> ParseResult<PluginOutput> {
        Ok(PluginOutput::from_body(body))
    }

    fn get_context_attrs(&self, payload: &PluginOutput) -> AttributeMap {
        let status = STATUS_DELIMITER
            .splitn(&payload.first_line, 2)
            .next()
            .unwrap_or_default()
            .replacen("HTTP", "", 1)
            .trim()
            .to_string();

        AttributeMap::from([(STATUS_ATTR.to_string(), serde_json::Value::String(status))])
    }
}
