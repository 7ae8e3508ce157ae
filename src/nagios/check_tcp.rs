//! Parser for Nagios `check_tcp` plugin output
//!
//! Sample outputs from the plugin:
//!
//! ```text
//! TCP OK - 0.000 second response time on port 80|time=0.000222s;;;0.000000;10.000000
//! TCP WARNING - 0.057 second response time on port 5666|time=0.056678s;0.003000;;...
//! TCP CRITICAL - 0.057 second response time on port 5666|time=0.056597s;;0.003000;...
//! No route to host
//! ```
//!
//! The `status` attribute is whatever text precedes the first `-` delimiter
//! once the literal `TCP` is stripped. Free-text failure lines that don't
//! follow the structured format (e.g. connectivity errors) normalize to
//! `CRITICAL`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseResult;
use crate::parser::{AttributeMap, ContextParser};

use super::{PluginOutput, STATUS_ATTR, STATUS_LEVELS};

/// Delimiter ending the status portion of the first line
static STATUS_DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-").expect("hardcoded pattern"));

/// Parser for `check_tcp` plugin output
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckTcpParser;

impl ContextParser for CheckTcpParser {
    type Payload = PluginOutput;

    fn parse_request(&self, body: &str) -> ParseResult<PluginOutput> {
        Ok(PluginOutput::from_body(body))
    }

    fn get_context_attrs(&self, payload: &PluginOutput) -> AttributeMap {
        let status = STATUS_DELIMITER
            .splitn(&payload.first_line, 2)
            .next()
            .unwrap_or_default()
            .replacen("TCP", "", 1)
            .trim()
            .to_string();

        let status = if STATUS_LEVELS.contains(&status.as_str()) {
            status
        } else {
            "CRITICAL".to_string()
        };

        AttributeMap::from([(STATUS_ATTR.to_string(), serde_json::Value::String(status))])
    }
}
