//! Parser contract shared by the NGSI adapter plugins
//!
//! Every plugin exposes the same two-call contract to the host adapter:
//! [`ContextParser::parse_request`] decodes the transport-level body and
//! classifies it, [`ContextParser::get_context_attrs`] projects the decoded
//! payload into NGSI context attributes. The two calls are sequential for a
//! single request; no state is shared across requests.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::config::NameMapping;
use crate::error::ParseResult;
use crate::monasca::MonascaDataPointParser;
use crate::nagios::{CheckHttpParser, CheckTcpParser};

/// Mapping from NGSI attribute names to their values
///
/// Values are passed through from the payload untouched; a `BTreeMap` keeps
/// serialized output deterministic.
pub type AttributeMap = BTreeMap<String, serde_json::Value>;

/// Normalized identity kind of a monitored resource
///
/// The set is closed: every data point maps to exactly one of these kinds
/// or fails classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// An OpenStack region as a whole
    Region,
    /// A compute node
    Host,
    /// A VM image in the catalogue
    Image,
    /// A VM instance
    Vm,
    /// A service component running on a host
    HostService,
}

impl EntityType {
    /// Returns the NGSI entity type string
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Region => "region",
            EntityType::Host => "host",
            EntityType::Image => "image",
            EntityType::Vm => "vm",
            EntityType::HostService => "host_service",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for EntityType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "region" => Ok(EntityType::Region),
            "host" => Ok(EntityType::Host),
            "image" => Ok(EntityType::Image),
            "vm" => Ok(EntityType::Vm),
            "host_service" => Ok(EntityType::HostService),
            other => Err(serde::de::Error::custom(format!(
                "unknown entity type '{}', expected one of: region, host, image, vm, host_service",
                other
            ))),
        }
    }
}

/// Normalized identity assigned to a monitored resource
///
/// `entity_id` is a colon-delimited composite key; embedded colons in its
/// components are not escaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Entity kind
    #[serde(rename = "entityType")]
    pub entity_type: EntityType,

    /// Composite key, stable for the same logical resource
    #[serde(rename = "entityId")]
    pub entity_id: String,
}

impl EntityDescriptor {
    /// Create a descriptor from a kind and a pre-built id
    pub fn new(entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type,
            entity_id: entity_id.into(),
        }
    }
}

/// Two-call contract between the host adapter and a parser plugin
///
/// `get_context_attrs` is pure and assumed to be called only after a
/// successful `parse_request` on the same payload; repeated calls yield an
/// identical map.
pub trait ContextParser {
    /// Decoded payload carried between the two calls
    type Payload;

    /// Decode the transport-level body and classify it
    ///
    /// # Errors
    /// Fails when the body cannot be decoded or classified; projection must
    /// not run after a failure.
    fn parse_request(&self, body: &str) -> ParseResult<Self::Payload>;

    /// Project the decoded payload into NGSI context attributes
    fn get_context_attrs(&self, payload: &Self::Payload) -> AttributeMap;
}

/// Outcome of running one parser over one request body
#[derive(Debug, Clone, Serialize)]
pub struct ContextUpdate {
    /// Entity identity, absent for the plugin-output parsers whose entity
    /// is owned by the host request
    #[serde(flatten)]
    pub entity: Option<EntityDescriptor>,

    /// Projected context attributes
    #[serde(rename = "attributes")]
    pub attrs: AttributeMap,
}

/// Tagged dispatch over the known parser plugins
///
/// Parsers are addressed by their upstream plugin names, e.g. in the host
/// request URL: `monasca_persister_data_point`, `check_http`, `check_tcp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    /// Monasca Persister metric data points
    MonascaPersisterDataPoint,
    /// Nagios `check_http` plugin output
    CheckHttp,
    /// Nagios `check_tcp` plugin output
    CheckTcp,
}

impl ParserKind {
    /// All known parsers, in registration order
    pub const ALL: [ParserKind; 3] = [
        ParserKind::MonascaPersisterDataPoint,
        ParserKind::CheckHttp,
        ParserKind::CheckTcp,
    ];

    /// Returns the upstream plugin name
    pub fn name(&self) -> &'static str {
        match self {
            ParserKind::MonascaPersisterDataPoint => "monasca_persister_data_point",
            ParserKind::CheckHttp => "check_http",
            ParserKind::CheckTcp => "check_tcp",
        }
    }

    /// Run the two-call contract over a single request body
    ///
    /// # Arguments
    /// * `body` - Raw transport-level body (JSON text for metrics, plugin
    ///   stdout for the Nagios checks)
    /// * `mapping` - Name mapping table injected into the metric parser
    ///
    /// # Errors
    /// Fails when the body cannot be decoded or classified.
    pub fn process(&self, body: &str, mapping: &NameMapping) -> ParseResult<ContextUpdate> {
        match self {
            ParserKind::MonascaPersisterDataPoint => {
                let parser = MonascaDataPointParser::new(mapping.clone());
                let payload = parser.parse_request(body)?;
                let attrs = parser.get_context_attrs(&payload);
                Ok(ContextUpdate {
                    entity: Some(payload.entity.clone()),
                    attrs,
                })
            }
            ParserKind::CheckHttp => {
                let parser = CheckHttpParser;
                let payload = parser.parse_request(body)?;
                let attrs = parser.get_context_attrs(&payload);
                Ok(ContextUpdate {
                    entity: None,
                    attrs,
                })
            }
            ParserKind::CheckTcp => {
                let parser = CheckTcpParser;
                let payload = parser.parse_request(body)?;
                let attrs = parser.get_context_attrs(&payload);
                Ok(ContextUpdate {
                    entity: None,
                    attrs,
                })
            }
        }
    }
}

impl std::fmt::Display for ParserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ParserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParserKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown parser '{}', expected one of: {}",
                    s,
                    ParserKind::ALL.map(|kind| kind.name()).join(", ")
                )
            })
    }
}
