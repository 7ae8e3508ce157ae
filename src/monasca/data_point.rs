//! Monasca Persister data point classification and projection
//!
//! Converts a metric data point into a typed NGSI entity descriptor plus a
//! map of normalized context attributes. A data point in the canonical
//! schema looks like this:
//!
//! ```json
//! {
//!   "metric": {
//!     "name": "compute.node.cpu.percent",
//!     "value": 42.0,
//!     "value_meta": { "...": "..." },
//!     "dimensions": { "region": "myregion", "resource_id": "node1" }
//!   },
//!   "meta": { "tenantId": "...", "region": "myregion" }
//! }
//! ```
//!
//! Payloads in the historical flat shape are normalized first, see
//! [`super::legacy`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::config::NameMapping;
use crate::error::{ParseError, ParseResult};
use crate::parser::{AttributeMap, ContextParser, EntityDescriptor, EntityType};

use super::legacy::LegacyDataPoint;

/// Reserved dimension holding the region name
pub const DIM_REGION: &str = "region";
/// Transient dimension removed during classification
pub const DIM_TENANT_ID: &str = "tenant_id";
/// Dimension holding the resource identifier
pub const DIM_RESOURCE_ID: &str = "resource_id";
/// Dimension marking a host-service data point
pub const DIM_COMPONENT: &str = "component";
/// Dimension naming the host a service runs on
pub const DIM_HOSTNAME: &str = "hostname";
/// Reserved metric name of the region sanity check
pub const SANITY_CHECK_METRIC: &str = "region.sanity_status";

/// Host part used when a host service carries no hostname dimension
const DEFAULT_HOST_PART: &str = "controller";
/// Value-metadata key holding the nested image/instance properties
const META_PROPERTIES: &str = "properties";
/// Properties sub-field projected as the catalogue id
const PROP_NID: &str = "nid";

/// Dimensions copied as attributes for vm data points
static VM_DIMENSIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(user_id|project_id)$").expect("hardcoded pattern"));

/// Metric data point in the canonical schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPoint {
    /// Metric body
    pub metric: Metric,

    /// Envelope added by the persister
    #[serde(default)]
    pub meta: Meta,
}

/// Metric body of a data point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    /// Metric name
    pub name: String,

    /// Metric value, passed through untouched
    #[serde(default)]
    pub value: Value,

    /// Auxiliary metadata attached to the value; may arrive as a
    /// JSON-encoded string
    #[serde(default)]
    pub value_meta: Option<Value>,

    /// Key/value tags attached to the data point
    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,
}

/// Persister envelope of a data point
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Tenant owning the data point
    #[serde(rename = "tenantId", default)]
    pub tenant_id: Option<String>,

    /// Region the data point was observed in
    #[serde(default)]
    pub region: Option<String>,
}

/// Raw payload in either of the two known schema shapes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDataPoint {
    Canonical(DataPoint),
    Legacy(LegacyDataPoint),
}

/// Data point after classification, ready for attribute projection
#[derive(Debug, Clone)]
pub struct ClassifiedDataPoint {
    /// Entity the data point describes
    pub entity: EntityDescriptor,

    name: String,
    value: Value,
    value_meta: Option<Value>,
    dimensions: BTreeMap<String, String>,
}

impl ClassifiedDataPoint {
    /// Metric name of the underlying data point
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimension map with the reserved region/tenant keys removed
    pub fn dimensions(&self) -> &BTreeMap<String, String> {
        &self.dimensions
    }
}

/// Parser for Monasca Persister data points
///
/// Holds the immutable name mapping table applied during projection. The
/// parser itself is stateless across requests; every call classifies and
/// projects a fresh payload.
#[derive(Debug, Clone, Default)]
pub struct MonascaDataPointParser {
    mapping: NameMapping,
}

impl MonascaDataPointParser {
    /// Create a parser with the given name mapping table
    pub fn new(mapping: NameMapping) -> Self {
        Self { mapping }
    }

    /// Get a reference to the mapping table
    pub fn mapping(&self) -> &NameMapping {
        &self.mapping
    }

    /// Region projection: every metadata key becomes an attribute, except
    /// for the sanity-check metric which emits three fixed attributes and
    /// suppresses the baseline.
    ///
    /// Returns the baseline attribute name, `None` when suppressed.
    fn project_region(
        &self,
        payload: &ClassifiedDataPoint,
        meta: Option<&Map<String, Value>>,
        attrs: &mut AttributeMap,
    ) -> Option<String> {
        if payload.name == SANITY_CHECK_METRIC {
            if let Some(meta) = meta {
                if let Some(status) = meta.get("status") {
                    attrs.insert("sanity_status".to_string(), status.clone());
                }
                if let Some(elapsed) = meta.get("elapsed_time") {
                    attrs.insert("sanity_check_elapsed_time".to_string(), elapsed.clone());
                }
                if let Some(timestamp) = meta.get("timestamp") {
                    attrs.insert(
                        "sanity_check_timestamp".to_string(),
                        Value::String(stringify(timestamp)),
                    );
                }
            }
            return None;
        }

        if let Some(meta) = meta {
            for (key, value) in meta {
                attrs.insert(self.mapping.resolve(key).to_string(), value.clone());
            }
        }
        Some(payload.name.clone())
    }

    /// Image/vm metadata projection: keys become attributes (renamed via
    /// the table), except `properties`: only its `nid` sub-field survives,
    /// as the normalized catalogue id.
    fn project_metadata(&self, meta: Option<&Map<String, Value>>, attrs: &mut AttributeMap) {
        let Some(meta) = meta else { return };
        for (key, value) in meta {
            if key == META_PROPERTIES {
                let nid = decode_nested_object(value)
                    .and_then(|properties| properties.get(PROP_NID).cloned());
                if let Some(nid) = nid {
                    attrs.insert(self.mapping.resolve(PROP_NID).to_string(), nid);
                }
                continue;
            }
            attrs.insert(self.mapping.resolve(key).to_string(), value.clone());
        }
    }

    /// Vm dimension projection: the user/project dimensions are copied as
    /// attributes (renamed via the table)
    fn project_vm_dimensions(&self, payload: &ClassifiedDataPoint, attrs: &mut AttributeMap) {
        for (name, value) in &payload.dimensions {
            if VM_DIMENSIONS.is_match(name) {
                attrs.insert(
                    self.mapping.resolve(name).to_string(),
                    Value::String(value.clone()),
                );
            }
        }
    }
}

impl ContextParser for MonascaDataPointParser {
    type Payload = ClassifiedDataPoint;

    /// Decode the request body and classify the data point into one of the
    /// five entity kinds
    ///
    /// # Errors
    /// - `ParseError::Payload` when the body is not a data point in any
    ///   known schema shape
    /// - `ParseError::Classification` when neither the metric name nor the
    ///   dimensions match an entity-type rule
    fn parse_request(&self, body: &str) -> ParseResult<ClassifiedDataPoint> {
        let raw: RawDataPoint = serde_json::from_str(body)?;
        let data_point = match raw {
            RawDataPoint::Canonical(data_point) => data_point,
            RawDataPoint::Legacy(legacy) => legacy.into_canonical(),
        };
        classify(data_point)
    }

    fn get_context_attrs(&self, payload: &ClassifiedDataPoint) -> AttributeMap {
        let mut attrs = AttributeMap::new();
        let meta = decode_value_meta(payload.value_meta.as_ref());

        let baseline = match payload.entity.entity_type {
            EntityType::Region => self.project_region(payload, meta.as_ref(), &mut attrs),
            EntityType::Host => Some(payload.name.clone()),
            EntityType::Image => {
                self.project_metadata(meta.as_ref(), &mut attrs);
                Some(payload.name.clone())
            }
            EntityType::Vm => {
                self.project_vm_dimensions(payload, &mut attrs);
                self.project_metadata(meta.as_ref(), &mut attrs);
                Some(payload.name.clone())
            }
            EntityType::HostService => Some(service_attr_name(&payload.dimensions)),
        };

        if let Some(name) = baseline {
            attrs.insert(
                self.mapping.resolve(&name).to_string(),
                payload.value.clone(),
            );
        }

        attrs
    }
}

/// Classify a data point into an entity descriptor, first match wins
///
/// The reserved `region` dimension (with a fallback to the envelope) and
/// the `tenant_id` dimension are removed here, once; projection sees the
/// dimension map without them.
fn classify(data_point: DataPoint) -> ParseResult<ClassifiedDataPoint> {
    let DataPoint { metric, meta } = data_point;
    let Metric {
        name,
        value,
        value_meta,
        mut dimensions,
    } = metric;

    let region = dimensions
        .remove(DIM_REGION)
        .or(meta.region)
        .unwrap_or_default();
    dimensions.remove(DIM_TENANT_ID);

    let entity = if name.starts_with("region.") {
        EntityDescriptor::new(EntityType::Region, region)
    } else if name.starts_with("compute.node.") {
        let resource = dimensions
            .get(DIM_RESOURCE_ID)
            .map(String::as_str)
            .unwrap_or_default();
        EntityDescriptor::new(
            EntityType::Host,
            format!("{}:{}", region, collapse_duplicate(resource)),
        )
    } else if name == "image" {
        let resource = dimensions
            .get(DIM_RESOURCE_ID)
            .map(String::as_str)
            .unwrap_or_default();
        EntityDescriptor::new(EntityType::Image, format!("{}:{}", region, resource))
    } else if name == "instance" {
        let resource = dimensions
            .get(DIM_RESOURCE_ID)
            .map(String::as_str)
            .unwrap_or_default();
        EntityDescriptor::new(EntityType::Vm, format!("{}:{}", region, resource))
    } else if let Some(component) = dimensions.get(DIM_COMPONENT) {
        let host_part = dimensions
            .get(DIM_HOSTNAME)
            .map(String::as_str)
            .unwrap_or(DEFAULT_HOST_PART);
        EntityDescriptor::new(
            EntityType::HostService,
            format!("{}:{}:{}", region, host_part, component),
        )
    } else {
        return Err(ParseError::Classification);
    };

    Ok(ClassifiedDataPoint {
        entity,
        name,
        value,
        value_meta,
        dimensions,
    })
}

/// Collapse a resource id of the form `X_X` (identical halves joined by a
/// single underscore) to `X`
fn collapse_duplicate(resource_id: &str) -> &str {
    let bytes = resource_id.as_bytes();
    let mid = bytes.len() / 2;
    if bytes.len() >= 3
        && bytes.len() % 2 == 1
        && bytes[mid] == b'_'
        && bytes[..mid] == bytes[mid + 1..]
    {
        // mid sits on the ASCII underscore, so the slice is char-safe
        &resource_id[..mid]
    } else {
        resource_id
    }
}

/// Baseline attribute name for a host service: the component dimension
/// with hyphens replaced by underscores
fn service_attr_name(dimensions: &BTreeMap<String, String>) -> String {
    dimensions
        .get(DIM_COMPONENT)
        .map(|component| component.replace('-', "_"))
        .unwrap_or_default()
}

/// Best-effort decode of the value metadata
///
/// Accepts an object directly or a JSON-encoded string (legacy payloads).
/// Anything malformed is treated as absent, never an error.
fn decode_value_meta(value_meta: Option<&Value>) -> Option<Map<String, Value>> {
    decode_nested_object(value_meta?)
}

/// Best-effort decode of a nested sub-object that may arrive JSON-encoded
/// as a string; decode failures are swallowed
fn decode_nested_object(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => {
                tracing::debug!("Discarding non-object nested metadata");
                None
            }
            Err(err) => {
                tracing::debug!(error = %err, "Discarding undecodable nested metadata");
                None
            }
        },
        _ => None,
    }
}

/// String coercion for metadata values: strings stay as-is, everything
/// else uses its JSON representation
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
