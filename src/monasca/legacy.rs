//! Adapter for the historical data point shape
//!
//! Early persister versions published data points as a flat
//! `measurement`/`time`/`fields`/`tags` record, with the value metadata
//! dumped as a JSON-encoded string and the region/tenant carried in
//! reserved `_region`/`_tenant_id` tags:
//!
//! ```json
//! {
//!   "measurement": "compute.node.cpu.percent",
//!   "time": "2016-06-10T09:45:00.000000Z",
//!   "fields": { "value": 12.5, "value_meta": "{}" },
//!   "tags": { "resource_id": "node1", "_region": "myregion", "_tenant_id": "t1" }
//! }
//! ```
//!
//! The adapter normalizes that shape into the canonical one before
//! classification, so a single code path and a single mapping table apply
//! downstream. The shape is deprecated; new producers publish the
//! canonical `metric`/`meta` schema.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::data_point::{DataPoint, Meta, Metric};

/// Reserved tag holding the region in the legacy shape
const TAG_REGION: &str = "_region";
/// Reserved tag holding the tenant id in the legacy shape
const TAG_TENANT_ID: &str = "_tenant_id";

/// Data point in the legacy flat shape
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyDataPoint {
    /// Metric name
    pub measurement: String,

    /// Observation timestamp, not used by the mapping
    #[serde(default)]
    pub time: Option<String>,

    /// Metric value and stringified value metadata
    #[serde(default)]
    pub fields: LegacyFields,

    /// Dimensions plus the reserved region/tenant tags
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// `fields` member of a legacy data point
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyFields {
    /// Metric value
    #[serde(default)]
    pub value: Value,

    /// Value metadata dumped as a JSON-encoded string
    #[serde(default)]
    pub value_meta: Option<Value>,
}

impl LegacyDataPoint {
    /// Normalize into the canonical shape
    ///
    /// The reserved tags move to the envelope; everything else carries
    /// over unchanged (the stringified value metadata is decoded later,
    /// during projection).
    pub fn into_canonical(mut self) -> DataPoint {
        let region = self.tags.remove(TAG_REGION);
        let tenant_id = self.tags.remove(TAG_TENANT_ID);

        DataPoint {
            metric: Metric {
                name: self.measurement,
                value: self.fields.value,
                value_meta: self.fields.value_meta,
                dimensions: self.tags,
            },
            meta: Meta { tenant_id, region },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_canonical_moves_reserved_tags() {
        let legacy: LegacyDataPoint = serde_json::from_value(json!({
            "measurement": "compute.node.cpu.percent",
            "time": "2016-06-10T09:45:00.000000Z",
            "fields": { "value": 12.5, "value_meta": "{}" },
            "tags": {
                "resource_id": "node1",
                "_region": "myregion",
                "_tenant_id": "t1"
            }
        }))
        .unwrap();

        let canonical = legacy.into_canonical();
        assert_eq!(canonical.metric.name, "compute.node.cpu.percent");
        assert_eq!(canonical.metric.value, json!(12.5));
        assert_eq!(canonical.meta.region.as_deref(), Some("myregion"));
        assert_eq!(canonical.meta.tenant_id.as_deref(), Some("t1"));
        assert!(!canonical.metric.dimensions.contains_key("_region"));
        assert!(!canonical.metric.dimensions.contains_key("_tenant_id"));
        assert_eq!(
            canonical.metric.dimensions.get("resource_id").map(String::as_str),
            Some("node1")
        );
    }

    #[test]
    fn test_into_canonical_keeps_stringified_value_meta() {
        let legacy: LegacyDataPoint = serde_json::from_value(json!({
            "measurement": "region.pool_ip",
            "fields": { "value": 20, "value_meta": "{\"allocated_ip\": 5}" },
            "tags": { "_region": "myregion" }
        }))
        .unwrap();

        let canonical = legacy.into_canonical();
        assert_eq!(
            canonical.metric.value_meta,
            Some(json!("{\"allocated_ip\": 5}"))
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let legacy: LegacyDataPoint = serde_json::from_value(json!({
            "measurement": "region.used_ip",
            "tags": { "_region": "myregion" }
        }))
        .unwrap();
        assert!(legacy.time.is_none());

        let canonical = legacy.into_canonical();
        assert_eq!(canonical.metric.value, Value::Null);
        assert!(canonical.metric.value_meta.is_none());
    }
}
