//! Monasca Persister data point parser
//!
//! Classifies a metric data point into an NGSI entity and projects it into
//! normalized context attributes.
//!
//! # Example
//!
//! ```ignore
//! use rngsi_adapter::config::NameMapping;
//! use rngsi_adapter::monasca::MonascaDataPointParser;
//! use rngsi_adapter::parser::ContextParser;
//!
//! let parser = MonascaDataPointParser::new(NameMapping::default());
//! let payload = parser.parse_request(body)?;
//! let attrs = parser.get_context_attrs(&payload);
//! ```

mod data_point;
mod legacy;

pub use data_point::{
    ClassifiedDataPoint, DataPoint, Meta, Metric, MonascaDataPointParser, DIM_COMPONENT,
    DIM_HOSTNAME, DIM_REGION, DIM_RESOURCE_ID, DIM_TENANT_ID, SANITY_CHECK_METRIC,
};
pub use legacy::{LegacyDataPoint, LegacyFields};
