//! Shared vocabulary for the enrichment pipeline: artifact types, the
//! metric registry, version stamps, configuration, and errors.

pub mod config;
pub mod error;
pub mod normalize;
pub mod registry;
pub mod types;
pub mod version;

pub use config::{Config, EnrichPolicy};
pub use normalize::normalize_name;
pub use error::VidlensError;
pub use registry::{MetricDef, MetricRegistry, MetricScope};
pub use types::*;
pub use version::{VersionStamp, CLASSIFIER_VERSION, ENGINE_VERSION};
