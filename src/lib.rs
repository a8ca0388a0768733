//! Bias and diversity metrics over the categorical attributes of a dataset.
//!
//! Three families are provided. Representational metrics summarise how imbalanced a single
//! attribute is, stereotypical metrics reduce the association between two attributes to one
//! scalar, and local stereotypical metrics score every category pair of two attributes. Each
//! family is also exposed as a registry keyed by the metric's usual symbol so callers can compute
//! everything in one pass:
//!
//! ```
//! use dataset_bias_metrics::{Dataset, REPRESENTATIONAL_METRICS};
//!
//! let ds = Dataset::new()
//!     .with_column("gender", ["f", "f", "f", "m"])
//!     .unwrap();
//! for (symbol, metric) in REPRESENTATIONAL_METRICS.iter() {
//!     let value = metric.compute(&ds, "gender").unwrap();
//!     println!("{symbol}: {value}");
//! }
//! ```
//!
//! Degenerate inputs, such as an attribute with a single observed category, produce NaN rather
//! than an error so that batch computations always run to completion.

pub mod data_handler;
pub mod errors;
pub mod frequency;
pub mod local_stereotypical;
pub mod metrics;
pub mod reporting;
pub mod representational;
pub mod stereotypical;

#[cfg(feature = "python")]
mod python;

pub use data_handler::{Category, Dataset};
pub use errors::{InvalidMetricError, MetricError};
pub use frequency::{
    contingency_table, distribution, CategoryMatrix, ContingencyTable, Distribution,
    PROBABILITY_TOLERANCE,
};
pub use metrics::{
    LocalStereotypicalMetric, MetricFamily, MetricRegistry, RepresentationalMetric,
    StereotypicalMetric, FULL_LOCAL_STEREOTYPICAL_METRICS, FULL_REPRESENTATIONAL_METRICS,
    FULL_STEREOTYPICAL_METRICS, LOCAL_STEREOTYPICAL_METRICS, REPRESENTATIONAL_AS_BIAS,
    REPRESENTATIONAL_AS_DIVERSITY, REPRESENTATIONAL_METRICS, STEREOTYPICAL_METRICS,
};
pub use reporting::{
    local_stereotypical_report, representational_report, stereotypical_report, MetricTable,
};
pub use representational::{RepresentationalMeasure, SupLimit, DEFAULT_SUP_LIMIT};
