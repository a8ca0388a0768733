use crate::data_handler::Dataset;
use crate::errors::MetricError;
use crate::frequency::{distribution, Distribution};
use crate::metrics::RepresentationalMetric;
use serde::{Deserialize, Serialize};
pub(crate) mod statistics;

pub use statistics::true_diversity;

/// Upper limit used by the complementary transform when none is given.
pub const DEFAULT_SUP_LIMIT: f64 = 1.0;

impl RepresentationalMetric {
    pub fn evaluate(&self, dist: &Distribution) -> f64 {
        use statistics as stats;
        match self {
            Self::Richness => stats::richness(dist),
            Self::Ens => stats::ens(dist),
            Self::Simpsons => stats::simpsons(dist),
            Self::SimpsonsReciprocal => stats::simpsons_reciprocal(dist),
            Self::SimpsonsDiversity => stats::simpsons_diversity(dist),
            Self::ShannonDiversity => stats::shannon_diversity(dist),
            Self::ShannonEvenness => stats::shannon_evenness(dist),
            Self::NormalizedStandardDeviation => stats::nsd(dist),
            Self::ImbalanceRatio => stats::imbalance_ratio(dist),
            Self::BergerParker => stats::berger_parker(dist),
        }
    }

    pub fn compute(&self, dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
        Ok(self.evaluate(&distribution(dataset, x)?))
    }
}

/// Upper limit of a complementary transform: a constant, or another metric evaluated on the
/// same attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SupLimit {
    Constant(f64),
    Metric(RepresentationalMetric),
}

impl Default for SupLimit {
    fn default() -> SupLimit {
        SupLimit::Constant(DEFAULT_SUP_LIMIT)
    }
}

impl SupLimit {
    fn evaluate(&self, dist: &Distribution) -> f64 {
        match self {
            Self::Constant(v) => *v,
            Self::Metric(m) => m.evaluate(dist),
        }
    }
}

/// A single attribute metric as stored in the registries: either a raw formula or one of the
/// reciprocal (`1 / m`) and complementary (`limit - m`) transforms over it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RepresentationalMeasure {
    Raw(RepresentationalMetric),
    Reciprocal(RepresentationalMetric),
    Complementary {
        metric: RepresentationalMetric,
        sup_limit: SupLimit,
    },
}

impl RepresentationalMeasure {
    pub fn evaluate(&self, dist: &Distribution) -> f64 {
        match self {
            Self::Raw(m) => m.evaluate(dist),
            Self::Reciprocal(m) => 1.0 / m.evaluate(dist),
            Self::Complementary { metric, sup_limit } => {
                sup_limit.evaluate(dist) - metric.evaluate(dist)
            }
        }
    }

    pub fn compute(&self, dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
        Ok(self.evaluate(&distribution(dataset, x)?))
    }
}

impl From<RepresentationalMetric> for RepresentationalMeasure {
    fn from(metric: RepresentationalMetric) -> RepresentationalMeasure {
        RepresentationalMeasure::Raw(metric)
    }
}

pub fn richness(dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
    RepresentationalMetric::Richness.compute(dataset, x)
}

pub fn ens(dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
    RepresentationalMetric::Ens.compute(dataset, x)
}

pub fn simpsons(dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
    RepresentationalMetric::Simpsons.compute(dataset, x)
}

pub fn simpsons_reciprocal(dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
    RepresentationalMetric::SimpsonsReciprocal.compute(dataset, x)
}

pub fn simpsons_diversity(dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
    RepresentationalMetric::SimpsonsDiversity.compute(dataset, x)
}

pub fn shannon_diversity(dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
    RepresentationalMetric::ShannonDiversity.compute(dataset, x)
}

pub fn shannon_evenness(dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
    RepresentationalMetric::ShannonEvenness.compute(dataset, x)
}

pub fn nsd(dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
    RepresentationalMetric::NormalizedStandardDeviation.compute(dataset, x)
}

pub fn imbalance_ratio(dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
    RepresentationalMetric::ImbalanceRatio.compute(dataset, x)
}

pub fn berger_parker_index(dataset: &Dataset, x: &str) -> Result<f64, MetricError> {
    RepresentationalMetric::BergerParker.compute(dataset, x)
}

/// True diversity of order `q` of attribute `x`.
pub fn true_diversity_of(dataset: &Dataset, x: &str, q: f64) -> Result<f64, MetricError> {
    Ok(true_diversity(&distribution(dataset, x)?.probabilities, q))
}

pub fn reciprocal(
    dataset: &Dataset,
    x: &str,
    metric: RepresentationalMetric,
) -> Result<f64, MetricError> {
    RepresentationalMeasure::Reciprocal(metric).compute(dataset, x)
}

pub fn complementary(
    dataset: &Dataset,
    x: &str,
    metric: RepresentationalMetric,
    sup_limit: SupLimit,
) -> Result<f64, MetricError> {
    RepresentationalMeasure::Complementary { metric, sup_limit }.compute(dataset, x)
}

#[cfg(feature = "python")]
pub(crate) mod py_api {
    use super::*;
    use crate::metrics::{
        MetricRegistry, REPRESENTATIONAL_AS_BIAS, REPRESENTATIONAL_AS_DIVERSITY,
        REPRESENTATIONAL_METRICS,
    };
    use crate::python::dataset_from_columns;
    use pyo3::{exceptions::PyValueError, prelude::*};
    use std::collections::HashMap;

    pub(crate) fn registry_for(
        kind: &str,
    ) -> PyResult<&'static MetricRegistry<RepresentationalMeasure>> {
        match kind {
            "raw" => Ok(&REPRESENTATIONAL_METRICS),
            "diversity" => Ok(&REPRESENTATIONAL_AS_DIVERSITY),
            "bias" => Ok(&REPRESENTATIONAL_AS_BIAS),
            _ => Err(PyValueError::new_err(format!(
                "Unknown registry '{kind}', expected one of raw, diversity, bias"
            ))),
        }
    }

    #[pyfunction]
    #[pyo3(signature = (data, x, symbol, kind="raw"))]
    pub fn representational_metric(
        data: HashMap<String, Vec<String>>,
        x: String,
        symbol: String,
        kind: &str,
    ) -> PyResult<f64> {
        let registry = registry_for(kind)?;
        let Some(measure) = registry.get(&symbol) else {
            return Err(PyValueError::new_err(format!(
                "Unknown metric '{symbol}' in registry '{kind}'"
            )));
        };
        let dataset = dataset_from_columns(data)?;
        Ok(measure.compute(&dataset, &x)?)
    }
}
