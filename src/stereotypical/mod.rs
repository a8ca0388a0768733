use crate::data_handler::Dataset;
use crate::errors::MetricError;
use crate::frequency::{contingency_table, ContingencyTable};
use crate::metrics::StereotypicalMetric;
pub(crate) mod statistics;

pub use statistics::{chi2_contingency, ChiSquaredTest};

impl StereotypicalMetric {
    pub fn evaluate(&self, table: &ContingencyTable) -> f64 {
        use statistics as stats;
        match self {
            Self::CramersV => stats::cramers_v(table),
            Self::TschuprowsT => stats::tschuprows_t(table),
            Self::PearsonsC => stats::pearsons_c(table),
            Self::TheilsU => stats::theils_u(table),
            Self::TheilsUReverse => stats::theils_u(&transpose(table)),
            Self::NormalizedMutualInformation => stats::normalized_mutual_information(table),
            Self::ChiSquaredPValue => chi2_contingency(table, true).p_value,
        }
    }

    pub fn compute(&self, dataset: &Dataset, x: &str, y: &str) -> Result<f64, MetricError> {
        // the reverse direction is the forward formula with the attributes swapped
        if let Self::TheilsUReverse = self {
            return Self::TheilsU.compute(dataset, y, x);
        }
        Ok(self.evaluate(&contingency_table(dataset, x, y)?))
    }
}

fn transpose(table: &ContingencyTable) -> ContingencyTable {
    let counts = (0..table.columns.len())
        .map(|j| table.counts.iter().map(|row| row[j]).collect())
        .collect();
    ContingencyTable {
        rows: table.columns.clone(),
        columns: table.rows.clone(),
        counts,
    }
}

/// p-value of the chi-squared test of independence between `x` and `y`.
pub fn chisq(dataset: &Dataset, x: &str, y: &str) -> Result<f64, MetricError> {
    StereotypicalMetric::ChiSquaredPValue.compute(dataset, x, y)
}

pub fn cramers_v(dataset: &Dataset, x: &str, y: &str) -> Result<f64, MetricError> {
    StereotypicalMetric::CramersV.compute(dataset, x, y)
}

pub fn tschuprows_t(dataset: &Dataset, x: &str, y: &str) -> Result<f64, MetricError> {
    StereotypicalMetric::TschuprowsT.compute(dataset, x, y)
}

pub fn pearsons_c(dataset: &Dataset, x: &str, y: &str) -> Result<f64, MetricError> {
    StereotypicalMetric::PearsonsC.compute(dataset, x, y)
}

pub fn theils_u(dataset: &Dataset, x: &str, y: &str) -> Result<f64, MetricError> {
    StereotypicalMetric::TheilsU.compute(dataset, x, y)
}

pub fn theils_u_reverse(dataset: &Dataset, x: &str, y: &str) -> Result<f64, MetricError> {
    StereotypicalMetric::TheilsUReverse.compute(dataset, x, y)
}

pub fn nmi(dataset: &Dataset, x: &str, y: &str) -> Result<f64, MetricError> {
    StereotypicalMetric::NormalizedMutualInformation.compute(dataset, x, y)
}

#[cfg(feature = "python")]
pub(crate) mod py_api {
    use super::*;
    use crate::python::dataset_from_columns;
    use pyo3::{exceptions::PyValueError, prelude::*};
    use std::collections::HashMap;

    #[pyfunction]
    #[pyo3(signature = (data, x, y, symbol))]
    pub fn stereotypical_metric(
        data: HashMap<String, Vec<String>>,
        x: String,
        y: String,
        symbol: String,
    ) -> PyResult<f64> {
        let Ok(metric) = StereotypicalMetric::try_from(symbol.as_str()) else {
            return Err(PyValueError::new_err(format!(
                "Unknown stereotypical metric '{symbol}'"
            )));
        };
        let dataset = dataset_from_columns(data)?;
        Ok(metric.compute(&dataset, &x, &y)?)
    }
}

#[cfg(test)]
mod stereotypical_tests {
    use super::*;

    fn skewed_pairs() -> Dataset {
        Dataset::new()
            .with_column("x", ["a", "a", "a", "b", "b", "c", "c", "c", "c"])
            .unwrap()
            .with_column("y", [1, 1, 2, 2, 2, 1, 3, 3, 3])
            .unwrap()
    }

    #[test]
    fn test_theils_u_reverse_swaps_arguments() {
        let ds = skewed_pairs();
        let reverse = theils_u_reverse(&ds, "x", "y").unwrap();
        let forward = theils_u(&ds, "y", "x").unwrap();
        assert_eq!(reverse, forward);

        let table = contingency_table(&ds, "x", "y").unwrap();
        let transposed = StereotypicalMetric::TheilsUReverse.evaluate(&table);
        assert!((transposed - forward).abs() < 1e-12);
    }

    #[test]
    fn test_scalar_measures_are_bounded() {
        let ds = skewed_pairs();
        for metric in [
            StereotypicalMetric::CramersV,
            StereotypicalMetric::TschuprowsT,
            StereotypicalMetric::PearsonsC,
            StereotypicalMetric::TheilsU,
            StereotypicalMetric::TheilsUReverse,
            StereotypicalMetric::NormalizedMutualInformation,
            StereotypicalMetric::ChiSquaredPValue,
        ] {
            let v = metric.compute(&ds, "x", "y").unwrap();
            assert!((0.0..=1.0).contains(&v), "{metric} out of range: {v}");
        }
    }

    #[test]
    fn test_chisq_independent_attributes() {
        let x: Vec<i32> = (0..100).map(|i| i % 2).collect();
        let y: Vec<i32> = (0..100).map(|i| (i / 2) % 2).collect();
        let ds = Dataset::new()
            .with_column("x", x)
            .unwrap()
            .with_column("y", y)
            .unwrap();
        assert!((chisq(&ds, "x", "y").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_second_attribute() {
        assert!(matches!(
            cramers_v(&skewed_pairs(), "x", "z"),
            Err(MetricError::MissingAttribute(name)) if name == "z"
        ));
    }
}
