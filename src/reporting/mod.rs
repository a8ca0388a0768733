use crate::data_handler::Dataset;
use crate::errors::MetricError;
use crate::frequency::{contingency_table, distribution, CategoryMatrix};
use crate::metrics::{LocalStereotypicalMetric, MetricRegistry, StereotypicalMetric, StringLike};
use crate::representational::RepresentationalMeasure;
use log::{debug, trace};
use serde::Serialize;

/// Labelled result table of a batch computation, one row per attribute (or attribute pair) and
/// one column per metric symbol. Undefined results stay in the table as NaN and serialize to
/// JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTable {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl MetricTable {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.row_labels.iter().position(|r| r == row)?;
        let j = self.column_labels.iter().position(|c| c == column)?;
        Some(self.values[i][j])
    }

    pub fn to_json(&self) -> Result<String, MetricError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn log_cell(row: &str, symbol: &str, value: f64) {
    if value.is_nan() {
        debug!("metric {symbol} undefined for {row}");
    } else {
        trace!("metric {symbol} for {row}: {value}");
    }
}

/// Evaluates every registry entry on every attribute. The distribution of each attribute is
/// extracted once and shared by all entries.
pub fn representational_report<S>(
    dataset: &Dataset,
    attributes: &[S],
    registry: &MetricRegistry<RepresentationalMeasure>,
) -> Result<MetricTable, MetricError>
where
    S: StringLike,
{
    let mut values: Vec<Vec<f64>> = Vec::with_capacity(attributes.len());
    for x in attributes {
        let dist = distribution(dataset, x.as_ref())?;
        let row: Vec<f64> = registry
            .iter()
            .map(|(symbol, measure)| {
                let value = measure.evaluate(&dist);
                log_cell(x.as_ref(), symbol, value);
                value
            })
            .collect();
        values.push(row);
    }

    Ok(MetricTable {
        row_labels: attributes.iter().map(ToString::to_string).collect(),
        column_labels: registry.symbols().into_iter().map(String::from).collect(),
        values,
    })
}

/// Evaluates every registry entry on every `(x, y)` pair. Rows are labelled `x|y`.
pub fn stereotypical_report<S>(
    dataset: &Dataset,
    pairs: &[(S, S)],
    registry: &MetricRegistry<StereotypicalMetric>,
) -> Result<MetricTable, MetricError>
where
    S: StringLike,
{
    let mut row_labels: Vec<String> = Vec::with_capacity(pairs.len());
    let mut values: Vec<Vec<f64>> = Vec::with_capacity(pairs.len());
    for (x, y) in pairs {
        let label = format!("{}|{}", x.as_ref(), y.as_ref());
        let table = contingency_table(dataset, x.as_ref(), y.as_ref())?;
        let row: Vec<f64> = registry
            .iter()
            .map(|(symbol, metric)| {
                let value = metric.evaluate(&table);
                log_cell(&label, symbol, value);
                value
            })
            .collect();
        row_labels.push(label);
        values.push(row);
    }

    Ok(MetricTable {
        row_labels,
        column_labels: registry.symbols().into_iter().map(String::from).collect(),
        values,
    })
}

/// One matrix per registry entry for the pair `(x, y)`, in registry order.
pub fn local_stereotypical_report(
    dataset: &Dataset,
    x: &str,
    y: &str,
    registry: &MetricRegistry<LocalStereotypicalMetric>,
) -> Result<Vec<(&'static str, CategoryMatrix)>, MetricError> {
    let table = contingency_table(dataset, x, y)?;
    let report = registry
        .iter()
        .map(|(symbol, metric)| {
            let matrix = metric.evaluate(&table);
            let undefined = matrix.values.iter().flatten().filter(|v| v.is_nan()).count();
            if undefined > 0 {
                debug!("metric {symbol} undefined for {undefined} cells of {x}|{y}");
            }
            (symbol, matrix)
        })
        .collect();
    Ok(report)
}

#[cfg(feature = "python")]
pub(crate) mod py_api {
    use super::*;
    use crate::python::dataset_from_columns;
    use crate::representational::py_api::registry_for;
    use pyo3::{prelude::*, types::PyDict};
    use std::collections::HashMap;

    #[pyfunction]
    #[pyo3(signature = (data, attributes, kind="raw"))]
    pub fn representational_report<'py>(
        py: Python<'py>,
        data: HashMap<String, Vec<String>>,
        attributes: Vec<String>,
        kind: &str,
    ) -> PyResult<Bound<'py, PyDict>> {
        let registry = registry_for(kind)?;
        let dataset = dataset_from_columns(data)?;
        let table = super::representational_report(&dataset, &attributes, registry)?;

        let dict = PyDict::new(py);
        for (attribute, row) in table.row_labels.iter().zip(table.values.iter()) {
            let metrics = PyDict::new(py);
            for (symbol, value) in table.column_labels.iter().zip(row.iter()) {
                metrics.set_item(symbol, *value)?;
            }
            dict.set_item(attribute, metrics)?;
        }
        Ok(dict)
    }
}
