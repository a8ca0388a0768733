use crate::data_handler::Dataset;
use crate::errors::MetricError;
use pyo3::prelude::*;
use std::collections::HashMap;

/// Python hands columns over as `{name: [label, ...]}`.
pub(crate) fn dataset_from_columns(
    data: HashMap<String, Vec<String>>,
) -> Result<Dataset, MetricError> {
    let mut dataset = Dataset::new();
    for (name, values) in data {
        dataset = dataset.with_column(name, values)?;
    }
    Ok(dataset)
}

#[pymodule]
#[pyo3(name = "_dataset_bias_metrics")]
fn dataset_bias_metrics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use crate::local_stereotypical::py_api::local_stereotypical_metric;
    use crate::reporting::py_api::representational_report;
    use crate::representational::py_api::representational_metric;
    use crate::stereotypical::py_api::stereotypical_metric;

    m.add_function(wrap_pyfunction!(representational_metric, m)?)?;
    m.add_function(wrap_pyfunction!(stereotypical_metric, m)?)?;
    m.add_function(wrap_pyfunction!(local_stereotypical_metric, m)?)?;
    m.add_function(wrap_pyfunction!(representational_report, m)?)?;
    Ok(())
}
