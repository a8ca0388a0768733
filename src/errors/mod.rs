use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricError {
    #[error("Attribute '{0}' has no observed samples")]
    EmptyInput(String),
    #[error("Attribute '{0}' is not a column of the dataset")]
    MissingAttribute(String),
    #[error("Column '{column}' has {actual} rows, dataset has {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("Malformed dataset records: {0}")]
    MalformedRecords(String),
    #[error("Unable to parse dataset records: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum InvalidMetricError {
    #[error("Representational metrics: {0:?} are not supported")]
    Representational(Vec<String>),
    #[error("Stereotypical metrics: {0:?} are not supported")]
    Stereotypical(Vec<String>),
    #[error("Local stereotypical metrics: {0:?} are not supported")]
    LocalStereotypical(Vec<String>),
}

#[cfg(feature = "python")]
pub(crate) mod py_errors {
    use super::*;
    use pyo3::{exceptions::PyValueError, PyErr};

    impl From<MetricError> for PyErr {
        fn from(err: MetricError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    impl From<InvalidMetricError> for PyErr {
        fn from(err: InvalidMetricError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }
}
