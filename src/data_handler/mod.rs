use crate::errors::MetricError;
use ahash::{HashMap, HashMapExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single observed value of a categorical attribute. Boolean labels order before integer
/// labels, integer labels before text labels, and each kind orders naturally within itself. This
/// fixes the row/column order of every table derived from a dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Category {
        Category::Text(value.to_string())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Category {
        Category::Text(value)
    }
}

impl From<bool> for Category {
    fn from(value: bool) -> Category {
        Category::Bool(value)
    }
}

impl From<i64> for Category {
    fn from(value: i64) -> Category {
        Category::Integer(value)
    }
}

impl From<i32> for Category {
    fn from(value: i32) -> Category {
        Category::Integer(value as i64)
    }
}

impl TryFrom<&Value> for Category {
    type Error = MetricError;
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Category::Text(s.clone())),
            Value::Bool(b) => Ok(Category::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(v) => Ok(Category::Integer(v)),
                None => Err(MetricError::MalformedRecords(format!(
                    "non integer numeric label {n}"
                ))),
            },
            other => Err(MetricError::MalformedRecords(format!(
                "unsupported label {other}"
            ))),
        }
    }
}

/// Columnar view of the samples: one column per attribute, one row per sample. Every column has
/// the same length. Metrics only ever borrow from it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: HashMap<String, Vec<Category>>,
    n_rows: usize,
}

impl Dataset {
    pub fn new() -> Dataset {
        Dataset::default()
    }

    pub fn with_column<S, I, V>(mut self, name: S, values: I) -> Result<Dataset, MetricError>
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Category>,
    {
        let name: String = name.into();
        let values: Vec<Category> = values.into_iter().map(Into::into).collect();

        if self.columns.is_empty() {
            self.n_rows = values.len();
        } else if values.len() != self.n_rows {
            return Err(MetricError::ColumnLengthMismatch {
                column: name,
                expected: self.n_rows,
                actual: values.len(),
            });
        }

        self.columns.insert(name, values);
        Ok(self)
    }

    /// Builds a dataset from a JSON array of flat objects, e.g.
    /// `[{"gender": "f", "age": 30}, {"gender": "m", "age": 41}]`. Every record must carry the
    /// same keys, and every value must be a string, an integer or a boolean. An empty array
    /// carries no keys, so it yields a dataset without attributes and every metric on it fails
    /// with `MissingAttribute`. A column that exists but holds no rows fails with `EmptyInput`.
    pub fn from_json_records(records: &str) -> Result<Dataset, MetricError> {
        let parsed: Value = serde_json::from_str(records)?;
        let Value::Array(rows) = parsed else {
            return Err(MetricError::MalformedRecords(
                "expected an array of records".into(),
            ));
        };

        let Some(first) = rows.first() else {
            return Ok(Dataset::new());
        };
        let Value::Object(first) = first else {
            return Err(MetricError::MalformedRecords(
                "record 0 is not an object".into(),
            ));
        };

        let mut columns: HashMap<String, Vec<Category>> = HashMap::with_capacity(first.len());
        for key in first.keys() {
            columns.insert(key.clone(), Vec::with_capacity(rows.len()));
        }

        for (i, row) in rows.iter().enumerate() {
            let Value::Object(row) = row else {
                return Err(MetricError::MalformedRecords(format!(
                    "record {i} is not an object"
                )));
            };
            if row.len() != columns.len() {
                return Err(MetricError::MalformedRecords(format!(
                    "record {i} has {} fields, expected {}",
                    row.len(),
                    columns.len()
                )));
            }
            for (key, value) in row {
                let Some(column) = columns.get_mut(key) else {
                    return Err(MetricError::MalformedRecords(format!(
                        "record {i} has unexpected field '{key}'"
                    )));
                };
                column.push(Category::try_from(value)?);
            }
        }

        Ok(Dataset {
            columns,
            n_rows: rows.len(),
        })
    }

    pub fn column(&self, name: &str) -> Result<&[Category], MetricError> {
        match self.columns.get(name) {
            Some(values) => Ok(values.as_slice()),
            None => Err(MetricError::MissingAttribute(name.to_string())),
        }
    }

    /// Attribute names in sorted order.
    pub fn attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }
}
