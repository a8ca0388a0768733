use crate::data_handler::{Category, Dataset};
use crate::errors::MetricError;
use ahash::{HashMap, HashMapExt};
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that a probability vector sums to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Observed categories of one attribute, their counts, and the normalized probabilities. Only
/// categories present in the data appear, sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub categories: Vec<Category>,
    pub counts: Vec<usize>,
    pub probabilities: Vec<f64>,
}

impl Distribution {
    pub fn from_values(attribute: &str, values: &[Category]) -> Result<Distribution, MetricError> {
        if values.is_empty() {
            return Err(MetricError::EmptyInput(attribute.to_string()));
        }

        let mut tally: HashMap<&Category, usize> = HashMap::new();
        for value in values {
            *tally.entry(value).or_insert(0) += 1;
        }

        let mut pairs: Vec<(&Category, usize)> = tally.into_iter().collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let total = values.len() as f64;
        let categories: Vec<Category> = pairs.iter().map(|(c, _)| (*c).clone()).collect();
        let counts: Vec<usize> = pairs.iter().map(|(_, n)| *n).collect();
        let probabilities: Vec<f64> = counts.iter().map(|n| *n as f64 / total).collect();
        debug_assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < PROBABILITY_TOLERANCE);

        Ok(Distribution {
            categories,
            counts,
            probabilities,
        })
    }

    pub fn n_categories(&self) -> usize {
        self.categories.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Cross tabulation of two attributes. Rows follow the sorted categories of `x`, columns the
/// sorted categories of `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    pub rows: Vec<Category>,
    pub columns: Vec<Category>,
    pub counts: Vec<Vec<usize>>,
}

impl ContingencyTable {
    pub fn from_values(
        x_name: &str,
        x_values: &[Category],
        y_name: &str,
        y_values: &[Category],
    ) -> Result<ContingencyTable, MetricError> {
        if x_values.is_empty() {
            return Err(MetricError::EmptyInput(x_name.to_string()));
        }
        if y_values.is_empty() {
            return Err(MetricError::EmptyInput(y_name.to_string()));
        }
        if x_values.len() != y_values.len() {
            return Err(MetricError::ColumnLengthMismatch {
                column: y_name.to_string(),
                expected: x_values.len(),
                actual: y_values.len(),
            });
        }

        let rows = sorted_unique(x_values);
        let columns = sorted_unique(y_values);
        let row_idx: HashMap<&Category, usize> =
            rows.iter().enumerate().map(|(i, c)| (c, i)).collect();
        let col_idx: HashMap<&Category, usize> =
            columns.iter().enumerate().map(|(j, c)| (c, j)).collect();

        let mut counts = vec![vec![0_usize; columns.len()]; rows.len()];
        for (x, y) in x_values.iter().zip(y_values.iter()) {
            counts[row_idx[x]][col_idx[y]] += 1;
        }

        Ok(ContingencyTable {
            rows,
            columns,
            counts,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<usize> {
        let mut totals = vec![0_usize; self.columns.len()];
        for row in &self.counts {
            for (j, n) in row.iter().enumerate() {
                totals[j] += n;
            }
        }
        totals
    }

    /// Joint probabilities `p(x, y)`.
    pub fn joint(&self) -> Vec<Vec<f64>> {
        let total = self.total() as f64;
        self.counts
            .iter()
            .map(|row| row.iter().map(|n| *n as f64 / total).collect())
            .collect()
    }

    /// Row marginal `p(x)`.
    pub fn row_marginal(&self) -> Vec<f64> {
        let total = self.total() as f64;
        self.row_totals()
            .into_iter()
            .map(|n| n as f64 / total)
            .collect()
    }

    /// Column marginal `p(y)`.
    pub fn column_marginal(&self) -> Vec<f64> {
        let total = self.total() as f64;
        self.column_totals()
            .into_iter()
            .map(|n| n as f64 / total)
            .collect()
    }

    /// Independence baseline `p(x) * p(y)` for every cell.
    pub fn expected(&self) -> Vec<Vec<f64>> {
        let px = self.row_marginal();
        let py = self.column_marginal();
        px.iter()
            .map(|a| py.iter().map(|b| a * b).collect())
            .collect()
    }
}

/// Per category pair result of a local stereotypical metric, shaped like the contingency table
/// it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatrix {
    pub rows: Vec<Category>,
    pub columns: Vec<Category>,
    pub values: Vec<Vec<f64>>,
}

impl CategoryMatrix {
    pub(crate) fn shaped_like(table: &ContingencyTable, values: Vec<Vec<f64>>) -> CategoryMatrix {
        debug_assert_eq!(values.len(), table.rows.len());
        CategoryMatrix {
            rows: table.rows.clone(),
            columns: table.columns.clone(),
            values,
        }
    }

    pub fn get(&self, x: &Category, y: &Category) -> Option<f64> {
        let i = self.rows.binary_search(x).ok()?;
        let j = self.columns.binary_search(y).ok()?;
        Some(self.values[i][j])
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.values.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_sums(&self) -> Vec<f64> {
        (0..self.columns.len())
            .map(|j| self.values.iter().map(|row| row[j]).sum())
            .collect()
    }
}

fn sorted_unique(values: &[Category]) -> Vec<Category> {
    let mut unique: Vec<Category> = values.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique
}

pub fn distribution(dataset: &Dataset, x: &str) -> Result<Distribution, MetricError> {
    let values = dataset.column(x)?;
    Distribution::from_values(x, values)
}

pub fn contingency_table(
    dataset: &Dataset,
    x: &str,
    y: &str,
) -> Result<ContingencyTable, MetricError> {
    let x_values = dataset.column(x)?;
    let y_values = dataset.column(y)?;
    ContingencyTable::from_values(x, x_values, y, y_values)
}
