use crate::data_handler::Dataset;
use crate::errors::MetricError;
use crate::frequency::{contingency_table, CategoryMatrix, ContingencyTable};
use crate::metrics::LocalStereotypicalMetric;

/// Observed joint probabilities, the independence baseline and both marginals of one table.
/// Every local metric is a cell wise function of these. `independent` marks the cells where
/// `real == expected` holds exactly on the counts, which the float products cannot guarantee.
struct CellInputs {
    real: Vec<Vec<f64>>,
    expected: Vec<Vec<f64>>,
    px: Vec<f64>,
    py: Vec<f64>,
    independent: Vec<Vec<bool>>,
}

impl CellInputs {
    fn from_table(table: &ContingencyTable) -> CellInputs {
        let total = table.total() as u128;
        let row_totals = table.row_totals();
        let column_totals = table.column_totals();
        // n_xy / N == (n_x / N) * (n_y / N)  <=>  n_xy * N == n_x * n_y
        let independent = table
            .counts
            .iter()
            .zip(row_totals.iter())
            .map(|(row, n_x)| {
                row.iter()
                    .zip(column_totals.iter())
                    .map(|(n_xy, n_y)| *n_xy as u128 * total == *n_x as u128 * *n_y as u128)
                    .collect()
            })
            .collect();

        CellInputs {
            real: table.joint(),
            expected: table.expected(),
            px: table.row_marginal(),
            py: table.column_marginal(),
            independent,
        }
    }

    fn map_cells<F>(&self, f: F) -> Vec<Vec<f64>>
    where
        F: Fn(usize, usize) -> f64,
    {
        (0..self.px.len())
            .map(|i| (0..self.py.len()).map(|j| f(i, j)).collect())
            .collect()
    }
}

fn lewontins_d(cells: &CellInputs) -> Vec<Vec<f64>> {
    cells.map_cells(|i, j| {
        if cells.independent[i][j] {
            return 0.0;
        }
        cells.real[i][j] - cells.expected[i][j]
    })
}

fn duchers_z(cells: &CellInputs) -> Vec<Vec<f64>> {
    cells.map_cells(|i, j| {
        if cells.independent[i][j] {
            return 0.0;
        }
        let (px, py) = (cells.px[i], cells.py[j]);
        let expected = cells.expected[i][j];
        let deviation = cells.real[i][j] - expected;
        if deviation > 0.0 {
            deviation / (px.min(py) - expected)
        } else if deviation < 0.0 {
            deviation / (expected - (px + py - 1.0).max(0.0))
        } else {
            0.0
        }
    })
}

fn npmi(cells: &CellInputs) -> Vec<Vec<f64>> {
    cells.map_cells(|i, j| {
        let real = cells.real[i][j];
        let expected = cells.expected[i][j];
        // never observed although the marginals say it should be
        if real == 0.0 && expected > 0.0 {
            return -1.0;
        }
        // a cell holding every sample stays 0 / 0
        if cells.independent[i][j] && real < 1.0 {
            return 0.0;
        }
        (real / expected).ln() / -real.ln()
    })
}

impl LocalStereotypicalMetric {
    pub fn evaluate(&self, table: &ContingencyTable) -> CategoryMatrix {
        let cells = CellInputs::from_table(table);
        let values = match self {
            Self::Npmi => npmi(&cells),
            Self::DuchersZ => duchers_z(&cells),
            Self::LewontinsD => lewontins_d(&cells),
        };
        CategoryMatrix::shaped_like(table, values)
    }

    pub fn compute(
        &self,
        dataset: &Dataset,
        x: &str,
        y: &str,
    ) -> Result<CategoryMatrix, MetricError> {
        Ok(self.evaluate(&contingency_table(dataset, x, y)?))
    }
}

pub fn lewontinsd(dataset: &Dataset, x: &str, y: &str) -> Result<CategoryMatrix, MetricError> {
    LocalStereotypicalMetric::LewontinsD.compute(dataset, x, y)
}

pub fn duchersz(dataset: &Dataset, x: &str, y: &str) -> Result<CategoryMatrix, MetricError> {
    LocalStereotypicalMetric::DuchersZ.compute(dataset, x, y)
}

pub fn npmi_matrix(dataset: &Dataset, x: &str, y: &str) -> Result<CategoryMatrix, MetricError> {
    LocalStereotypicalMetric::Npmi.compute(dataset, x, y)
}

#[cfg(feature = "python")]
pub(crate) mod py_api {
    use super::*;
    use crate::python::dataset_from_columns;
    use numpy::PyArray2;
    use pyo3::{exceptions::PyValueError, prelude::*, types::PyDict};
    use std::collections::HashMap;

    #[pyfunction]
    #[pyo3(signature = (data, x, y, symbol))]
    pub fn local_stereotypical_metric<'py>(
        py: Python<'py>,
        data: HashMap<String, Vec<String>>,
        x: String,
        y: String,
        symbol: String,
    ) -> PyResult<Bound<'py, PyDict>> {
        let Ok(metric) = LocalStereotypicalMetric::try_from(symbol.as_str()) else {
            return Err(PyValueError::new_err(format!(
                "Unknown local stereotypical metric '{symbol}'"
            )));
        };
        let dataset = dataset_from_columns(data)?;
        let matrix = metric.compute(&dataset, &x, &y)?;

        let values = match PyArray2::from_vec2(py, &matrix.values) {
            Ok(array) => array,
            Err(e) => return Err(PyValueError::new_err(e.to_string())),
        };
        let rows: Vec<String> = matrix.rows.iter().map(ToString::to_string).collect();
        let columns: Vec<String> = matrix.columns.iter().map(ToString::to_string).collect();

        let dict = PyDict::new(py);
        dict.set_item("rows", rows)?;
        dict.set_item("columns", columns)?;
        dict.set_item("values", values)?;
        Ok(dict)
    }
}

#[cfg(test)]
mod local_stereotypical_tests {
    use super::*;
    use crate::data_handler::Category;

    fn gendered_roles() -> Dataset {
        // 40 samples: f -> {doctor: 4, nurse: 16}, m -> {doctor: 14, nurse: 6}
        let mut gender = Vec::new();
        let mut role = Vec::new();
        for (g, r, n) in [
            ("f", "doctor", 4),
            ("f", "nurse", 16),
            ("m", "doctor", 14),
            ("m", "nurse", 6),
        ] {
            gender.extend(std::iter::repeat(g).take(n));
            role.extend(std::iter::repeat(r).take(n));
        }
        Dataset::new()
            .with_column("gender", gender)
            .unwrap()
            .with_column("role", role)
            .unwrap()
    }

    #[test]
    fn test_lewontins_d_marginals_cancel() {
        let d = lewontinsd(&gendered_roles(), "gender", "role").unwrap();
        assert_eq!(d.rows, vec![Category::from("f"), Category::from("m")]);
        assert_eq!(
            d.columns,
            vec![Category::from("doctor"), Category::from("nurse")]
        );
        for s in d.row_sums().into_iter().chain(d.column_sums()) {
            assert!(s.abs() < 1e-12);
        }
        // real 0.1, expected 0.5 * 0.45
        let v = d.get(&Category::from("f"), &Category::from("doctor")).unwrap();
        assert!((v - (0.1 - 0.225)).abs() < 1e-12);
    }

    #[test]
    fn test_duchers_z_sign_dependent_normalization() {
        let z = duchersz(&gendered_roles(), "gender", "role").unwrap();
        let neg = z.get(&Category::from("f"), &Category::from("doctor")).unwrap();
        // negative: -0.125 / (0.225 - max(0, 0.5 + 0.45 - 1))
        assert!((neg - (-0.125 / 0.225)).abs() < 1e-12);
        let pos = z.get(&Category::from("f"), &Category::from("nurse")).unwrap();
        // positive: 0.125 / (min(0.5, 0.55) - 0.275)
        assert!((pos - 0.125 / 0.225).abs() < 1e-12);
        assert!(z.values.iter().flatten().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_duchers_z_extremes() {
        let ds = Dataset::new()
            .with_column("x", ["a", "a", "b", "b"])
            .unwrap()
            .with_column("y", ["a", "a", "b", "b"])
            .unwrap();
        let z = duchersz(&ds, "x", "y").unwrap();
        assert_eq!(z.values, vec![vec![1.0, -1.0], vec![-1.0, 1.0]]);
    }

    #[test]
    fn test_npmi_special_cells() {
        let ds = Dataset::new()
            .with_column("x", ["a", "a", "b", "b"])
            .unwrap()
            .with_column("y", ["a", "a", "b", "b"])
            .unwrap();
        let m = npmi_matrix(&ds, "x", "y").unwrap();
        assert_eq!(m.values[0][1], -1.0);
        assert_eq!(m.values[1][0], -1.0);
        // ln(0.5 / 0.25) / -ln(0.5)
        assert!((m.values[0][0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_npmi_independence_is_zero() {
        let x: Vec<i32> = (0..100).map(|i| i % 2).collect();
        let y: Vec<i32> = (0..100).map(|i| (i / 2) % 2).collect();
        let ds = Dataset::new()
            .with_column("x", x)
            .unwrap()
            .with_column("y", y)
            .unwrap();
        let m = npmi_matrix(&ds, "x", "y").unwrap();
        assert!(m.values.iter().flatten().all(|v| *v == 0.0));
    }

    fn uniform_grid(k: i32) -> Dataset {
        // one sample per (x, y) pair
        let x: Vec<i32> = (0..k * k).map(|i| i / k).collect();
        let y: Vec<i32> = (0..k * k).map(|i| i % k).collect();
        Dataset::new()
            .with_column("x", x)
            .unwrap()
            .with_column("y", y)
            .unwrap()
    }

    #[test]
    fn test_uniform_grids_are_exactly_independent() {
        // 1/25 is not representable, so the float products drift on 5x5
        for k in [2, 3, 4, 5, 6, 7] {
            let ds = uniform_grid(k);
            for metric in [npmi_matrix, lewontinsd, duchersz] {
                let m = metric(&ds, "x", "y").unwrap();
                assert_eq!(m.values.len(), k as usize);
                assert!(m.values.iter().flatten().all(|v| *v == 0.0), "k = {k}");
            }
        }
    }

    #[test]
    fn test_duchers_z_zero_deviation_stays_zero() {
        let x: Vec<i32> = (0..100).map(|i| i % 2).collect();
        let y: Vec<i32> = (0..100).map(|i| (i / 2) % 2).collect();
        let ds = Dataset::new()
            .with_column("x", x)
            .unwrap()
            .with_column("y", y)
            .unwrap();
        let z = duchersz(&ds, "x", "y").unwrap();
        assert_eq!(z.values, vec![vec![0.0, 0.0], vec![0.0, 0.0]]);

        // a constant column reproduces its marginal in every cell
        let ds = Dataset::new()
            .with_column("g", ["A", "A", "B", "C", "C", "C"])
            .unwrap()
            .with_column("k", ["z"; 6])
            .unwrap();
        let z = duchersz(&ds, "g", "k").unwrap();
        assert_eq!(z.values, vec![vec![0.0], vec![0.0], vec![0.0]]);
        assert!(z.values.iter().flatten().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_single_cell_npmi_is_nan() {
        let ds = Dataset::new()
            .with_column("x", ["a"; 3])
            .unwrap()
            .with_column("y", ["b"; 3])
            .unwrap();
        let m = npmi_matrix(&ds, "x", "y").unwrap();
        assert!(m.values[0][0].is_nan());
        let d = lewontinsd(&ds, "x", "y").unwrap();
        assert_eq!(d.values[0][0], 0.0);
    }
}
