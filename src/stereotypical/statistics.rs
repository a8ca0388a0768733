use crate::frequency::ContingencyTable;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Pearson chi-squared test of independence over a contingency table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquaredTest {
    pub statistic: f64,
    pub dof: usize,
    pub p_value: f64,
}

/// Chi-squared test of independence. With `correction`, Yates' continuity correction is applied
/// when the table has exactly one degree of freedom. A table with no degrees of freedom (one row
/// or one column) has statistic 0 and p-value 1.
pub fn chi2_contingency(table: &ContingencyTable, correction: bool) -> ChiSquaredTest {
    let (n_rows, n_cols) = table.shape();
    let dof = (n_rows - 1) * (n_cols - 1);
    if dof == 0 {
        return ChiSquaredTest {
            statistic: 0.0,
            dof,
            p_value: 1.0,
        };
    }

    let total = table.total() as f64;
    let row_totals = table.row_totals();
    let col_totals = table.column_totals();
    let yates = correction && dof == 1;

    let mut statistic = 0_f64;
    for (i, row) in table.counts.iter().enumerate() {
        for (j, observed) in row.iter().enumerate() {
            let expected = row_totals[i] as f64 * col_totals[j] as f64 / total;
            let mut observed = *observed as f64;
            if yates {
                let diff = expected - observed;
                observed += diff.signum() * diff.abs().min(0.5);
            }
            statistic += (observed - expected).powi(2) / expected;
        }
    }

    let p_value = match ChiSquared::new(dof as f64) {
        Ok(dist) => dist.sf(statistic),
        Err(_) => f64::NAN,
    };

    ChiSquaredTest {
        statistic,
        dof,
        p_value,
    }
}

/// Mean square contingency `chi2 / n`, using the continuity corrected statistic.
fn phi_squared(table: &ContingencyTable) -> f64 {
    chi2_contingency(table, true).statistic / table.total() as f64
}

fn has_degenerate_axis(table: &ContingencyTable) -> bool {
    let (n_rows, n_cols) = table.shape();
    n_rows.min(n_cols) == 1
}

pub fn cramers_v(table: &ContingencyTable) -> f64 {
    if has_degenerate_axis(table) {
        return f64::NAN;
    }
    let (n_rows, n_cols) = table.shape();
    let k = (n_rows - 1).min(n_cols - 1) as f64;
    (phi_squared(table) / k).sqrt()
}

pub fn tschuprows_t(table: &ContingencyTable) -> f64 {
    if has_degenerate_axis(table) {
        return f64::NAN;
    }
    let (n_rows, n_cols) = table.shape();
    let k = (((n_rows - 1) * (n_cols - 1)) as f64).sqrt();
    (phi_squared(table) / k).sqrt()
}

pub fn pearsons_c(table: &ContingencyTable) -> f64 {
    let phi2 = phi_squared(table);
    (phi2 / (1.0 + phi2)).sqrt()
}

/// Uncertainty coefficient `U(X|Y)`: the share of the entropy of the row attribute explained by
/// the column attribute.
pub fn theils_u(table: &ContingencyTable) -> f64 {
    let total = table.total() as f64;
    let col_totals = table.column_totals();

    let hx = -table
        .row_marginal()
        .iter()
        .map(|p| p * p.ln())
        .sum::<f64>();

    let mut hxy = 0_f64;
    for row in &table.counts {
        for (j, n) in row.iter().enumerate() {
            if *n == 0 {
                continue;
            }
            let joint = *n as f64 / total;
            let conditional = *n as f64 / col_totals[j] as f64;
            hxy -= joint * conditional.ln();
        }
    }

    if hx - hxy == 0.0 && hx == 0.0 {
        return f64::NAN;
    }
    (hx - hxy) / hx
}

/// Mutual information normalized by the joint entropy. Empty cells add nothing to either sum.
pub fn normalized_mutual_information(table: &ContingencyTable) -> f64 {
    let joint = table.joint();
    let expected = table.expected();

    let mut numerator = 0_f64;
    let mut denominator = 0_f64;
    for (real_row, expected_row) in joint.iter().zip(expected.iter()) {
        for (real, expected) in real_row.iter().zip(expected_row.iter()) {
            if *real == 0.0 {
                continue;
            }
            numerator += real * (real / expected).ln();
            denominator += real * real.ln();
        }
    }
    numerator / -denominator
}

#[cfg(test)]
mod stereotypical_statistics_tests {
    use super::*;
    use crate::data_handler::Category;

    fn table_from_counts(counts: Vec<Vec<usize>>) -> ContingencyTable {
        let rows = (0..counts.len() as i64).map(Category::Integer).collect();
        let columns = (0..counts[0].len() as i64).map(Category::Integer).collect();
        ContingencyTable {
            rows,
            columns,
            counts,
        }
    }

    #[test]
    fn test_chi2_without_correction_matches_hand_computation() {
        // expected counts are all 25, deviations of 5
        let table = table_from_counts(vec![vec![30, 20], vec![20, 30]]);
        let test = chi2_contingency(&table, false);
        assert_eq!(test.dof, 1);
        assert!((test.statistic - 4.0).abs() < 1e-12);
        // upper tail of chi2(1) at 4.0
        assert!((test.p_value - 0.045500263896358).abs() < 1e-9);
    }

    #[test]
    fn test_chi2_yates_correction() {
        let table = table_from_counts(vec![vec![30, 20], vec![20, 30]]);
        let test = chi2_contingency(&table, true);
        // |o - e| shrinks from 5 to 4.5
        assert!((test.statistic - 4.0 * 4.5 * 4.5 / 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_chi2_no_correction_above_one_dof() {
        let table = table_from_counts(vec![vec![10, 0, 5], vec![0, 10, 5]]);
        assert_eq!(
            chi2_contingency(&table, true),
            chi2_contingency(&table, false)
        );
        assert_eq!(chi2_contingency(&table, true).dof, 2);
    }

    #[test]
    fn test_chi2_degenerate_table() {
        let table = table_from_counts(vec![vec![3, 7, 1]]);
        let test = chi2_contingency(&table, true);
        assert_eq!(test.dof, 0);
        assert_eq!(test.statistic, 0.0);
        assert_eq!(test.p_value, 1.0);
    }

    #[test]
    fn test_association_measures() {
        let table = table_from_counts(vec![vec![50, 0], vec![0, 50]]);
        // Yates: o - e = 24.5 in every cell, chi2 = 96.04
        assert!((cramers_v(&table) - 0.98).abs() < 1e-12);
        assert!((tschuprows_t(&table) - 0.98).abs() < 1e-12);
        let phi2 = 0.9604_f64;
        assert!((pearsons_c(&table) - (phi2 / (1.0 + phi2)).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_axis_is_nan() {
        let table = table_from_counts(vec![vec![4], vec![6]]);
        assert!(cramers_v(&table).is_nan());
        assert!(tschuprows_t(&table).is_nan());
        assert_eq!(pearsons_c(&table), 0.0);
    }

    #[test]
    fn test_theils_u_bounds() {
        let perfect = table_from_counts(vec![vec![50, 0], vec![0, 50]]);
        assert!((theils_u(&perfect) - 1.0).abs() < 1e-12);

        let independent = table_from_counts(vec![vec![25, 25], vec![25, 25]]);
        assert!(theils_u(&independent).abs() < 1e-12);

        // x constant: no uncertainty to explain
        let constant = table_from_counts(vec![vec![3, 7]]);
        assert!(theils_u(&constant).is_nan());
    }

    #[test]
    fn test_theils_u_is_asymmetric() {
        // y fully determines x, x only partly determines y
        let table = table_from_counts(vec![vec![10, 10, 0], vec![0, 0, 20]]);
        assert!((theils_u(&table) - 1.0).abs() < 1e-12);
        let transposed = table_from_counts(vec![vec![10, 0], vec![10, 0], vec![0, 20]]);
        assert!(theils_u(&transposed) < 1.0);
    }

    #[test]
    fn test_nmi() {
        let perfect = table_from_counts(vec![vec![50, 0], vec![0, 50]]);
        assert!((normalized_mutual_information(&perfect) - 1.0).abs() < 1e-12);

        let independent = table_from_counts(vec![vec![25, 25], vec![25, 25]]);
        assert!(normalized_mutual_information(&independent).abs() < 1e-12);

        let single = table_from_counts(vec![vec![9]]);
        assert!(normalized_mutual_information(&single).is_nan());
    }
}
