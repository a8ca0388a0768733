use crate::frequency::Distribution;

/// Hill number of order `q` over a probability vector. `q == 1` is the Shannon limit and is
/// evaluated in closed form, the general expression is singular there.
pub fn true_diversity(probabilities: &[f64], q: f64) -> f64 {
    if q == 1.0 {
        shannon_entropy(probabilities).exp()
    } else {
        probabilities
            .iter()
            .map(|p| p.powf(q))
            .sum::<f64>()
            .powf(1.0 / (1.0 - q))
    }
}

// observed categories only, so every p > 0
fn shannon_entropy(probabilities: &[f64]) -> f64 {
    -probabilities.iter().map(|p| p * p.ln()).sum::<f64>()
}

pub fn richness(dist: &Distribution) -> f64 {
    dist.n_categories() as f64
}

pub fn ens(dist: &Distribution) -> f64 {
    true_diversity(&dist.probabilities, 1.0)
}

pub fn simpsons(dist: &Distribution) -> f64 {
    1.0 / true_diversity(&dist.probabilities, 2.0)
}

pub fn simpsons_reciprocal(dist: &Distribution) -> f64 {
    true_diversity(&dist.probabilities, 2.0)
}

pub fn simpsons_diversity(dist: &Distribution) -> f64 {
    1.0 - 1.0 / true_diversity(&dist.probabilities, 2.0)
}

pub fn shannon_diversity(dist: &Distribution) -> f64 {
    if dist.n_categories() == 1 {
        return 0.0;
    }
    shannon_entropy(&dist.probabilities)
}

pub fn shannon_evenness(dist: &Distribution) -> f64 {
    let n = shannon_entropy(&dist.probabilities);
    let d = (dist.n_categories() as f64).ln();
    if n == 0.0 && d == 0.0 {
        return f64::NAN;
    }
    n / d
}

/// Population standard deviation of the proportions, scaled by `k / sqrt(k - 1)` so that the
/// most skewed distribution over `k` categories scores 1.
pub fn nsd(dist: &Distribution) -> f64 {
    let k = dist.n_categories();
    if k == 1 {
        return f64::NAN;
    }
    let k = k as f64;
    let mean = dist.probabilities.iter().sum::<f64>() / k;
    let variance = dist
        .probabilities
        .iter()
        .map(|p| (p - mean).powi(2))
        .sum::<f64>()
        / k;
    variance.sqrt() * k / (k - 1.0).sqrt()
}

pub fn imbalance_ratio(dist: &Distribution) -> f64 {
    let max = dist.counts.iter().copied().max().unwrap_or(0);
    let min = dist.counts.iter().copied().min().unwrap_or(0);
    max as f64 / min as f64
}

pub fn berger_parker(dist: &Distribution) -> f64 {
    let max = dist.counts.iter().copied().max().unwrap_or(0);
    max as f64 / dist.total() as f64
}

#[cfg(test)]
mod representational_statistics_tests {
    use super::*;
    use crate::data_handler::Category;

    fn dist_from_counts(counts: &[usize]) -> Distribution {
        let values: Vec<Category> = counts
            .iter()
            .enumerate()
            .flat_map(|(i, n)| std::iter::repeat(Category::Integer(i as i64)).take(*n))
            .collect();
        Distribution::from_values("g", &values).unwrap()
    }

    #[test]
    fn test_true_diversity_limit_at_one() {
        let p = [0.5, 0.3, 0.15, 0.05];
        let closed = true_diversity(&p, 1.0);
        let below = true_diversity(&p, 0.999999);
        let above = true_diversity(&p, 1.000001);
        assert!((closed - below).abs() < 1e-5);
        assert!((closed - above).abs() < 1e-5);
    }

    #[test]
    fn test_true_diversity_uniform_equals_richness() {
        let p = [0.25; 4];
        assert!((true_diversity(&p, 1.0) - 4.0).abs() < 1e-12);
        assert!((true_diversity(&p, 2.0) - 4.0).abs() < 1e-12);
        assert!((true_diversity(&p, 0.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_simpsons_family_consistency() {
        let dist = dist_from_counts(&[8, 2]);
        // sum p^2 = 0.68
        assert!((simpsons(&dist) - 0.68).abs() < 1e-12);
        assert!((simpsons_reciprocal(&dist) - 1.0 / simpsons(&dist)).abs() < 1e-12);
        assert!((simpsons_diversity(&dist) - (1.0 - simpsons(&dist))).abs() < 1e-12);
    }

    #[test]
    fn test_counts_based_indices() {
        let dist = dist_from_counts(&[8, 2]);
        assert_eq!(richness(&dist), 2.0);
        assert!((berger_parker(&dist) - 0.8).abs() < 1e-12);
        assert!((imbalance_ratio(&dist) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_shannon_and_evenness() {
        let even = dist_from_counts(&[5, 5, 5]);
        assert!((shannon_diversity(&even) - 3_f64.ln()).abs() < 1e-12);
        assert!((shannon_evenness(&even) - 1.0).abs() < 1e-12);
        assert!((ens(&even) - 3.0).abs() < 1e-12);

        let skewed = dist_from_counts(&[9, 1]);
        assert!(shannon_evenness(&skewed) < 1.0);
        assert!(shannon_evenness(&skewed) > 0.0);
    }

    #[test]
    fn test_single_category_degeneracies() {
        let single = dist_from_counts(&[5]);
        assert_eq!(shannon_diversity(&single), 0.0);
        assert!(shannon_evenness(&single).is_nan());
        assert!(nsd(&single).is_nan());
        assert_eq!(richness(&single), 1.0);
        assert!((ens(&single) - 1.0).abs() < 1e-12);
        assert_eq!(imbalance_ratio(&single), 1.0);
    }

    #[test]
    fn test_nsd_bounds() {
        let even = dist_from_counts(&[4, 4, 4, 4]);
        assert!(nsd(&even).abs() < 1e-12);

        // two categories: std of [0.8, 0.2] is 0.3, scaled by 2 / 1
        let skewed = dist_from_counts(&[8, 2]);
        assert!((nsd(&skewed) - 0.6).abs() < 1e-12);
    }
}
