//! https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance#Parallel_algorithm

/// Combine two separate means and sums of squared differences into a single mean and sum of squared differences.
pub fn merge_mean_m2(
	n_a: u64,
	mean_a: f64,
	m2_a: f64,
	n_b: u64,
	mean_b: f64,
	m2_b: f64,
) -> (f64, f64) {
	let n_a = n_a as f64;
	let n_b = n_b as f64;
	(
		(((n_a * mean_a) + (n_b * mean_b)) / (n_a + n_b)),
		m2_a + m2_b + (mean_b - mean_a) * (mean_b - mean_a) * (n_a * n_b / (n_a + n_b)),
	)
}

pub fn m2_to_variance(m2: f64, n: u64) -> f64 {
	m2 / n as f64
}

#[test]
fn test_merge_mean_m2() {
	// the values 1, 2, 3, 4 split into two halves
	let (mean, m2) = merge_mean_m2(2, 1.5, 0.5, 2, 3.5, 0.5);
	assert!((mean - 2.5).abs() < f64::EPSILON);
	assert!((m2 - 5.0).abs() < f64::EPSILON);
	assert!((m2_to_variance(m2, 4) - 1.25).abs() < f64::EPSILON);
}
