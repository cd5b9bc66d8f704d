use super::{
	mean_variance::{m2_to_variance, merge_mean_m2},
	sample::RegressionSample,
	StreamingMetric,
};

/// Added to the magnitude of the label when computing relative error so that labels of zero do not divide by zero.
const RELATIVE_ERROR_EPSILON: f64 = 1e-8;

/// The metrics that can be computed for a regression model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegressionMetric {
	MeanSquaredError,
	RootMeanSquaredError,
	MeanAbsoluteError,
	MeanAbsoluteRelativeError,
	R2,
}

impl RegressionMetric {
	/// Select this metric's value from a finalized `RegressionMetricsOutput`.
	pub fn compute(self, output: &RegressionMetricsOutput) -> f64 {
		match self {
			RegressionMetric::MeanSquaredError => output.mse,
			RegressionMetric::RootMeanSquaredError => output.rmse,
			RegressionMetric::MeanAbsoluteError => output.mae,
			RegressionMetric::MeanAbsoluteRelativeError => output.mare,
			RegressionMetric::R2 => output.r2,
		}
	}
}

impl std::fmt::Display for RegressionMetric {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			RegressionMetric::MeanSquaredError => "MSE",
			RegressionMetric::RootMeanSquaredError => "RMSE",
			RegressionMetric::MeanAbsoluteError => "MAE",
			RegressionMetric::MeanAbsoluteRelativeError => "MARE",
			RegressionMetric::R2 => "R2",
		};
		write!(f, "{}", s)
	}
}

pub struct RegressionMetrics {
	mean_variance: Option<MeanVariance>,
	absolute_error: f64,
	squared_error: f64,
	relative_error: f64,
}

#[derive(Debug)]
struct MeanVariance {
	pub n: u64,
	pub m2: f64,
	pub mean: f64,
}

#[derive(Debug)]
pub struct RegressionMetricsOutput {
	pub n_examples: u64,
	pub mse: f64,
	pub rmse: f64,
	pub mae: f64,
	/// The mean of `|label - prediction| / (|label| + 1e-8)`.
	pub mare: f64,
	pub r2: f64,
}

impl Default for RegressionMetrics {
	fn default() -> Self {
		Self {
			mean_variance: None,
			absolute_error: 0.0,
			squared_error: 0.0,
			relative_error: 0.0,
		}
	}
}

impl RegressionMetrics {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<'a> StreamingMetric<'a> for RegressionMetrics {
	type Input = &'a RegressionSample;
	type Output = RegressionMetricsOutput;

	fn update(&mut self, sample: Self::Input) {
		let RegressionSample { label, prediction } = *sample;
		match &mut self.mean_variance {
			Some(mean_variance) => {
				let (mean, m2) = merge_mean_m2(
					mean_variance.n,
					mean_variance.mean,
					mean_variance.m2,
					1,
					label,
					0.0,
				);
				mean_variance.n += 1;
				mean_variance.mean = mean;
				mean_variance.m2 = m2;
			}
			None => {
				self.mean_variance = Some(MeanVariance {
					n: 1,
					mean: label,
					m2: 0.0,
				})
			}
		}
		let absolute_error = (label - prediction).abs();
		self.absolute_error += absolute_error;
		self.squared_error += absolute_error * absolute_error;
		self.relative_error += absolute_error / (label.abs() + RELATIVE_ERROR_EPSILON);
	}

	fn finalize(self) -> Self::Output {
		let (n_examples, variance) = match self.mean_variance {
			Some(m) => (m.n, m2_to_variance(m.m2, m.n)),
			None => (0, f64::NAN),
		};
		let n = n_examples as f64;
		let mae = self.absolute_error / n;
		let mse = self.squared_error / n;
		let rmse = mse.sqrt();
		let mare = self.relative_error / n;
		let r2 = 1.0 - self.squared_error / (variance * n);
		RegressionMetricsOutput {
			n_examples,
			mse,
			rmse,
			mae,
			mare,
			r2,
		}
	}
}

#[test]
fn test_regression() {
	let samples = [(3.0, 2.5), (-0.5, 0.0), (2.0, 2.0), (7.0, 8.0)];
	let mut metrics = RegressionMetrics::new();
	for &(label, prediction) in samples.iter() {
		metrics.update(&RegressionSample { label, prediction });
	}
	let output = metrics.finalize();
	assert_eq!(output.n_examples, 4);
	assert!((output.mse - 0.375).abs() < 1e-12);
	assert!((output.rmse - 0.375f64.sqrt()).abs() < 1e-12);
	assert!((output.mae - 0.5).abs() < 1e-12);
	let mare = (0.5 / (3.0 + 1e-8) + 0.5 / (0.5 + 1e-8) + 0.0 + 1.0 / (7.0 + 1e-8)) / 4.0;
	assert!((output.mare - mare).abs() < 1e-12);
	// the labels have a variance of 7.296875
	assert!((output.r2 - (1.0 - 1.5 / (7.296875 * 4.0))).abs() < 1e-9);
	assert_eq!(
		RegressionMetric::MeanAbsoluteError.compute(&output),
		output.mae
	);
}

#[test]
fn test_relative_error_of_zero_label() {
	let mut metrics = RegressionMetrics::new();
	metrics.update(&RegressionSample {
		label: 0.0,
		prediction: 1e-8,
	});
	let output = metrics.finalize();
	assert!((output.mare - 1.0).abs() < 1e-12);
}

#[test]
fn test_empty() {
	let output = RegressionMetrics::new().finalize();
	assert_eq!(output.n_examples, 0);
	assert!(output.mse.is_nan());
	assert!(output.mae.is_nan());
}
