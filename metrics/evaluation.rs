/*!
This module drives the accumulators over all of one model's samples and turns the finalized outputs into [`MetricResult`](../struct.MetricResult.html)s for comparison with other models.
*/

use super::{
	auc_roc::AucRoc,
	binary_classification::{BinaryClassificationMetrics, BinaryClassificationMetricsOutput},
	binary_cross_entropy::BinaryCrossEntropy,
	classification::{MulticlassClassificationMetrics, MulticlassClassificationMetricsOutput},
	comparison::{ComparisonMetric, MetricResult},
	cross_entropy::CrossEntropy,
	regression::{RegressionMetric, RegressionMetrics, RegressionMetricsOutput},
	sample::{BinarySample, MulticlassSample, RegressionSample},
	StreamingMetric,
};

/// The metrics reported for a multiclass model. Precision, recall and F1 are macro averaged.
pub const MULTICLASS_METRICS: &[ComparisonMetric] = &[
	ComparisonMetric::CrossEntropy,
	ComparisonMetric::Accuracy,
	ComparisonMetric::Precision,
	ComparisonMetric::Recall,
	ComparisonMetric::F1Score,
];

/// The metrics reported for a binary model. Precision, recall and F1 are for the positive class.
pub const BINARY_METRICS: &[ComparisonMetric] = &[
	ComparisonMetric::BinaryCrossEntropy,
	ComparisonMetric::Accuracy,
	ComparisonMetric::Precision,
	ComparisonMetric::Recall,
	ComparisonMetric::F1Score,
	ComparisonMetric::AucRoc,
];

#[derive(Debug)]
pub struct MulticlassEvaluation {
	pub classification: MulticlassClassificationMetricsOutput,
	/// `None` if there were no samples.
	pub cross_entropy: Option<f64>,
}

impl MulticlassEvaluation {
	/// Panics if a sample has more than `n_classes` classes.
	pub fn compute(samples: &[MulticlassSample], n_classes: usize) -> Self {
		let mut classification = MulticlassClassificationMetrics::new(n_classes);
		let mut cross_entropy = CrossEntropy::new();
		for sample in samples {
			classification.update(sample);
			cross_entropy.update(sample);
		}
		Self {
			classification: classification.finalize(),
			cross_entropy: cross_entropy.finalize(),
		}
	}

	pub fn metric_results(&self, model: &str) -> Vec<MetricResult> {
		MULTICLASS_METRICS
			.iter()
			.map(|&metric| {
				let value = match metric {
					ComparisonMetric::CrossEntropy => self.cross_entropy.unwrap_or(f64::NAN),
					ComparisonMetric::Accuracy => self.classification.accuracy,
					ComparisonMetric::Precision => self.classification.precision_unweighted,
					ComparisonMetric::Recall => self.classification.recall_unweighted,
					ComparisonMetric::F1Score => self.classification.f1_score_unweighted,
					_ => f64::NAN,
				};
				metric_result(model, metric, value)
			})
			.collect()
	}
}

#[derive(Debug)]
pub struct BinaryEvaluation {
	pub classification: BinaryClassificationMetricsOutput,
	/// `None` if there were no samples.
	pub binary_cross_entropy: Option<f64>,
	pub auc_roc: f64,
}

impl BinaryEvaluation {
	/// Samples with a probability of at least `threshold` are predicted positive.
	pub fn compute(samples: &[BinarySample], threshold: f64) -> Self {
		let mut classification = BinaryClassificationMetrics::new(threshold);
		let mut binary_cross_entropy = BinaryCrossEntropy::new();
		let mut auc_roc = AucRoc::new();
		for sample in samples {
			classification.update(sample);
			binary_cross_entropy.update(sample);
			auc_roc.update(sample);
		}
		Self {
			classification: classification.finalize(),
			binary_cross_entropy: binary_cross_entropy.finalize(),
			auc_roc: auc_roc.finalize(),
		}
	}

	pub fn metric_results(&self, model: &str) -> Vec<MetricResult> {
		BINARY_METRICS
			.iter()
			.map(|&metric| {
				let value = match metric {
					ComparisonMetric::BinaryCrossEntropy => {
						self.binary_cross_entropy.unwrap_or(f64::NAN)
					}
					ComparisonMetric::Accuracy => self.classification.accuracy,
					ComparisonMetric::Precision => self.classification.precision,
					ComparisonMetric::Recall => self.classification.recall,
					ComparisonMetric::F1Score => self.classification.f1_score,
					ComparisonMetric::AucRoc => self.auc_roc,
					_ => f64::NAN,
				};
				metric_result(model, metric, value)
			})
			.collect()
	}
}

#[derive(Debug)]
pub struct RegressionEvaluation {
	pub metrics: RegressionMetricsOutput,
}

impl RegressionEvaluation {
	pub fn compute(samples: &[RegressionSample]) -> Self {
		let mut metrics = RegressionMetrics::new();
		for sample in samples {
			metrics.update(sample);
		}
		Self {
			metrics: metrics.finalize(),
		}
	}

	pub fn metric_results(&self, model: &str, metrics: &[RegressionMetric]) -> Vec<MetricResult> {
		metrics
			.iter()
			.map(|&metric| metric_result(model, metric.into(), metric.compute(&self.metrics)))
			.collect()
	}
}

/// Results for a model whose predictions could not be read. Every metric gets the worst possible value and is marked as not evaluated, so [`compare_models`](fn.compare_models.html) never chooses the model over one that was evaluated.
pub fn failed_metric_results(model: &str, metrics: &[ComparisonMetric]) -> Vec<MetricResult> {
	metrics
		.iter()
		.map(|&metric| MetricResult {
			model: model.to_owned(),
			metric,
			value: metric.direction().worst(),
			evaluated: false,
		})
		.collect()
}

fn metric_result(model: &str, metric: ComparisonMetric, value: f64) -> MetricResult {
	MetricResult {
		model: model.to_owned(),
		metric,
		value,
		evaluated: true,
	}
}

#[test]
fn test_multiclass_evaluation() {
	let samples: Vec<MulticlassSample> = vec![
		(1, vec![1.0, 0.0, 0.0, 0.0, 0.0]),
		(2, vec![0.1, 0.6, 0.1, 0.1, 0.1]),
		(5, vec![0.2, 0.2, 0.2, 0.2, 0.2]),
		(3, vec![0.0, 0.0, 0.5, 0.5, 0.0]),
	]
	.into_iter()
	.map(|(label, probabilities)| MulticlassSample::new(label, probabilities).unwrap())
	.collect();
	let evaluation = MulticlassEvaluation::compute(&samples, 5);
	let confusion_matrix = &evaluation.classification.confusion_matrix;
	assert_eq!(confusion_matrix.n_examples(), 4);
	assert_eq!(confusion_matrix.count(4, 0), 1);
	assert_eq!(confusion_matrix.count(2, 2), 1);
	assert!((evaluation.classification.accuracy - 0.75).abs() < f64::EPSILON);
	let expected = (0.0 - 0.6f64.ln() - 0.2f64.ln() - 0.5f64.ln()) / 4.0;
	assert!((evaluation.cross_entropy.unwrap() - expected).abs() < 1e-12);
	let results = evaluation.metric_results("model.csv");
	let metrics: Vec<_> = results.iter().map(|result| result.metric).collect();
	assert_eq!(metrics, MULTICLASS_METRICS);
	assert!(results.iter().all(|result| result.model == "model.csv"));
}

#[test]
fn test_binary_evaluation() {
	let samples: Vec<BinarySample> = [(true, 0.9), (true, 0.8), (false, 0.2), (false, 0.1)]
		.iter()
		.map(|&(label, probability)| BinarySample { label, probability })
		.collect();
	let evaluation = BinaryEvaluation::compute(&samples, 0.5);
	assert!((evaluation.auc_roc - 1.0).abs() < f64::EPSILON);
	assert!((evaluation.classification.accuracy - 1.0).abs() < f64::EPSILON);
	let expected = (-(0.9f64.ln()) - 0.8f64.ln() - 0.8f64.ln() - 0.9f64.ln()) / 4.0;
	assert!((evaluation.binary_cross_entropy.unwrap() - expected).abs() < 1e-12);
	let results = evaluation.metric_results("model_1.csv");
	assert_eq!(results.len(), BINARY_METRICS.len());
	assert_eq!(results[5].metric, ComparisonMetric::AucRoc);
	assert!((results[5].value - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_regression_evaluation() {
	let samples = [
		RegressionSample {
			label: 1.0,
			prediction: 2.0,
		},
		RegressionSample {
			label: 2.0,
			prediction: 2.0,
		},
	];
	let evaluation = RegressionEvaluation::compute(&samples);
	let results = evaluation.metric_results(
		"model_2",
		&[
			RegressionMetric::MeanSquaredError,
			RegressionMetric::MeanAbsoluteError,
		],
	);
	assert_eq!(results.len(), 2);
	assert_eq!(
		results[0].metric,
		ComparisonMetric::Regression(RegressionMetric::MeanSquaredError)
	);
	assert!((results[0].value - 0.5).abs() < f64::EPSILON);
	assert!((results[1].value - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_failed_metric_results() {
	let results = failed_metric_results("model_3.csv", BINARY_METRICS);
	assert_eq!(results[0].value, f64::MAX);
	assert_eq!(results[1].value, f64::MIN);
	assert!(results.iter().all(|result| !result.evaluated));
}
