use super::{
	classification::{accuracy, ClassMetrics},
	confusion_matrix::ConfusionMatrix,
	sample::BinarySample,
	StreamingMetric,
};

/// Samples with a probability greater than or equal to this value are predicted positive.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// `BinaryClassificationMetrics` accumulates a 2x2 confusion matrix where index 0 is the negative class and index 1 is the positive class.
pub struct BinaryClassificationMetrics {
	confusion_matrix: ConfusionMatrix,
	threshold: f64,
}

#[derive(Debug)]
pub struct BinaryClassificationMetricsOutput {
	pub confusion_matrix: ConfusionMatrix,
	pub true_positives: u64,
	pub false_positives: u64,
	pub true_negatives: u64,
	pub false_negatives: u64,
	pub accuracy: f64,
	pub precision: f64,
	pub recall: f64,
	pub f1_score: f64,
}

impl BinaryClassificationMetrics {
	pub fn new(threshold: f64) -> Self {
		Self {
			confusion_matrix: ConfusionMatrix::new(2),
			threshold,
		}
	}
}

impl Default for BinaryClassificationMetrics {
	fn default() -> Self {
		Self::new(DEFAULT_THRESHOLD)
	}
}

impl<'a> StreamingMetric<'a> for BinaryClassificationMetrics {
	type Input = &'a BinarySample;
	type Output = BinaryClassificationMetricsOutput;

	fn update(&mut self, sample: Self::Input) {
		let prediction = sample.probability >= self.threshold;
		self.confusion_matrix
			.accumulate(sample.label as usize, prediction as usize);
	}

	fn finalize(self) -> BinaryClassificationMetricsOutput {
		let confusion_matrix = self.confusion_matrix;
		let ClassMetrics {
			true_positives,
			false_positives,
			true_negatives,
			false_negatives,
			precision,
			recall,
			f1_score,
		} = ClassMetrics::from_confusion_matrix(&confusion_matrix, 1);
		let accuracy = accuracy(&confusion_matrix);
		BinaryClassificationMetricsOutput {
			confusion_matrix,
			true_positives,
			false_positives,
			true_negatives,
			false_negatives,
			accuracy,
			precision,
			recall,
			f1_score,
		}
	}
}

#[test]
fn test_binary() {
	let samples = [
		(true, 0.9),
		(true, 0.5),
		(true, 0.49),
		(false, 0.7),
		(false, 0.2),
		(false, 0.1),
		(false, 0.0),
		(true, 1.0),
	];
	let mut metrics = BinaryClassificationMetrics::default();
	for &(label, probability) in samples.iter() {
		metrics.update(&BinarySample { label, probability });
	}
	let output = metrics.finalize();
	assert_eq!(output.true_positives, 3);
	assert_eq!(output.false_positives, 1);
	assert_eq!(output.true_negatives, 3);
	assert_eq!(output.false_negatives, 1);
	assert_eq!(output.confusion_matrix.n_examples(), 8);
	assert!((output.accuracy - 0.75).abs() < f64::EPSILON);
	assert!((output.precision - 0.75).abs() < f64::EPSILON);
	assert!((output.recall - 0.75).abs() < f64::EPSILON);
	assert!((output.f1_score - 0.75).abs() < f64::EPSILON);
}

#[test]
fn test_binary_no_positive_predictions() {
	let mut metrics = BinaryClassificationMetrics::new(0.95);
	for &(label, probability) in [(true, 0.9), (false, 0.1)].iter() {
		metrics.update(&BinarySample { label, probability });
	}
	let output = metrics.finalize();
	assert_eq!(output.precision, 0.0);
	assert_eq!(output.recall, 0.0);
	assert_eq!(output.f1_score, 0.0);
	assert!((output.accuracy - 0.5).abs() < f64::EPSILON);
}
