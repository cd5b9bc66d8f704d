use super::{
	confusion_matrix::{argmax, ConfusionMatrix},
	sample::MulticlassSample,
	StreamingMetric,
};

/// `tp / (tp + fp)`, or 0 when the model never predicted the class.
pub fn precision(true_positives: u64, false_positives: u64) -> f64 {
	let predicted = true_positives + false_positives;
	if predicted == 0 {
		0.0
	} else {
		true_positives as f64 / predicted as f64
	}
}

/// `tp / (tp + fn)`, or 0 when the class never occurred.
pub fn recall(true_positives: u64, false_negatives: u64) -> f64 {
	let actual = true_positives + false_negatives;
	if actual == 0 {
		0.0
	} else {
		true_positives as f64 / actual as f64
	}
}

/// The harmonic mean of precision and recall, or 0 when both are 0.
pub fn f1_score(precision: f64, recall: f64) -> f64 {
	if precision + recall == 0.0 {
		0.0
	} else {
		2.0 * precision * recall / (precision + recall)
	}
}

/// The proportion of examples on the diagonal of the confusion matrix. This is NaN when the matrix is empty.
pub fn accuracy(confusion_matrix: &ConfusionMatrix) -> f64 {
	confusion_matrix.n_correct() as f64 / confusion_matrix.n_examples() as f64
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassMetrics {
	pub true_positives: u64,
	pub false_positives: u64,
	pub true_negatives: u64,
	pub false_negatives: u64,
	pub precision: f64,
	pub recall: f64,
	pub f1_score: f64,
}

impl ClassMetrics {
	/// Compute the one-vs-rest metrics for the class at `class_index`.
	pub fn from_confusion_matrix(confusion_matrix: &ConfusionMatrix, class_index: usize) -> Self {
		let true_positives = confusion_matrix.true_positives(class_index);
		let false_positives = confusion_matrix.false_positives(class_index);
		let false_negatives = confusion_matrix.false_negatives(class_index);
		let true_negatives = confusion_matrix.true_negatives(class_index);
		let precision = precision(true_positives, false_positives);
		let recall = recall(true_positives, false_negatives);
		let f1_score = f1_score(precision, recall);
		Self {
			true_positives,
			false_positives,
			true_negatives,
			false_negatives,
			precision,
			recall,
			f1_score,
		}
	}
}

/// `MulticlassClassificationMetrics` accumulates a confusion matrix from multiclass samples, predicting the class with the highest probability.
pub struct MulticlassClassificationMetrics {
	confusion_matrix: ConfusionMatrix,
}

#[derive(Debug)]
pub struct MulticlassClassificationMetricsOutput {
	pub confusion_matrix: ConfusionMatrix,
	/// One entry per class, in class order.
	pub class_metrics: Vec<ClassMetrics>,
	pub accuracy: f64,
	pub precision_unweighted: f64,
	pub recall_unweighted: f64,
	pub f1_score_unweighted: f64,
}

impl MulticlassClassificationMetrics {
	pub fn new(n_classes: usize) -> Self {
		Self {
			confusion_matrix: ConfusionMatrix::new(n_classes),
		}
	}
}

impl<'a> StreamingMetric<'a> for MulticlassClassificationMetrics {
	type Input = &'a MulticlassSample;
	type Output = MulticlassClassificationMetricsOutput;

	/// Panics if the sample has more classes than this metric. A sample whose probabilities are all NaN has no prediction and is not counted.
	fn update(&mut self, sample: Self::Input) {
		if let Some(prediction) = argmax(sample.probabilities()) {
			self.confusion_matrix
				.accumulate(sample.label_index(), prediction);
		}
	}

	fn finalize(self) -> MulticlassClassificationMetricsOutput {
		let confusion_matrix = self.confusion_matrix;
		let n_classes = confusion_matrix.n_classes();
		let class_metrics: Vec<ClassMetrics> = (0..n_classes)
			.map(|class_index| ClassMetrics::from_confusion_matrix(&confusion_matrix, class_index))
			.collect();
		// Every class counts equally, including classes with no examples.
		let unweighted = |value: fn(&ClassMetrics) -> f64| {
			class_metrics.iter().map(value).sum::<f64>() / n_classes as f64
		};
		let precision_unweighted = unweighted(|class| class.precision);
		let recall_unweighted = unweighted(|class| class.recall);
		let f1_score_unweighted = unweighted(|class| class.f1_score);
		let accuracy = accuracy(&confusion_matrix);
		MulticlassClassificationMetricsOutput {
			confusion_matrix,
			class_metrics,
			accuracy,
			precision_unweighted,
			recall_unweighted,
			f1_score_unweighted,
		}
	}
}

#[cfg(test)]
fn samples(rows: &[(usize, &[f64])]) -> Vec<MulticlassSample> {
	rows.iter()
		.map(|(label, probabilities)| MulticlassSample::new(*label, probabilities.to_vec()).unwrap())
		.collect()
}

#[test]
fn test_formulas() {
	assert!((precision(3, 1) - 0.75).abs() < f64::EPSILON);
	assert!((recall(1, 3) - 0.25).abs() < f64::EPSILON);
	assert!((f1_score(0.5, 0.5) - 0.5).abs() < f64::EPSILON);
	assert_eq!(precision(0, 0), 0.0);
	assert_eq!(recall(0, 0), 0.0);
	assert_eq!(f1_score(0.0, 0.0), 0.0);
}

#[test]
fn test_multiclass() {
	// example taken from https://en.wikipedia.org/wiki/Confusion_matrix
	let cat: &[f64] = &[0.8, 0.1, 0.1];
	let dog: &[f64] = &[0.1, 0.8, 0.1];
	let rabbit: &[f64] = &[0.1, 0.1, 0.8];
	let mut rows = Vec::new();
	rows.extend(std::iter::repeat((1, cat)).take(5));
	rows.extend(std::iter::repeat((1, dog)).take(3));
	rows.extend(std::iter::repeat((2, cat)).take(2));
	rows.extend(std::iter::repeat((2, dog)).take(3));
	rows.extend(std::iter::repeat((2, rabbit)).take(1));
	rows.extend(std::iter::repeat((3, dog)).take(2));
	rows.extend(std::iter::repeat((3, rabbit)).take(11));
	let mut metrics = MulticlassClassificationMetrics::new(3);
	for sample in samples(&rows).iter() {
		metrics.update(sample);
	}
	let output = metrics.finalize();
	assert_eq!(output.confusion_matrix.n_examples(), 27);
	let counts: Vec<_> = output
		.class_metrics
		.iter()
		.map(|class| {
			(
				class.true_positives,
				class.false_positives,
				class.true_negatives,
				class.false_negatives,
			)
		})
		.collect();
	insta::assert_debug_snapshot!(counts, @r###"
 [
     (
         5,
         2,
         17,
         3,
     ),
     (
         3,
         5,
         16,
         3,
     ),
     (
         11,
         1,
         13,
         2,
     ),
 ]
 "###);
	let expected_precision = [5.0 / 7.0, 3.0 / 8.0, 11.0 / 12.0];
	let expected_recall = [5.0 / 8.0, 3.0 / 6.0, 11.0 / 13.0];
	for (class, (p, r)) in output
		.class_metrics
		.iter()
		.zip(expected_precision.iter().zip(expected_recall.iter()))
	{
		assert!((class.precision - p).abs() < 1e-12);
		assert!((class.recall - r).abs() < 1e-12);
		assert!((class.f1_score - 2.0 * p * r / (p + r)).abs() < 1e-12);
	}
	assert!((output.accuracy - 19.0 / 27.0).abs() < 1e-12);
	let macro_precision = expected_precision.iter().sum::<f64>() / 3.0;
	assert!((output.precision_unweighted - macro_precision).abs() < 1e-12);
	let macro_recall = expected_recall.iter().sum::<f64>() / 3.0;
	assert!((output.recall_unweighted - macro_recall).abs() < 1e-12);
}

#[test]
fn test_class_without_support() {
	// class 3 is never the label and never predicted
	let rows: Vec<(usize, &[f64])> = vec![
		(1, &[0.9, 0.1, 0.0][..]),
		(2, &[0.2, 0.8, 0.0][..]),
		(2, &[0.6, 0.4, 0.0][..]),
	];
	let mut metrics = MulticlassClassificationMetrics::new(3);
	for sample in samples(&rows).iter() {
		metrics.update(sample);
	}
	let output = metrics.finalize();
	let class = &output.class_metrics[2];
	assert_eq!(class.precision, 0.0);
	assert_eq!(class.recall, 0.0);
	assert_eq!(class.f1_score, 0.0);
	assert!((output.accuracy - 2.0 / 3.0).abs() < 1e-12);
	// the empty class still pulls the macro average down
	let expected = (0.5 + 1.0 + 0.0) / 3.0;
	assert!((output.precision_unweighted - expected).abs() < 1e-12);
	let total: u64 = output.confusion_matrix.counts().sum();
	assert_eq!(total, 3);
}

#[test]
fn test_ties_predict_lowest_class() {
	let rows: Vec<(usize, &[f64])> = vec![(2, &[0.5, 0.5][..]), (2, &[0.0, 0.0][..])];
	let mut metrics = MulticlassClassificationMetrics::new(2);
	for sample in samples(&rows).iter() {
		metrics.update(sample);
	}
	let output = metrics.finalize();
	assert_eq!(output.confusion_matrix.count(1, 0), 2);
	assert_eq!(output.accuracy, 0.0);
}
