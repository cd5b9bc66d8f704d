use super::{sample::BinarySample, Metric, StreamingMetric};

/**
This function computes the area under the receiver operating characteristic curve using the trapezoid method.

Samples are ranked by probability, highest first. All samples that share a probability form a single step on the curve, so the result does not depend on the order of tied samples. If `labels` contains no positives or no negatives, the true or false positive rates divide by zero and the result is NaN. `probabilities` and `labels` are paired up to the length of the shorter slice.
*/
pub fn auc_roc(probabilities: &[f64], labels: &[bool]) -> f64 {
	let roc_curve = compute_roc_curve(probabilities, labels);
	if roc_curve.len() < 2 {
		return f64::NAN;
	}
	// compute the riemann sum of the roc curve
	roc_curve
		.windows(2)
		.map(|points| {
			let left = &points[0];
			let right = &points[1];
			let y_average = (left.true_positive_rate + right.true_positive_rate) / 2.0;
			let dx = right.false_positive_rate - left.false_positive_rate;
			y_average * dx
		})
		.sum()
}

#[derive(Debug, PartialEq)]
pub struct RocCurvePoint {
	/// The classification threshold.
	pub threshold: f64,
	/// The true positive rate for all predictions with probability >= threshold.
	pub true_positive_rate: f64,
	/// The false positive rate for all predictions with probability >= threshold.
	pub false_positive_rate: f64,
}

/// This function computes the ROC curve. The ROC curve plots the false positive rate on the x axis and the true positive rate on the y axis for various classification thresholds. The first point is always (0, 0) with a dummy threshold of 1.0.
pub fn compute_roc_curve(probabilities: &[f64], labels: &[bool]) -> Vec<RocCurvePoint> {
	let mut tps_fps = compute_tps_fps_by_threshold(probabilities, labels);
	for i in 1..tps_fps.len() {
		tps_fps[i].true_positives += tps_fps[i - 1].true_positives;
		tps_fps[i].false_positives += tps_fps[i - 1].false_positives;
	}
	let count_positives = labels
		.iter()
		.take(probabilities.len())
		.filter(|label| **label)
		.count();
	let count_negatives = labels.len().min(probabilities.len()) - count_positives;
	let mut roc_curve = vec![RocCurvePoint {
		threshold: 1.0,
		true_positive_rate: 0.0,
		false_positive_rate: 0.0,
	}];
	roc_curve.extend(tps_fps.iter().map(|tps_fps_point| RocCurvePoint {
		threshold: tps_fps_point.threshold,
		true_positive_rate: tps_fps_point.true_positives as f64 / count_positives as f64,
		false_positive_rate: tps_fps_point.false_positives as f64 / count_negatives as f64,
	}));
	roc_curve
}

#[derive(Debug)]
struct TpsFpsPoint {
	/// The classification threshold.
	threshold: f64,
	/// The true positives for this threshold.
	true_positives: usize,
	/// The false positives for this threshold.
	false_positives: usize,
}

/**
This function computes the counts of true positives and false positives at each classification threshold. Unlike the roc curve, each point contains just the count of true positives and false positives at this threshold instead of all values greater than or equal to this threshold.
*/
fn compute_tps_fps_by_threshold(probabilities: &[f64], labels: &[bool]) -> Vec<TpsFpsPoint> {
	let mut probabilities_labels: Vec<(f64, bool)> = probabilities
		.iter()
		.copied()
		.zip(labels.iter().copied())
		.collect();
	probabilities_labels.sort_by(|a, b| b.0.total_cmp(&a.0));
	let mut tps_fps: Vec<TpsFpsPoint> = Vec::new();
	for (probability, label) in probabilities_labels {
		let true_positives = label as usize;
		let false_positives = 1 - true_positives;
		match tps_fps.last_mut() {
			// if probability is same as the last one, add to the previous bucket
			Some(last) if last.threshold == probability => {
				last.true_positives += true_positives;
				last.false_positives += false_positives;
			}
			_ => tps_fps.push(TpsFpsPoint {
				threshold: probability,
				true_positives,
				false_positives,
			}),
		}
	}
	tps_fps
}

/// `AucRoc` collects binary samples so the area under the ROC curve can be computed once every sample has been seen.
#[derive(Debug, Default)]
pub struct AucRoc {
	probabilities: Vec<f64>,
	labels: Vec<bool>,
}

impl AucRoc {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<'a> Metric<'a> for AucRoc {
	type Input = (&'a [f64], &'a [bool]);
	type Output = f64;
	fn compute((probabilities, labels): Self::Input) -> f64 {
		auc_roc(probabilities, labels)
	}
}

impl<'a> StreamingMetric<'a> for AucRoc {
	type Input = &'a BinarySample;
	type Output = f64;

	fn update(&mut self, sample: Self::Input) {
		self.probabilities.push(sample.probability);
		self.labels.push(sample.label);
	}

	fn finalize(self) -> f64 {
		<Self as Metric>::compute((self.probabilities.as_slice(), self.labels.as_slice()))
	}
}

#[test]
fn test_roc_curve() {
	let labels = vec![true, true, false, false];
	let probabilities = vec![0.9, 0.4, 0.4, 0.2];
	let left = compute_roc_curve(probabilities.as_slice(), labels.as_slice());
	let right = vec![
		RocCurvePoint {
			threshold: 1.0,
			true_positive_rate: 0.0,
			false_positive_rate: 0.0,
		},
		RocCurvePoint {
			threshold: 0.9,
			true_positive_rate: 0.5,
			false_positive_rate: 0.0,
		},
		RocCurvePoint {
			threshold: 0.4,
			true_positive_rate: 1.0,
			false_positive_rate: 0.5,
		},
		RocCurvePoint {
			threshold: 0.2,
			true_positive_rate: 1.0,
			false_positive_rate: 1.0,
		},
	];
	assert_eq!(left, right);
	let auc = auc_roc(probabilities.as_slice(), labels.as_slice());
	assert!(f64::abs(auc - 0.875) < f64::EPSILON)
}

#[test]
fn test_perfect_separation() {
	let auc = auc_roc(&[0.9, 0.8, 0.2, 0.1], &[true, true, false, false]);
	assert!(f64::abs(auc - 1.0) < f64::EPSILON);
	// the samples do not need to arrive in rank order
	let auc = auc_roc(&[0.2, 0.9, 0.1, 0.8], &[false, true, false, true]);
	assert!(f64::abs(auc - 1.0) < f64::EPSILON);
}

#[test]
fn test_inverted_separation() {
	let auc = auc_roc(&[0.1, 0.2, 0.8, 0.9], &[true, true, false, false]);
	assert!(auc.abs() < f64::EPSILON);
}

#[test]
fn test_ties_form_one_step() {
	let auc = auc_roc(&[0.6, 0.6, 0.4, 0.4], &[true, false, true, false]);
	assert!(f64::abs(auc - 0.5) < f64::EPSILON);
	// the order of tied samples does not matter
	let auc = auc_roc(&[0.6, 0.6, 0.4, 0.4], &[false, true, false, true]);
	assert!(f64::abs(auc - 0.5) < f64::EPSILON);
	let auc = auc_roc(&[0.5; 6], &[true, false, false, true, true, false]);
	assert!(f64::abs(auc - 0.5) < f64::EPSILON);
}

#[test]
fn test_monotonic_transform_invariance() {
	let probabilities = [0.95, 0.81, 0.77, 0.64, 0.52, 0.5, 0.33, 0.21, 0.2, 0.05];
	let labels = [
		true, true, false, true, false, true, false, false, true, false,
	];
	let auc = auc_roc(&probabilities, &labels);
	let scaled: Vec<f64> = probabilities.iter().map(|p| p * 3.5).collect();
	let squared: Vec<f64> = probabilities.iter().map(|p| p * p).collect();
	assert!(f64::abs(auc_roc(&scaled, &labels) - auc) < 1e-12);
	assert!(f64::abs(auc_roc(&squared, &labels) - auc) < 1e-12);
	// 18 of the 25 positive, negative pairs are ranked correctly
	assert!(f64::abs(auc - 18.0 / 25.0) < 1e-12);
}

#[test]
fn test_single_class_is_undefined() {
	assert!(auc_roc(&[0.9, 0.1], &[true, true]).is_nan());
	assert!(auc_roc(&[0.9, 0.1], &[false, false]).is_nan());
	assert!(auc_roc(&[], &[]).is_nan());
}

#[test]
fn test_streaming_auc_roc() {
	let mut auc_roc = AucRoc::new();
	for &(label, probability) in [(true, 0.9), (false, 0.4), (true, 0.4), (false, 0.2)].iter() {
		auc_roc.update(&BinarySample { label, probability });
	}
	assert!(f64::abs(auc_roc.finalize() - 0.875) < f64::EPSILON);
}
