use thiserror::Error;

/// A single multiclass prediction: the 1-indexed true class and one probability per class.
#[derive(Clone, Debug, PartialEq)]
pub struct MulticlassSample {
	label: usize,
	probabilities: Vec<f64>,
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidSample {
	#[error("a sample must have at least one class probability")]
	NoClasses,
	#[error("label {label} is out of range for {n_classes} classes")]
	LabelOutOfRange { label: usize, n_classes: usize },
}

impl MulticlassSample {
	/// `label` is 1-indexed and must be at most `probabilities.len()`.
	pub fn new(label: usize, probabilities: Vec<f64>) -> Result<Self, InvalidSample> {
		let n_classes = probabilities.len();
		if n_classes == 0 {
			return Err(InvalidSample::NoClasses);
		}
		if label == 0 || label > n_classes {
			return Err(InvalidSample::LabelOutOfRange { label, n_classes });
		}
		Ok(Self {
			label,
			probabilities,
		})
	}

	/// The 1-indexed true class.
	pub fn label(&self) -> usize {
		self.label
	}

	/// The 0-indexed true class.
	pub fn label_index(&self) -> usize {
		self.label - 1
	}

	pub fn probabilities(&self) -> &[f64] {
		&self.probabilities
	}

	pub fn n_classes(&self) -> usize {
		self.probabilities.len()
	}

	/// The probability the model assigned to the true class.
	pub fn probability_of_label(&self) -> f64 {
		self.probabilities[self.label_index()]
	}
}

/// A single binary prediction: whether the example is positive and the predicted probability that it is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinarySample {
	pub label: bool,
	pub probability: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegressionSample {
	pub label: f64,
	pub prediction: f64,
}

#[test]
fn test_multiclass_sample() {
	let sample = MulticlassSample::new(2, vec![0.1, 0.7, 0.2]).unwrap();
	assert_eq!(sample.label_index(), 1);
	assert_eq!(sample.n_classes(), 3);
	assert!((sample.probability_of_label() - 0.7).abs() < f64::EPSILON);
	assert_eq!(
		MulticlassSample::new(0, vec![0.5, 0.5]),
		Err(InvalidSample::LabelOutOfRange {
			label: 0,
			n_classes: 2
		})
	);
	assert_eq!(
		MulticlassSample::new(3, vec![0.5, 0.5]),
		Err(InvalidSample::LabelOutOfRange {
			label: 3,
			n_classes: 2
		})
	);
	assert_eq!(MulticlassSample::new(1, vec![]), Err(InvalidSample::NoClasses));
}
