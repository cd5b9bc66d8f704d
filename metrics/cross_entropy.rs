use super::{mean::Mean, sample::MulticlassSample, StreamingMetric};

/**
CrossEntropy is the loss function used in multiclass classification. [Learn more](https://en.wikipedia.org/wiki/Cross_entropy#Cross-entropy_loss_function_and_logistic_regression).

Each sample contributes `-ln(p)` where `p` is the probability assigned to the true class. The probability is not clamped, so a sample that assigns zero probability to its true class makes the cross entropy infinite.
*/
#[derive(Debug, Default)]
pub struct CrossEntropy(Mean);

impl CrossEntropy {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<'a> StreamingMetric<'a> for CrossEntropy {
	type Input = &'a MulticlassSample;
	type Output = Option<f64>;

	fn update(&mut self, sample: Self::Input) {
		self.0.update(-sample.probability_of_label().ln())
	}

	fn finalize(self) -> Option<f64> {
		self.0.finalize()
	}
}

#[test]
fn test_cross_entropy() {
	let certain = MulticlassSample::new(1, vec![1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
	let mut cross_entropy = CrossEntropy::new();
	cross_entropy.update(&certain);
	assert_eq!(cross_entropy.finalize(), Some(0.0));

	let wrong = MulticlassSample::new(1, vec![0.0, 1.0, 0.0, 0.0, 0.0]).unwrap();
	let mut cross_entropy = CrossEntropy::new();
	cross_entropy.update(&certain);
	cross_entropy.update(&wrong);
	assert_eq!(cross_entropy.finalize(), Some(f64::INFINITY));

	let mut cross_entropy = CrossEntropy::new();
	cross_entropy.update(&MulticlassSample::new(2, vec![0.5, 0.5]).unwrap());
	cross_entropy.update(&MulticlassSample::new(1, vec![0.25, 0.75]).unwrap());
	let expected = (2.0f64.ln() + 4.0f64.ln()) / 2.0;
	assert!((cross_entropy.finalize().unwrap() - expected).abs() < 1e-12);

	assert_eq!(CrossEntropy::new().finalize(), None);
}
