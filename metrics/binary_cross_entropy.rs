use super::{mean::Mean, sample::BinarySample, StreamingMetric};
use num_traits::clamp;

/// Probabilities are clamped to `[EPSILON, 1 - EPSILON]` before computing binary cross entropy.
pub const EPSILON: f64 = 1e-15;

/// BinaryCrossEntropy is the loss function used for binary classification. [Learn more](https://en.wikipedia.org/wiki/Cross_entropy#Cross-entropy_loss_function_and_logistic_regression).
#[derive(Debug, Default)]
pub struct BinaryCrossEntropy(Mean);

impl BinaryCrossEntropy {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<'a> StreamingMetric<'a> for BinaryCrossEntropy {
	type Input = &'a BinarySample;
	type Output = Option<f64>;

	fn update(&mut self, sample: Self::Input) {
		// Binary cross entropy is undefined when the probability = 0 or probability = 1.
		let probability = clamp(sample.probability, EPSILON, 1.0 - EPSILON);
		let binary_cross_entropy = if sample.label {
			-probability.ln()
		} else {
			-(1.0 - probability).ln()
		};
		self.0.update(binary_cross_entropy);
	}

	fn finalize(self) -> Option<f64> {
		self.0.finalize()
	}
}

#[test]
fn test_binary_cross_entropy_is_clamped() {
	let mut binary_cross_entropy = BinaryCrossEntropy::new();
	binary_cross_entropy.update(&BinarySample {
		label: true,
		probability: 1.0,
	});
	let value = binary_cross_entropy.finalize().unwrap();
	assert!(value > 0.0);
	assert!((value - -(1.0 - EPSILON).ln()).abs() < f64::EPSILON);
	assert!((value - 1e-15).abs() < 1e-17);

	let mut binary_cross_entropy = BinaryCrossEntropy::new();
	binary_cross_entropy.update(&BinarySample {
		label: true,
		probability: 0.0,
	});
	let value = binary_cross_entropy.finalize().unwrap();
	assert!(value.is_finite());
	assert!((value - -EPSILON.ln()).abs() < 1e-9);
}

#[test]
fn test_binary_cross_entropy() {
	let mut binary_cross_entropy = BinaryCrossEntropy::new();
	binary_cross_entropy.update(&BinarySample {
		label: true,
		probability: 0.8,
	});
	binary_cross_entropy.update(&BinarySample {
		label: false,
		probability: 0.4,
	});
	let expected = (-(0.8f64.ln()) - 0.6f64.ln()) / 2.0;
	assert!((binary_cross_entropy.finalize().unwrap() - expected).abs() < 1e-12);
	assert_eq!(BinaryCrossEntropy::new().finalize(), None);
}
