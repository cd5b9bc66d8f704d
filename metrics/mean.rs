use super::StreamingMetric;

/// The arithmetic mean of the values passed to `update()`.
///
/// The mean is computed from a running sum rather than a running average, so a single infinite value produces an infinite mean instead of NaN.
#[derive(Clone, Debug, Default)]
pub struct Mean {
	n: u64,
	sum: f64,
}

impl Mean {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn n(&self) -> u64 {
		self.n
	}
}

impl StreamingMetric<'_> for Mean {
	type Input = f64;
	type Output = Option<f64>;

	fn update(&mut self, value: f64) {
		self.n += 1;
		self.sum += value;
	}

	fn finalize(self) -> Option<f64> {
		if self.n == 0 {
			None
		} else {
			Some(self.sum / self.n as f64)
		}
	}
}

#[test]
fn test_mean() {
	assert_eq!(Mean::new().finalize(), None);
	let mut mean = Mean::new();
	for value in &[1.0, 2.0, 6.0] {
		mean.update(*value);
	}
	assert_eq!(mean.n(), 3);
	assert_eq!(mean.finalize(), Some(3.0));
	let mut mean = Mean::new();
	mean.update(f64::INFINITY);
	mean.update(1.0);
	assert_eq!(mean.finalize(), Some(f64::INFINITY));
}
