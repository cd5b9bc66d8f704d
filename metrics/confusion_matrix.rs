use ndarray::prelude::*;

/// A square matrix of counts where the entry at `(label, prediction)` is the number of examples whose true class is `label` and whose predicted class is `prediction`. Both indexes are 0-based.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrix {
	//                label  prediction
	//                   |     |
	//                   v     v
	/// The shape is (n_classes, n_classes).
	counts: Array2<u64>,
}

impl ConfusionMatrix {
	pub fn new(n_classes: usize) -> Self {
		Self {
			counts: Array2::zeros((n_classes, n_classes)),
		}
	}

	/// Count one example. Panics if either index is not less than `n_classes()`.
	pub fn accumulate(&mut self, label: usize, prediction: usize) {
		self.counts[(label, prediction)] += 1;
	}

	pub fn n_classes(&self) -> usize {
		self.counts.nrows()
	}

	pub fn n_examples(&self) -> u64 {
		self.counts.sum()
	}

	pub fn count(&self, label: usize, prediction: usize) -> u64 {
		self.counts[(label, prediction)]
	}

	pub fn counts(&self) -> ArrayView2<u64> {
		self.counts.view()
	}

	pub fn true_positives(&self, class_index: usize) -> u64 {
		self.counts[(class_index, class_index)]
	}

	/// Examples predicted as `class_index` whose true class is another class.
	pub fn false_positives(&self, class_index: usize) -> u64 {
		self.counts.column(class_index).sum() - self.true_positives(class_index)
	}

	/// Examples of class `class_index` that were predicted as another class.
	pub fn false_negatives(&self, class_index: usize) -> u64 {
		self.counts.row(class_index).sum() - self.true_positives(class_index)
	}

	pub fn true_negatives(&self, class_index: usize) -> u64 {
		self.n_examples()
			- self.true_positives(class_index)
			- self.false_positives(class_index)
			- self.false_negatives(class_index)
	}

	/// The number of examples on the diagonal.
	pub fn n_correct(&self) -> u64 {
		self.counts.diag().sum()
	}
}

/**
Return the index of the largest probability. When several classes share the largest probability, the first one wins. NaN probabilities are skipped. Returns `None` if no probability is comparable, which includes an empty slice.
*/
pub fn argmax(probabilities: &[f64]) -> Option<usize> {
	probabilities
		.iter()
		.copied()
		.enumerate()
		.filter(|(_, probability)| !probability.is_nan())
		.fold(None, |max: Option<(usize, f64)>, (index, probability)| match max {
			Some((_, max_probability)) if probability <= max_probability => max,
			_ => Some((index, probability)),
		})
		.map(|(index, _)| index)
}

#[test]
fn test_argmax() {
	assert_eq!(argmax(&[]), None);
	assert_eq!(argmax(&[0.2]), Some(0));
	assert_eq!(argmax(&[0.1, 0.6, 0.3]), Some(1));
	// ties go to the lowest index
	assert_eq!(argmax(&[0.4, 0.4, 0.2]), Some(0));
	assert_eq!(argmax(&[0.1, 0.45, 0.45]), Some(1));
	assert_eq!(argmax(&[0.0, 0.0, 0.0, 0.0, 0.0]), Some(0));
	assert_eq!(argmax(&[f64::NAN, 0.9]), Some(1));
	assert_eq!(argmax(&[0.2, f64::NAN, 0.1]), Some(0));
	assert_eq!(argmax(&[f64::NAN, f64::NAN]), None);
}

#[test]
fn test_confusion_matrix() {
	let mut confusion_matrix = ConfusionMatrix::new(3);
	let examples = [(0, 0), (0, 0), (0, 1), (1, 1), (1, 2), (2, 2), (2, 2), (2, 0)];
	for &(label, prediction) in examples.iter() {
		confusion_matrix.accumulate(label, prediction);
	}
	assert_eq!(confusion_matrix.n_classes(), 3);
	assert_eq!(confusion_matrix.n_examples(), examples.len() as u64);
	assert_eq!(confusion_matrix.n_correct(), 5);
	assert_eq!(confusion_matrix.count(2, 0), 1);
	let per_class: Vec<_> = (0..3)
		.map(|class_index| {
			(
				confusion_matrix.true_positives(class_index),
				confusion_matrix.false_positives(class_index),
				confusion_matrix.false_negatives(class_index),
				confusion_matrix.true_negatives(class_index),
			)
		})
		.collect();
	insta::assert_debug_snapshot!(per_class, @r###"
 [
     (
         2,
         1,
         1,
         4,
     ),
     (
         1,
         1,
         1,
         5,
     ),
     (
         2,
         1,
         1,
         4,
     ),
 ]
 "###);
}
