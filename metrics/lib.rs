/*!
This crate computes evaluation metrics for classification and regression models from recorded predictions. It defines the [`Metric`](trait.Metric.html) and [`StreamingMetric`](trait.StreamingMetric.html) traits and a number of concrete types that implement them such as [`ConfusionMatrix`](struct.ConfusionMatrix.html)-backed [`MulticlassClassificationMetrics`](struct.MulticlassClassificationMetrics.html) and [`BinaryCrossEntropy`](struct.BinaryCrossEntropy.html), along with [`compare_models`](fn.compare_models.html), which picks the best of several models for each metric.
*/

#![allow(clippy::tabs_in_doc_comments)]

mod auc_roc;
mod binary_classification;
mod binary_cross_entropy;
mod classification;
mod comparison;
mod confusion_matrix;
mod cross_entropy;
mod evaluation;
mod mean;
mod mean_variance;
mod regression;
mod sample;

pub use self::auc_roc::{auc_roc, compute_roc_curve, AucRoc, RocCurvePoint};
pub use self::binary_classification::{
	BinaryClassificationMetrics, BinaryClassificationMetricsOutput, DEFAULT_THRESHOLD,
};
pub use self::binary_cross_entropy::{BinaryCrossEntropy, EPSILON};
pub use self::classification::{
	accuracy, f1_score, precision, recall, ClassMetrics, MulticlassClassificationMetrics,
	MulticlassClassificationMetricsOutput,
};
pub use self::comparison::{
	best_model, compare_models, BestModel, ComparisonMetric, Direction, MetricResult,
};
pub use self::confusion_matrix::{argmax, ConfusionMatrix};
pub use self::cross_entropy::CrossEntropy;
pub use self::evaluation::{
	failed_metric_results, BinaryEvaluation, MulticlassEvaluation, RegressionEvaluation,
	BINARY_METRICS, MULTICLASS_METRICS,
};
pub use self::mean::Mean;
pub use self::mean_variance::{m2_to_variance, merge_mean_m2};
pub use self::regression::{RegressionMetric, RegressionMetrics, RegressionMetricsOutput};
pub use self::sample::{BinarySample, InvalidSample, MulticlassSample, RegressionSample};

/**
The `Metric` trait defines a common interface to metrics that can be computed when the entire input is available at once, such as the area under the ROC curve, which must rank every sample before it can produce a value.

The seemingly unused generic lifetime `'a` exists here to allow `Input`s and `Output`s to borrow from their enclosing scope.
*/
pub trait Metric<'a> {
	type Input;
	type Output;
	fn compute(input: Self::Input) -> Self::Output;
}

/**
The `StreamingMetric` trait defines a common interface to metrics that can be computed one sample at a time, such as the confusion matrix and cross entropy.

After being initialized, a value of type `T` implementing the `StreamingMetric` trait can have `update()` called on it with values of the associated type `Input`. When finished aggregating, you can call `finalize()` on the metric to produce the associated type `Output`.

# Examples

Here is a basic example implementation of a `Min` metric, which takes `f64`s as input and produces an `f64` as output that is the minimum of all the inputs.

```
use modeleval_metrics::StreamingMetric;

struct Min(f64);

impl StreamingMetric<'_> for Min {
	type Input = f64;
	type Output = f64;
	fn update(&mut self, input: Self::Input) {
		self.0 = self.0.min(input)
	}
	fn finalize(self) -> Self::Output { self.0 }
}
```
*/
pub trait StreamingMetric<'a> {
	/// `Input` is the type to aggregate in calls to `update()`.
	type Input;
	/// `Output` is the return type of `finalize()`.
	type Output;
	/// Update this streaming metric with the `Input` `input`.
	fn update(&mut self, input: Self::Input);
	/// When you are done aggregating `Input`s, call `finalize()` to produce an `Output`.
	fn finalize(self) -> Self::Output;
}
