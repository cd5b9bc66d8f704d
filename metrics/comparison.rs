use super::regression::RegressionMetric;
use std::collections::{BTreeMap, BTreeSet};

/// Whether smaller or larger values of a metric indicate a better model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	LowerIsBetter,
	HigherIsBetter,
}

impl Direction {
	/// Returns true if `candidate` is strictly better than `incumbent`. NaN is never better than anything.
	pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
		match self {
			Direction::LowerIsBetter => candidate < incumbent,
			Direction::HigherIsBetter => candidate > incumbent,
		}
	}

	/// The value assigned to a model that could not be evaluated.
	pub fn worst(self) -> f64 {
		match self {
			Direction::LowerIsBetter => f64::MAX,
			Direction::HigherIsBetter => f64::MIN,
		}
	}
}

/// Every scalar metric a model can be compared on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComparisonMetric {
	CrossEntropy,
	BinaryCrossEntropy,
	Accuracy,
	Precision,
	Recall,
	F1Score,
	AucRoc,
	Regression(RegressionMetric),
}

impl ComparisonMetric {
	pub fn direction(self) -> Direction {
		match self {
			ComparisonMetric::CrossEntropy | ComparisonMetric::BinaryCrossEntropy => {
				Direction::LowerIsBetter
			}
			ComparisonMetric::Accuracy
			| ComparisonMetric::Precision
			| ComparisonMetric::Recall
			| ComparisonMetric::F1Score
			| ComparisonMetric::AucRoc => Direction::HigherIsBetter,
			ComparisonMetric::Regression(RegressionMetric::R2) => Direction::HigherIsBetter,
			ComparisonMetric::Regression(_) => Direction::LowerIsBetter,
		}
	}
}

impl From<RegressionMetric> for ComparisonMetric {
	fn from(metric: RegressionMetric) -> Self {
		ComparisonMetric::Regression(metric)
	}
}

impl std::fmt::Display for ComparisonMetric {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ComparisonMetric::CrossEntropy => write!(f, "Cross-Entropy"),
			ComparisonMetric::BinaryCrossEntropy => write!(f, "BCE"),
			ComparisonMetric::Accuracy => write!(f, "Accuracy"),
			ComparisonMetric::Precision => write!(f, "Precision"),
			ComparisonMetric::Recall => write!(f, "Recall"),
			ComparisonMetric::F1Score => write!(f, "F1 score"),
			ComparisonMetric::AucRoc => write!(f, "AUC ROC"),
			ComparisonMetric::Regression(metric) => write!(f, "{}", metric),
		}
	}
}

/// The value of one metric for one model.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricResult {
	pub model: String,
	pub metric: ComparisonMetric,
	pub value: f64,
	/// False for the placeholder results of a model whose predictions could not be read.
	pub evaluated: bool,
}

/// The model with the best value for `metric`.
#[derive(Clone, Debug, PartialEq)]
pub struct BestModel {
	pub metric: ComparisonMetric,
	pub model: String,
	pub value: f64,
}

/**
Return the model whose value is best in `direction`. When several models share the best value, the first one wins. Models whose value is NaN are never chosen. Returns `None` if there are no candidates with a comparable value.
*/
pub fn best_model<'a, I>(candidates: I, direction: Direction) -> Option<&'a str>
where
	I: IntoIterator<Item = (&'a str, f64)>,
{
	candidates
		.into_iter()
		.filter(|(_, value)| !value.is_nan())
		.fold(None, |best: Option<(&'a str, f64)>, (model, value)| match best {
			Some((_, best_value)) if !direction.is_better(value, best_value) => best,
			_ => Some((model, value)),
		})
		.map(|(model, _)| model)
}

/**
Find the best model for every metric in `results`. Each metric is compared independently in its own direction. The output is ordered by metric.

Results that were not evaluated only compete for metrics no evaluated model reported, even when every evaluated value is NaN. A metric with no comparable value is left out.
*/
pub fn compare_models(results: &[MetricResult]) -> Vec<BestModel> {
	let evaluated_metrics: BTreeSet<ComparisonMetric> = results
		.iter()
		.filter(|result| result.evaluated)
		.map(|result| result.metric)
		.collect();
	results
		.iter()
		.filter(|result| result.evaluated || !evaluated_metrics.contains(&result.metric))
		.filter(|result| !result.value.is_nan())
		.fold(
			BTreeMap::<ComparisonMetric, &MetricResult>::new(),
			|mut best, result| {
				let replace = match best.get(&result.metric) {
					Some(incumbent) => result
						.metric
						.direction()
						.is_better(result.value, incumbent.value),
					None => true,
				};
				if replace {
					best.insert(result.metric, result);
				}
				best
			},
		)
		.into_iter()
		.map(|(metric, result)| BestModel {
			metric,
			model: result.model.clone(),
			value: result.value,
		})
		.collect()
}

#[cfg(test)]
fn result(model: &str, metric: ComparisonMetric, value: f64) -> MetricResult {
	MetricResult {
		model: model.to_owned(),
		metric,
		value,
		evaluated: true,
	}
}

#[cfg(test)]
fn failed(model: &str, metric: ComparisonMetric) -> MetricResult {
	MetricResult {
		model: model.to_owned(),
		metric,
		value: metric.direction().worst(),
		evaluated: false,
	}
}

#[test]
fn test_best_model_lower_is_better() {
	let mse = [("model_1.csv", 0.5), ("model_2.csv", 0.2), ("model_3.csv", 0.8)];
	assert_eq!(
		best_model(mse.iter().copied(), Direction::LowerIsBetter),
		Some("model_2.csv")
	);
	assert_eq!(
		best_model(mse.iter().copied(), Direction::HigherIsBetter),
		Some("model_3.csv")
	);
}

#[test]
fn test_best_model_ties_and_nan() {
	let values = [("a", f64::NAN), ("b", 0.7), ("c", 0.7), ("d", 0.1)];
	assert_eq!(
		best_model(values.iter().copied(), Direction::HigherIsBetter),
		Some("b")
	);
	let values = [("a", f64::NAN)];
	assert_eq!(
		best_model(values.iter().copied(), Direction::LowerIsBetter),
		None
	);
	assert_eq!(best_model(Vec::new(), Direction::LowerIsBetter), None);
}

#[test]
fn test_worst_value_never_wins() {
	let direction = ComparisonMetric::Regression(RegressionMetric::MeanSquaredError).direction();
	let values = [("failed", direction.worst()), ("ok", 1e12)];
	assert_eq!(best_model(values.iter().copied(), direction), Some("ok"));
	let direction = ComparisonMetric::AucRoc.direction();
	let values = [("failed", direction.worst()), ("ok", 0.0)];
	assert_eq!(best_model(values.iter().copied(), direction), Some("ok"));
}

#[test]
fn test_compare_models() {
	let results = vec![
		result("model_1.csv", ComparisonMetric::BinaryCrossEntropy, 0.4),
		result("model_1.csv", ComparisonMetric::Accuracy, 0.8),
		result("model_1.csv", ComparisonMetric::AucRoc, f64::NAN),
		result("model_2.csv", ComparisonMetric::BinaryCrossEntropy, 0.3),
		result("model_2.csv", ComparisonMetric::Accuracy, 0.8),
		result("model_2.csv", ComparisonMetric::AucRoc, 0.6),
		result("model_3.csv", ComparisonMetric::BinaryCrossEntropy, 0.9),
		result("model_3.csv", ComparisonMetric::Accuracy, 0.7),
		result("model_3.csv", ComparisonMetric::AucRoc, 0.9),
	];
	let best: Vec<_> = compare_models(&results)
		.into_iter()
		.map(|best| (best.metric.to_string(), best.model))
		.collect();
	insta::assert_debug_snapshot!(best, @r###"
 [
     (
         "BCE",
         "model_2.csv",
     ),
     (
         "Accuracy",
         "model_1.csv",
     ),
     (
         "AUC ROC",
         "model_3.csv",
     ),
 ]
 "###);
}

#[test]
fn test_failed_model_never_beats_undefined_value() {
	// the only evaluated model has a single class, so its AUC is NaN
	let results = vec![
		failed("missing.csv", ComparisonMetric::Accuracy),
		failed("missing.csv", ComparisonMetric::AucRoc),
		result("good.csv", ComparisonMetric::Accuracy, 1.0),
		result("good.csv", ComparisonMetric::AucRoc, f64::NAN),
	];
	let best: Vec<_> = compare_models(&results)
		.into_iter()
		.map(|best| (best.metric, best.model))
		.collect();
	assert_eq!(
		best,
		vec![(ComparisonMetric::Accuracy, "good.csv".to_owned())]
	);
}

#[test]
fn test_all_models_failed() {
	let results = vec![
		failed("model_1.csv", ComparisonMetric::BinaryCrossEntropy),
		failed("model_2.csv", ComparisonMetric::BinaryCrossEntropy),
	];
	let best = compare_models(&results);
	assert_eq!(best.len(), 1);
	assert_eq!(best[0].model, "model_1.csv");
}

#[test]
fn test_regression_directions() {
	assert_eq!(
		ComparisonMetric::from(RegressionMetric::R2).direction(),
		Direction::HigherIsBetter
	);
	assert_eq!(
		ComparisonMetric::from(RegressionMetric::MeanAbsoluteRelativeError).direction(),
		Direction::LowerIsBetter
	);
	assert_eq!(
		ComparisonMetric::from(RegressionMetric::MeanSquaredError).to_string(),
		"MSE"
	);
}
