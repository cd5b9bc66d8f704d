/*!
This module renders evaluation results as human readable text.
*/

use modeleval_metrics::{
	BestModel, BinaryEvaluation, ConfusionMatrix, MulticlassEvaluation, RegressionEvaluation,
	RegressionMetric,
};
use modeleval_util::table::Table;
use ndarray::prelude::*;
use std::fmt::{Display, Formatter, Result};

/// Drawn after each binary model's report.
const SEPARATOR: &str = "------------------------------------";

pub struct MulticlassReport<'a> {
	pub model: &'a str,
	pub evaluation: &'a MulticlassEvaluation,
	pub n_malformed: usize,
}

impl<'a> Display for MulticlassReport<'a> {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result {
		let classification = &self.evaluation.classification;
		writeln!(f, "Metrics for file: {}", self.model)?;
		write_malformed(f, self.n_malformed)?;
		for (class_index, class) in classification.class_metrics.iter().enumerate() {
			writeln!(f, "Class {} Metrics:", class_index + 1)?;
			writeln!(f, "Precision: {:.4}", class.precision)?;
			writeln!(f, "Recall: {:.4}", class.recall)?;
			writeln!(f, "F1 Score: {:.4}", class.f1_score)?;
		}
		writeln!(f, "Accuracy: {:.4}", classification.accuracy)?;
		let cross_entropy = self.evaluation.cross_entropy.unwrap_or(f64::NAN);
		writeln!(f, "Cross-Entropy: {:.4}", cross_entropy)?;
		writeln!(f)?;
		writeln!(f, "Confusion Matrix:")?;
		// Multiclass labels are 1-indexed.
		let classes: Vec<(usize, String)> = (0..classification.confusion_matrix.n_classes())
			.map(|class_index| (class_index, (class_index + 1).to_string()))
			.collect();
		write!(
			f,
			"{}",
			confusion_matrix_table(&classification.confusion_matrix, &classes)
		)?;
		writeln!(f, "Macro Precision: {:.4}", classification.precision_unweighted)?;
		writeln!(f, "Macro Recall: {:.4}", classification.recall_unweighted)?;
		writeln!(f, "Macro F1 Score: {:.4}", classification.f1_score_unweighted)?;
		Ok(())
	}
}

pub struct BinaryReport<'a> {
	pub model: &'a str,
	pub evaluation: &'a BinaryEvaluation,
	pub n_malformed: usize,
}

impl<'a> Display for BinaryReport<'a> {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result {
		let classification = &self.evaluation.classification;
		writeln!(f, "Metrics for file: {}", self.model)?;
		write_malformed(f, self.n_malformed)?;
		let binary_cross_entropy = self.evaluation.binary_cross_entropy.unwrap_or(f64::NAN);
		writeln!(f, "BCE = {:.7}", binary_cross_entropy)?;
		writeln!(f, "Confusion matrix")?;
		// The positive class comes first.
		let classes = [(1, "1".to_owned()), (0, "0".to_owned())];
		write!(
			f,
			"{}",
			confusion_matrix_table(&classification.confusion_matrix, &classes)
		)?;
		writeln!(f, "Accuracy = {:.4}", classification.accuracy)?;
		writeln!(f, "Precision = {:.7}", classification.precision)?;
		writeln!(f, "Recall = {:.8}", classification.recall)?;
		writeln!(f, "F1 score = {:.8}", classification.f1_score)?;
		writeln!(f, "AUC ROC = {:.8}", self.evaluation.auc_roc)?;
		writeln!(f, "{}", SEPARATOR)?;
		Ok(())
	}
}

pub struct RegressionReport<'a> {
	pub model: &'a str,
	pub evaluation: &'a RegressionEvaluation,
	pub metrics: &'a [RegressionMetric],
	pub n_malformed: usize,
}

impl<'a> Display for RegressionReport<'a> {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result {
		writeln!(f, "For {}", self.model)?;
		write_malformed(f, self.n_malformed)?;
		for metric in self.metrics {
			let value = metric.compute(&self.evaluation.metrics);
			writeln!(f, "    {} = {:.5}", metric, value)?;
		}
		Ok(())
	}
}

/// The best model for each metric.
pub struct Summary<'a>(pub &'a [BestModel]);

impl<'a> Display for Summary<'a> {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result {
		writeln!(f, "--- Summary ---")?;
		for best in self.0 {
			writeln!(
				f,
				"According to {}, The best model is {}",
				best.metric, best.model
			)?;
		}
		Ok(())
	}
}

fn write_malformed(f: &mut Formatter<'_>, n_malformed: usize) -> Result {
	match n_malformed {
		0 => Ok(()),
		1 => writeln!(f, "Skipped 1 malformed row"),
		n => writeln!(f, "Skipped {} malformed rows", n),
	}
}

/**
Lay out a confusion matrix with one row per predicted class and one column per true class. `classes` lists the matrix index and display name of each class in the order they should appear.
*/
fn confusion_matrix_table(
	confusion_matrix: &ConfusionMatrix,
	classes: &[(usize, String)],
) -> Table {
	let header: Vec<String> = std::iter::once(String::new())
		.chain(classes.iter().map(|(_, name)| format!("y={}", name)))
		.collect();
	let n_columns = classes.len() + 1;
	let mut values = Array2::from_elem((classes.len(), n_columns), String::new());
	for (row, (prediction, prediction_name)) in classes.iter().enumerate() {
		values[(row, 0)] = format!("y^={}", prediction_name);
		for (column, (label, _)) in classes.iter().enumerate() {
			values[(row, column + 1)] = confusion_matrix.count(*label, *prediction).to_string();
		}
	}
	Table::new(header, values)
}

#[cfg(test)]
use modeleval_metrics::{BinarySample, ComparisonMetric, MulticlassSample, RegressionSample};

#[test]
fn test_binary_report() {
	let samples: Vec<BinarySample> = [(true, 0.75), (true, 0.25), (false, 0.5), (false, 0.25)]
		.iter()
		.map(|&(label, probability)| BinarySample { label, probability })
		.collect();
	let evaluation = BinaryEvaluation::compute(&samples, 0.5);
	let report = BinaryReport {
		model: "model_1.csv",
		evaluation: &evaluation,
		n_malformed: 0,
	};
	insta::assert_snapshot!(report.to_string(), @r###"
Metrics for file: model_1.csv
BCE = 0.6637014
Confusion matrix
|      | y=1 | y=0 |
|------|-----|-----|
| y^=1 | 1   | 1   |
| y^=0 | 1   | 1   |
Accuracy = 0.5000
Precision = 0.5000000
Recall = 0.50000000
F1 score = 0.50000000
AUC ROC = 0.62500000
------------------------------------
"###);
}

#[test]
fn test_multiclass_report() {
	let samples: Vec<MulticlassSample> = vec![
		(1, vec![0.5, 0.25, 0.25]),
		(2, vec![0.5, 0.25, 0.25]),
		(2, vec![0.25, 0.5, 0.25]),
		(3, vec![0.25, 0.25, 0.5]),
	]
	.into_iter()
	.map(|(label, probabilities)| MulticlassSample::new(label, probabilities).unwrap())
	.collect();
	let evaluation = MulticlassEvaluation::compute(&samples, 3);
	let report = MulticlassReport {
		model: "model.csv",
		evaluation: &evaluation,
		n_malformed: 2,
	};
	insta::assert_snapshot!(report.to_string(), @r###"
Metrics for file: model.csv
Skipped 2 malformed rows
Class 1 Metrics:
Precision: 0.5000
Recall: 1.0000
F1 Score: 0.6667
Class 2 Metrics:
Precision: 1.0000
Recall: 0.5000
F1 Score: 0.6667
Class 3 Metrics:
Precision: 1.0000
Recall: 1.0000
F1 Score: 1.0000
Accuracy: 0.7500
Cross-Entropy: 0.8664

Confusion Matrix:
|      | y=1 | y=2 | y=3 |
|------|-----|-----|-----|
| y^=1 | 1   | 1   | 0   |
| y^=2 | 0   | 1   | 0   |
| y^=3 | 0   | 0   | 1   |
Macro Precision: 0.8333
Macro Recall: 0.8333
Macro F1 Score: 0.7778
"###);
}

#[test]
fn test_regression_report_and_summary() {
	let samples = [
		RegressionSample {
			label: 2.0,
			prediction: 1.5,
		},
		RegressionSample {
			label: 4.0,
			prediction: 5.0,
		},
	];
	let evaluation = RegressionEvaluation::compute(&samples);
	let report = RegressionReport {
		model: "model_1.csv",
		evaluation: &evaluation,
		metrics: &[
			RegressionMetric::MeanSquaredError,
			RegressionMetric::MeanAbsoluteError,
		],
		n_malformed: 1,
	};
	insta::assert_snapshot!(report.to_string(), @r###"
For model_1.csv
Skipped 1 malformed row
    MSE = 0.62500
    MAE = 0.75000
"###);
	let best = [
		BestModel {
			metric: ComparisonMetric::Regression(RegressionMetric::MeanSquaredError),
			model: "model_2.csv".to_owned(),
			value: 0.2,
		},
		BestModel {
			metric: ComparisonMetric::AucRoc,
			model: "model_3.csv".to_owned(),
			value: 0.9,
		},
	];
	insta::assert_snapshot!(Summary(&best).to_string(), @r###"
--- Summary ---
According to MSE, The best model is model_2.csv
According to AUC ROC, The best model is model_3.csv
"###);
}
