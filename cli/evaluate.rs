/*!
This module runs an evaluation: it reads each model's predictions, computes its metrics, writes its report, and finally writes the best model for each metric.
*/

use crate::report::{BinaryReport, MulticlassReport, RegressionReport, Summary};
use anyhow::Result;
use modeleval_metrics::{
	compare_models, failed_metric_results, BinaryEvaluation, BinarySample, ComparisonMetric,
	MetricResult, MulticlassEvaluation, MulticlassSample, RegressionEvaluation, RegressionMetric,
	RegressionSample, BINARY_METRICS,
};
use modeleval_rows::read_rows;
use std::{io::Write, path::PathBuf};

/// What to evaluate.
#[derive(Debug)]
pub struct Plan {
	pub task: TaskPlan,
	pub models: Vec<ModelSource>,
}

#[derive(Debug)]
pub enum TaskPlan {
	Multiclass { n_classes: usize },
	Binary { threshold: f64 },
	Regression { metrics: Vec<RegressionMetric> },
}

#[derive(Debug)]
pub struct ModelSource {
	/// The name used in reports and in the summary.
	pub name: String,
	pub path: PathBuf,
}

impl ModelSource {
	pub fn from_path(path: PathBuf) -> Self {
		Self {
			name: path.display().to_string(),
			path,
		}
	}
}

/**
Evaluate every model in `plan` and write the reports to `output`.

A multiclass run stops at the first model whose predictions cannot be read and returns the error. Binary and regression runs report the error, give the model the worst possible value for every metric, and continue with the next model.
*/
pub fn run(plan: &Plan, output: &mut impl Write) -> Result<()> {
	let results = match &plan.task {
		TaskPlan::Multiclass { n_classes } => run_multiclass(&plan.models, *n_classes, output)?,
		TaskPlan::Binary { threshold } => run_binary(&plan.models, *threshold, output)?,
		TaskPlan::Regression { metrics } => run_regression(&plan.models, metrics, output)?,
	};
	// A single multiclass model has nothing to be compared against.
	let single_multiclass =
		matches!(plan.task, TaskPlan::Multiclass { .. }) && plan.models.len() < 2;
	if !single_multiclass {
		let best = compare_models(&results);
		writeln!(output)?;
		write!(output, "{}", Summary(&best))?;
	}
	Ok(())
}

fn run_multiclass(
	models: &[ModelSource],
	n_classes: usize,
	output: &mut impl Write,
) -> Result<Vec<MetricResult>> {
	let mut results = Vec::new();
	for model in models {
		tracing::info!(model = %model.name, "evaluating multiclass model");
		let rows = read_rows::<MulticlassSample>(&model.path, &n_classes).map_err(|error| {
			tracing::error!(model = %model.name, %error, "aborting the evaluation");
			error
		})?;
		let evaluation = MulticlassEvaluation::compute(&rows.rows, n_classes);
		let report = MulticlassReport {
			model: &model.name,
			evaluation: &evaluation,
			n_malformed: rows.malformed.len(),
		};
		write!(output, "{}", report)?;
		results.extend(evaluation.metric_results(&model.name));
	}
	Ok(results)
}

fn run_binary(
	models: &[ModelSource],
	threshold: f64,
	output: &mut impl Write,
) -> Result<Vec<MetricResult>> {
	let mut results = Vec::new();
	for model in models {
		tracing::info!(model = %model.name, "evaluating binary model");
		match read_rows::<BinarySample>(&model.path, &()) {
			Ok(rows) => {
				let evaluation = BinaryEvaluation::compute(&rows.rows, threshold);
				let report = BinaryReport {
					model: &model.name,
					evaluation: &evaluation,
					n_malformed: rows.malformed.len(),
				};
				write!(output, "{}", report)?;
				results.extend(evaluation.metric_results(&model.name));
			}
			Err(error) => {
				tracing::error!(model = %model.name, %error, "skipping model");
				writeln!(output, "Metrics for file: {}", model.name)?;
				writeln!(output, "{}", capitalize(&error.to_string()))?;
				results.extend(failed_metric_results(&model.name, BINARY_METRICS));
			}
		}
	}
	Ok(results)
}

fn run_regression(
	models: &[ModelSource],
	metrics: &[RegressionMetric],
	output: &mut impl Write,
) -> Result<Vec<MetricResult>> {
	let mut results = Vec::new();
	for model in models {
		tracing::info!(model = %model.name, "evaluating regression model");
		match read_rows::<RegressionSample>(&model.path, &()) {
			Ok(rows) => {
				let evaluation = RegressionEvaluation::compute(&rows.rows);
				let report = RegressionReport {
					model: &model.name,
					evaluation: &evaluation,
					metrics,
					n_malformed: rows.malformed.len(),
				};
				write!(output, "{}", report)?;
				results.extend(evaluation.metric_results(&model.name, metrics));
			}
			Err(error) => {
				tracing::error!(model = %model.name, %error, "skipping model");
				writeln!(output, "For {}", model.name)?;
				writeln!(output, "{}", capitalize(&error.to_string()))?;
				let metrics: Vec<ComparisonMetric> =
					metrics.iter().map(|&metric| metric.into()).collect();
				results.extend(failed_metric_results(&model.name, &metrics));
			}
		}
	}
	Ok(results)
}

fn capitalize(message: &str) -> String {
	let mut chars = message.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
fn write_temp_file(name: &str, contents: &str) -> PathBuf {
	let dir = std::env::temp_dir().join(format!("modeleval-{}", std::process::id()));
	std::fs::create_dir_all(&dir).unwrap();
	let path = dir.join(name);
	std::fs::write(&path, contents).unwrap();
	path
}

#[test]
fn test_binary_run_continues_after_missing_file() {
	let good = write_temp_file("binary_good.csv", "true,predicted\n1,0.9\n0,0.1\n1,0.6\n");
	let plan = Plan {
		task: TaskPlan::Binary { threshold: 0.5 },
		models: vec![
			ModelSource {
				name: "missing.csv".to_owned(),
				path: PathBuf::from("does/not/exist/missing.csv"),
			},
			ModelSource {
				name: "good.csv".to_owned(),
				path: good,
			},
		],
	};
	let mut output = Vec::new();
	run(&plan, &mut output).unwrap();
	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("Metrics for file: missing.csv\nError reading the csv file"));
	assert!(output.contains("Metrics for file: good.csv\nBCE = "));
	for metric in BINARY_METRICS {
		let line = format!("According to {}, The best model is good.csv", metric);
		assert!(output.contains(&line), "missing {:?}", line);
	}
}

#[test]
fn test_multiclass_run_aborts_on_missing_file() {
	let plan = Plan {
		task: TaskPlan::Multiclass { n_classes: 5 },
		models: vec![ModelSource::from_path(PathBuf::from(
			"does/not/exist/model.csv",
		))],
	};
	let mut output = Vec::new();
	assert!(run(&plan, &mut output).is_err());
	assert!(output.is_empty());
}

#[test]
fn test_single_multiclass_run_has_no_summary() {
	let path = write_temp_file(
		"multiclass.csv",
		"true,p1,p2\n1,0.8,0.2\n2,0.3,0.7\n2,0.6,0.4\n",
	);
	let plan = Plan {
		task: TaskPlan::Multiclass { n_classes: 2 },
		models: vec![ModelSource::from_path(path)],
	};
	let mut output = Vec::new();
	run(&plan, &mut output).unwrap();
	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("Accuracy: 0.6667\n"));
	assert!(!output.contains("--- Summary ---"));
}

#[test]
fn test_regression_run_picks_lowest_error() {
	let first = write_temp_file("regression_1.csv", "true,predicted\n1.0,1.5\n2.0,2.5\n");
	let second = write_temp_file("regression_2.csv", "true,predicted\n1.0,1.1\n2.0,x\n");
	let third = write_temp_file("regression_3.csv", "true,predicted\n1.0,3.0\n");
	let plan = Plan {
		task: TaskPlan::Regression {
			metrics: vec![
				RegressionMetric::MeanSquaredError,
				RegressionMetric::MeanAbsoluteError,
				RegressionMetric::MeanAbsoluteRelativeError,
			],
		},
		models: vec![first, second, third]
			.into_iter()
			.map(ModelSource::from_path)
			.collect(),
	};
	let mut output = Vec::new();
	run(&plan, &mut output).unwrap();
	let output = String::from_utf8(output).unwrap();
	let summary = &output[output.find("--- Summary ---").unwrap()..];
	let second_name = plan.models[1].name.clone();
	for metric in &["MSE", "MAE", "MARE"] {
		let line = format!("According to {}, The best model is {}", metric, second_name);
		assert!(summary.contains(&line), "missing {:?}", line);
	}
	assert!(output.contains("Skipped 1 malformed row\n"));
}

#[test]
fn test_unreadable_model_never_wins_undefined_auc() {
	// every label is positive, so the readable model's AUC is NaN
	let single_class = write_temp_file(
		"binary_single_class.csv",
		"true,predicted\n1,0.9\n1,0.6\n",
	);
	let plan = Plan {
		task: TaskPlan::Binary { threshold: 0.5 },
		models: vec![
			ModelSource {
				name: "missing.csv".to_owned(),
				path: PathBuf::from("does/not/exist/missing.csv"),
			},
			ModelSource {
				name: "single_class.csv".to_owned(),
				path: single_class,
			},
		],
	};
	let mut output = Vec::new();
	run(&plan, &mut output).unwrap();
	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("AUC ROC = NaN\n"));
	let summary = &output[output.find("--- Summary ---").unwrap()..];
	assert!(!summary.contains("According to AUC ROC"));
	assert!(!summary.contains("missing.csv"));
	assert!(summary.contains("According to Accuracy, The best model is single_class.csv"));
}

#[test]
fn test_regression_run_continues_after_missing_file() {
	let readable = write_temp_file(
		"regression_readable.csv",
		"true,predicted\n1.0,1.5\n3.0,3.0\n",
	);
	let plan = Plan {
		task: TaskPlan::Regression {
			metrics: vec![RegressionMetric::MeanSquaredError, RegressionMetric::R2],
		},
		models: vec![
			ModelSource {
				name: "nope/m.csv".to_owned(),
				path: PathBuf::from("nope/m.csv"),
			},
			ModelSource {
				name: "readable.csv".to_owned(),
				path: readable,
			},
		],
	};
	let mut output = Vec::new();
	run(&plan, &mut output).unwrap();
	let output = String::from_utf8(output).unwrap();
	assert!(output.starts_with("For nope/m.csv\nError reading the csv file nope/m.csv\n"));
	assert!(output.contains("For readable.csv\n    MSE = 0.12500\n    R2 = 0.87500\n"));
	let summary = &output[output.find("--- Summary ---").unwrap()..];
	insta::assert_snapshot!(summary, @r###"
--- Summary ---
According to MSE, The best model is readable.csv
According to R2, The best model is readable.csv
"###);
}
