//! This module contains the main entrypoint to the modeleval cli.

use self::{
	config::{
		load_config, parse_n_classes, Config, RegressionMetricConfig, Task,
		DEFAULT_REGRESSION_METRICS,
	},
	evaluate::{ModelSource, Plan, TaskPlan},
};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use modeleval_metrics::{RegressionMetric, DEFAULT_THRESHOLD};
use modeleval_rows::DEFAULT_N_CLASSES;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod evaluate;
mod report;

#[derive(Parser)]
#[clap(
	about = "Evaluate and compare the predictions of classification and regression models.",
	setting = clap::AppSettings::DisableHelpSubcommand,
)]
enum Options {
	#[clap(name = "multiclass")]
	Multiclass(MulticlassOptions),
	#[clap(name = "binary")]
	Binary(BinaryOptions),
	#[clap(name = "regression")]
	Regression(RegressionOptions),
	#[clap(name = "run")]
	Run(RunOptions),
}

/// Evaluate a multiclass classifier.
#[derive(Parser, Debug)]
#[clap(long_about = "evaluate multiclass predictions from csv files with rows of the form label, p_1, ..., p_n")]
struct MulticlassOptions {
	/// the paths to your .csv files
	#[clap(default_values = &["model.csv"])]
	files: Vec<PathBuf>,
	/// the number of classes
	#[clap(
		short = 'k',
		long = "classes",
		default_value = "5",
		parse(try_from_str = parse_n_classes)
	)]
	n_classes: usize,
}

/// Evaluate and compare binary classifiers.
#[derive(Parser, Debug)]
#[clap(long_about = "evaluate binary predictions from csv files with rows of the form label, probability")]
struct BinaryOptions {
	/// the paths to your .csv files
	#[clap(default_values = &["model_1.csv", "model_2.csv", "model_3.csv"])]
	files: Vec<PathBuf>,
	/// the probability at or above which a prediction is positive
	#[clap(short, long, default_value = "0.5")]
	threshold: f64,
}

/// Evaluate and compare regression models.
#[derive(Parser, Debug)]
#[clap(long_about = "evaluate regression predictions from csv files with rows of the form label, prediction")]
struct RegressionOptions {
	/// the paths to your .csv files
	#[clap(default_values = &["model_1.csv", "model_2.csv", "model_3.csv"])]
	files: Vec<PathBuf>,
	/// a metric to report, one of mse, rmse, mae, mare, r2
	#[clap(short, long = "metric")]
	metrics: Vec<RegressionMetricConfig>,
}

/// Run an evaluation described by a config file.
#[derive(Parser, Debug)]
struct RunOptions {
	/// the path to a .yaml config file
	#[clap(short, long)]
	config: PathBuf,
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.init();
	let options = Options::parse();
	let result = plan(options).and_then(|plan| {
		let stdout = std::io::stdout();
		let mut stdout = stdout.lock();
		evaluate::run(&plan, &mut stdout)
	});
	if let Err(error) = result {
		eprintln!("{}: {:#}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

fn plan(options: Options) -> Result<Plan> {
	let plan = match options {
		Options::Multiclass(options) => Plan {
			task: TaskPlan::Multiclass {
				n_classes: options.n_classes,
			},
			models: sources(options.files),
		},
		Options::Binary(options) => Plan {
			task: TaskPlan::Binary {
				threshold: options.threshold,
			},
			models: sources(options.files),
		},
		Options::Regression(options) => Plan {
			task: TaskPlan::Regression {
				metrics: regression_metrics(Some(options.metrics)),
			},
			models: sources(options.files),
		},
		Options::Run(options) => plan_from_config(load_config(&options.config)?),
	};
	Ok(plan)
}

fn plan_from_config(config: Config) -> Plan {
	let task = match config.task {
		Task::Multiclass => TaskPlan::Multiclass {
			n_classes: config.n_classes.unwrap_or(DEFAULT_N_CLASSES),
		},
		Task::Binary => TaskPlan::Binary {
			threshold: config.threshold.unwrap_or(DEFAULT_THRESHOLD),
		},
		Task::Regression => TaskPlan::Regression {
			metrics: regression_metrics(config.metrics),
		},
	};
	let models = config
		.models
		.iter()
		.map(|model| ModelSource {
			name: model.name(),
			path: model.path().to_owned(),
		})
		.collect();
	Plan { task, models }
}

fn sources(files: Vec<PathBuf>) -> Vec<ModelSource> {
	files.into_iter().map(ModelSource::from_path).collect()
}

/// Fall back to the default metrics when none are given.
fn regression_metrics(metrics: Option<Vec<RegressionMetricConfig>>) -> Vec<RegressionMetric> {
	let metrics = match metrics {
		Some(metrics) if !metrics.is_empty() => metrics,
		_ => DEFAULT_REGRESSION_METRICS.to_vec(),
	};
	metrics.into_iter().map(RegressionMetric::from).collect()
}

#[test]
fn test_binary_defaults() {
	let options = Options::try_parse_from(&["modeleval", "binary"]).unwrap();
	let plan = plan(options).unwrap();
	let names: Vec<&str> = plan.models.iter().map(|model| model.name.as_str()).collect();
	assert_eq!(names, vec!["model_1.csv", "model_2.csv", "model_3.csv"]);
	assert!(matches!(plan.task, TaskPlan::Binary { threshold } if threshold == 0.5));
}

#[test]
fn test_regression_metric_flags() {
	let options =
		Options::try_parse_from(&["modeleval", "regression", "a.csv", "--metric", "R2", "-m", "rmse"])
			.unwrap();
	let plan = plan(options).unwrap();
	match plan.task {
		TaskPlan::Regression { metrics } => assert_eq!(
			metrics,
			vec![RegressionMetric::R2, RegressionMetric::RootMeanSquaredError]
		),
		_ => panic!("expected a regression plan"),
	}
	assert_eq!(plan.models.len(), 1);
	assert!(Options::try_parse_from(&["modeleval", "regression", "--metric", "mape"]).is_err());
}

#[test]
fn test_multiclass_defaults() {
	let options = Options::try_parse_from(&["modeleval", "multiclass"]).unwrap();
	let plan = plan(options).unwrap();
	assert_eq!(plan.models[0].path, PathBuf::from("model.csv"));
	assert!(matches!(plan.task, TaskPlan::Multiclass { n_classes: 5 }));
}

#[test]
fn test_zero_classes_is_rejected() {
	assert!(Options::try_parse_from(&["modeleval", "multiclass", "--classes", "0"]).is_err());
	let options =
		Options::try_parse_from(&["modeleval", "multiclass", "a.csv", "-k", "3"]).unwrap();
	assert!(matches!(plan(options).unwrap().task, TaskPlan::Multiclass { n_classes: 3 }));
}
