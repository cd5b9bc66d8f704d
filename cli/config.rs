/*!
This module defines the `Config` struct, which describes an evaluation run: which kind of model is being evaluated and where its predictions are.

```yaml
task: binary
threshold: 0.5
models:
  - model_1.csv
  - path: predictions/model_2.csv
    name: model_2
```
*/

use anyhow::{format_err, Context, Result};
use modeleval_metrics::RegressionMetric;
use std::path::{Path, PathBuf};

#[derive(Debug, serde::Deserialize)]
pub struct Config {
	pub task: Task,
	pub models: Vec<ModelConfig>,
	/// Multiclass only.
	pub n_classes: Option<usize>,
	/// Binary only.
	pub threshold: Option<f64>,
	/// Regression only.
	pub metrics: Option<Vec<RegressionMetricConfig>>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize)]
pub enum Task {
	#[serde(rename = "multiclass")]
	Multiclass,
	#[serde(rename = "binary")]
	Binary,
	#[serde(rename = "regression")]
	Regression,
}

#[derive(Debug, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum ModelConfig {
	Path(PathBuf),
	Named { path: PathBuf, name: Option<String> },
}

impl ModelConfig {
	pub fn path(&self) -> &Path {
		match self {
			ModelConfig::Path(path) => path,
			ModelConfig::Named { path, .. } => path,
		}
	}

	/// The name given in the config, or the path.
	pub fn name(&self) -> String {
		match self {
			ModelConfig::Named {
				name: Some(name), ..
			} => name.clone(),
			_ => self.path().display().to_string(),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize)]
pub enum RegressionMetricConfig {
	#[serde(rename = "mse")]
	MSE,
	#[serde(rename = "rmse")]
	RMSE,
	#[serde(rename = "mae")]
	MAE,
	#[serde(rename = "mare")]
	MARE,
	#[serde(rename = "r2")]
	R2,
}

impl std::str::FromStr for RegressionMetricConfig {
	type Err = anyhow::Error;
	fn from_str(s: &str) -> Result<Self> {
		match s.to_lowercase().as_str() {
			"mse" => Ok(RegressionMetricConfig::MSE),
			"rmse" => Ok(RegressionMetricConfig::RMSE),
			"mae" => Ok(RegressionMetricConfig::MAE),
			"mare" => Ok(RegressionMetricConfig::MARE),
			"r2" => Ok(RegressionMetricConfig::R2),
			_ => Err(format_err!(
				"unknown regression metric {}, expected one of mse, rmse, mae, mare, r2",
				s
			)),
		}
	}
}

impl From<RegressionMetricConfig> for RegressionMetric {
	fn from(metric: RegressionMetricConfig) -> Self {
		match metric {
			RegressionMetricConfig::MSE => RegressionMetric::MeanSquaredError,
			RegressionMetricConfig::RMSE => RegressionMetric::RootMeanSquaredError,
			RegressionMetricConfig::MAE => RegressionMetric::MeanAbsoluteError,
			RegressionMetricConfig::MARE => RegressionMetric::MeanAbsoluteRelativeError,
			RegressionMetricConfig::R2 => RegressionMetric::R2,
		}
	}
}

/// The regression metrics reported when none are configured.
pub const DEFAULT_REGRESSION_METRICS: &[RegressionMetricConfig] = &[
	RegressionMetricConfig::MSE,
	RegressionMetricConfig::MAE,
	RegressionMetricConfig::MARE,
];

pub fn load_config(config_path: &Path) -> Result<Config> {
	let config = std::fs::read_to_string(config_path)
		.with_context(|| format!("failed to read config file {}", config_path.display()))?;
	let config = parse_config(&config)
		.with_context(|| format!("failed to parse config file {}", config_path.display()))?;
	Ok(config)
}

fn parse_config(config: &str) -> Result<Config> {
	let config: Config = serde_yaml::from_str(config)?;
	if config.models.is_empty() {
		return Err(format_err!("the config must list at least one model"));
	}
	if let Some(n_classes) = config.n_classes {
		check_n_classes(n_classes)?;
	}
	Ok(config)
}

/// A multiclass model needs at least one probability column.
pub fn check_n_classes(n_classes: usize) -> Result<usize> {
	if n_classes == 0 {
		return Err(format_err!("n_classes must be at least 1"));
	}
	Ok(n_classes)
}

/// Parse the `--classes` argument.
pub fn parse_n_classes(value: &str) -> Result<usize> {
	let n_classes = value
		.parse()
		.with_context(|| format!("{} is not a number of classes", value))?;
	check_n_classes(n_classes)
}

#[test]
fn test_parse_config() {
	let config = parse_config(
		"
task: regression
metrics: [mse, r2]
models:
  - model_1.csv
  - path: model_2.csv
    name: second
",
	)
	.unwrap();
	assert_eq!(config.task, Task::Regression);
	assert_eq!(
		config.metrics,
		Some(vec![RegressionMetricConfig::MSE, RegressionMetricConfig::R2])
	);
	let names: Vec<String> = config.models.iter().map(ModelConfig::name).collect();
	assert_eq!(names, vec!["model_1.csv", "second"]);
	assert_eq!(config.models[1].path(), Path::new("model_2.csv"));
}

#[test]
fn test_parse_config_errors() {
	assert!(parse_config("task: binary\nmodels: []\n").is_err());
	assert!(parse_config("task: ranking\nmodels: [a.csv]\n").is_err());
	assert!(parse_config("task: multiclass\nn_classes: 0\nmodels: [a.csv]\n").is_err());
}

#[test]
fn test_parse_n_classes() {
	assert_eq!(parse_n_classes("3").unwrap(), 3);
	assert!(parse_n_classes("0").is_err());
	assert!(parse_n_classes("-1").is_err());
	assert!(parse_n_classes("three").is_err());
}

#[test]
fn test_regression_metric_from_str() {
	assert_eq!(
		"MARE".parse::<RegressionMetricConfig>().unwrap(),
		RegressionMetricConfig::MARE
	);
	assert!("mape".parse::<RegressionMetricConfig>().is_err());
}
