/*!
This crate reads recorded model predictions from delimited text files. The first line of every file is a header and is skipped. Each following line is parsed into a sample type from `modeleval_metrics` by its [`ParseRow`](trait.ParseRow.html) implementation. Lines that cannot be parsed are reported and skipped; they never reach an accumulator.
*/

use modeleval_metrics::{BinarySample, InvalidSample, MulticlassSample, RegressionSample};
use modeleval_util::finite::ToFinite;
use std::{
	io::Read,
	path::{Path, PathBuf},
};
use thiserror::Error;

/// The number of class probability columns read for a multiclass model when none is configured.
pub const DEFAULT_N_CLASSES: usize = 5;

/// Reading a file failed as a whole.
#[derive(Debug, Error)]
pub enum ReadError {
	#[error("error reading the csv file {}", .path.display())]
	Unavailable {
		path: PathBuf,
		#[source]
		source: csv::Error,
	},
	#[error("the file {} is empty or only contains a header", .path.display())]
	Empty { path: PathBuf },
}

/// A single line that could not be parsed.
#[derive(Debug, Error, PartialEq)]
#[error("line {line}: {reason}")]
pub struct MalformedRow {
	/// The 1-indexed line number, counting the header.
	pub line: u64,
	pub reason: MalformedReason,
}

#[derive(Debug, Error, PartialEq)]
pub enum MalformedReason {
	#[error("expected at least {expected} fields but found {found}")]
	MissingFields { expected: usize, found: usize },
	#[error("\"{0}\" is not a number")]
	InvalidNumber(String),
	#[error("\"{0}\" is not a finite number")]
	NotFinite(String),
	#[error("\"{0}\" is not a binary label, expected 0 or 1")]
	InvalidBinaryLabel(String),
	#[error(transparent)]
	InvalidSample(#[from] InvalidSample),
	#[error("the line is not valid utf-8")]
	Encoding,
}

/// The rows read from one file.
#[derive(Debug)]
pub struct RowSet<T> {
	pub rows: Vec<T>,
	/// The lines that were skipped, in file order.
	pub malformed: Vec<MalformedRow>,
}

/// Types that can be parsed from a single record of a predictions file.
pub trait ParseRow: Sized {
	type Options;
	fn parse_row(
		record: &csv::StringRecord,
		options: &Self::Options,
	) -> Result<Self, MalformedReason>;
}

/// Multiclass rows are `label, p_1, ..., p_n` where `label` is 1-indexed.
impl ParseRow for MulticlassSample {
	/// The number of classes.
	type Options = usize;
	fn parse_row(record: &csv::StringRecord, n_classes: &usize) -> Result<Self, MalformedReason> {
		let n_classes = *n_classes;
		check_n_fields(record, 1 + n_classes)?;
		let label = parse_integer(&record[0])?;
		let probabilities = (1..=n_classes)
			.map(|index| parse_number(&record[index]))
			.collect::<Result<Vec<f64>, _>>()?;
		Ok(MulticlassSample::new(label, probabilities)?)
	}
}

/// Binary rows are `label, probability` where `label` is 0 or 1.
impl ParseRow for BinarySample {
	type Options = ();
	fn parse_row(record: &csv::StringRecord, _: &()) -> Result<Self, MalformedReason> {
		check_n_fields(record, 2)?;
		let label = match parse_integer(&record[0])? {
			0 => false,
			1 => true,
			_ => return Err(MalformedReason::InvalidBinaryLabel(record[0].to_owned())),
		};
		let probability = parse_number(&record[1])?;
		Ok(BinarySample { label, probability })
	}
}

/// Regression rows are `label, prediction`.
impl ParseRow for RegressionSample {
	type Options = ();
	fn parse_row(record: &csv::StringRecord, _: &()) -> Result<Self, MalformedReason> {
		check_n_fields(record, 2)?;
		let label = parse_number(&record[0])?;
		let prediction = parse_number(&record[1])?;
		Ok(RegressionSample { label, prediction })
	}
}

/// Read every row of the file at `path`.
pub fn read_rows<T>(path: &Path, options: &T::Options) -> Result<RowSet<T>, ReadError>
where
	T: ParseRow,
{
	let file = std::fs::File::open(path).map_err(|error| ReadError::Unavailable {
		path: path.to_owned(),
		source: error.into(),
	})?;
	read_rows_from(file, path, options)
}

/// Read every row from `reader`. `path` names the source in errors and log messages.
pub fn read_rows_from<R, T>(
	reader: R,
	path: &Path,
	options: &T::Options,
) -> Result<RowSet<T>, ReadError>
where
	R: Read,
	T: ParseRow,
{
	let mut reader = csv::ReaderBuilder::new()
		.has_headers(true)
		.flexible(true)
		.trim(csv::Trim::All)
		.from_reader(reader);
	let mut rows = Vec::new();
	let mut malformed = Vec::new();
	let mut record = csv::StringRecord::new();
	loop {
		let line = reader.position().line();
		match reader.read_record(&mut record) {
			Ok(false) => break,
			Ok(true) => {
				// Blank lines are skipped by the reader.
				let line = record.position().map(|position| position.line()).unwrap_or(line);
				match T::parse_row(&record, options) {
					Ok(row) => rows.push(row),
					Err(reason) => malformed.push(MalformedRow { line, reason }),
				}
			}
			Err(error) if error.is_io_error() => {
				return Err(ReadError::Unavailable {
					path: path.to_owned(),
					source: error,
				});
			}
			Err(error) => {
				let line = error.position().map(|position| position.line()).unwrap_or(line);
				malformed.push(MalformedRow {
					line,
					reason: MalformedReason::Encoding,
				});
			}
		}
	}
	for row in malformed.iter() {
		tracing::warn!(
			path = %path.display(),
			line = row.line,
			reason = %row.reason,
			"skipping malformed row"
		);
	}
	if rows.is_empty() {
		return Err(ReadError::Empty {
			path: path.to_owned(),
		});
	}
	tracing::debug!(
		path = %path.display(),
		n_rows = rows.len(),
		n_malformed = malformed.len(),
		"read rows"
	);
	Ok(RowSet { rows, malformed })
}

fn check_n_fields(record: &csv::StringRecord, expected: usize) -> Result<(), MalformedReason> {
	if record.len() < expected {
		Err(MalformedReason::MissingFields {
			expected,
			found: record.len(),
		})
	} else {
		Ok(())
	}
}

fn parse_integer(field: &str) -> Result<usize, MalformedReason> {
	lexical::parse::<usize, _>(field).map_err(|_| MalformedReason::InvalidNumber(field.to_owned()))
}

fn parse_number(field: &str) -> Result<f64, MalformedReason> {
	let value = lexical::parse::<f64, _>(field)
		.map_err(|_| MalformedReason::InvalidNumber(field.to_owned()))?;
	let value = value
		.to_finite()
		.map_err(|_| MalformedReason::NotFinite(field.to_owned()))?;
	Ok(value.get())
}

#[cfg(test)]
fn read<T: ParseRow>(contents: &str, options: &T::Options) -> Result<RowSet<T>, ReadError> {
	read_rows_from(contents.as_bytes(), Path::new("model.csv"), options)
}

#[test]
fn test_read_multiclass() {
	let contents = "\
true,p1,p2,p3
1,0.7,0.2,0.1
3, 0.1, 0.1, 0.8
2,0.3,0.6,0.1,extra
";
	let rows = read::<MulticlassSample>(contents, &3).unwrap();
	assert!(rows.malformed.is_empty());
	let labels: Vec<usize> = rows.rows.iter().map(|row| row.label()).collect();
	assert_eq!(labels, vec![1, 3, 2]);
	assert_eq!(rows.rows[1].probabilities(), &[0.1, 0.1, 0.8]);
	assert_eq!(rows.rows[2].n_classes(), 3);
}

#[test]
fn test_malformed_rows_are_skipped() {
	let contents = "\
true,p1,p2
1,0.7,0.3
x,0.5,0.5
2,0.5
0,0.5,0.5
3,0.5,0.5
2,nan,0.5
2,0.1,0.9
";
	let rows = read::<MulticlassSample>(contents, &2).unwrap();
	assert_eq!(rows.rows.len(), 2);
	let lines: Vec<u64> = rows.malformed.iter().map(|row| row.line).collect();
	assert_eq!(lines, vec![3, 4, 5, 6, 7]);
	assert_eq!(
		rows.malformed[0].reason,
		MalformedReason::InvalidNumber("x".to_owned())
	);
	assert_eq!(
		rows.malformed[1].reason,
		MalformedReason::MissingFields {
			expected: 3,
			found: 2
		}
	);
	assert_eq!(
		rows.malformed[2].reason,
		MalformedReason::InvalidSample(InvalidSample::LabelOutOfRange {
			label: 0,
			n_classes: 2
		})
	);
	assert!(matches!(
		rows.malformed[4].reason,
		MalformedReason::NotFinite(_) | MalformedReason::InvalidNumber(_)
	));
	insta::assert_snapshot!(rows.malformed[3].to_string(), @"line 6: label 3 is out of range for 2 classes");
}

#[test]
fn test_read_binary() {
	let contents = "\
true,predicted
1,0.9
0,0.2
2,0.5
1,1
";
	let rows = read::<BinarySample>(contents, &()).unwrap();
	assert_eq!(
		rows.rows,
		vec![
			BinarySample {
				label: true,
				probability: 0.9
			},
			BinarySample {
				label: false,
				probability: 0.2
			},
			BinarySample {
				label: true,
				probability: 1.0
			},
		]
	);
	assert_eq!(
		rows.malformed,
		vec![MalformedRow {
			line: 4,
			reason: MalformedReason::InvalidBinaryLabel("2".to_owned()),
		}]
	);
}

#[test]
fn test_read_regression() {
	let contents = "\
true,predicted
1.5,1.25
-3e2,-299
";
	let rows = read::<RegressionSample>(contents, &()).unwrap();
	assert_eq!(
		rows.rows,
		vec![
			RegressionSample {
				label: 1.5,
				prediction: 1.25
			},
			RegressionSample {
				label: -300.0,
				prediction: -299.0
			},
		]
	);
}

#[test]
fn test_header_only_is_empty() {
	let result = read::<RegressionSample>("true,predicted\n", &());
	assert!(matches!(result, Err(ReadError::Empty { .. })));
	let result = read::<RegressionSample>("true,predicted\na,b\n", &());
	assert!(matches!(result, Err(ReadError::Empty { .. })));
	let result = read::<RegressionSample>("", &());
	assert!(matches!(result, Err(ReadError::Empty { .. })));
}

#[test]
fn test_missing_file_is_unavailable() {
	let path = Path::new("this/file/does/not/exist.csv");
	let result = read_rows::<BinarySample>(path, &());
	match result {
		Err(error @ ReadError::Unavailable { .. }) => {
			assert_eq!(
				error.to_string(),
				"error reading the csv file this/file/does/not/exist.csv"
			);
		}
		_ => panic!("expected the read to fail"),
	}
}
