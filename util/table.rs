use ndarray::prelude::*;

/// A table of strings that renders with every column padded to the width of its widest cell.
pub struct Table {
	padding: usize,
	header: Vec<String>,
	values: Array2<String>,
}

impl Table {
	/// `values` must have one column per `header` entry.
	pub fn new(header: Vec<String>, values: Array2<String>) -> Self {
		Self {
			padding: 1,
			header,
			values,
		}
	}
}

impl std::fmt::Display for Table {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		// update column widths with header
		let mut column_widths: Vec<usize> = self.header.iter().map(|header| header.len()).collect();
		// update column widths with values
		column_widths
			.iter_mut()
			.zip(self.values.axis_iter(Axis(1)))
			.for_each(|(column_width, column)| {
				column.iter().for_each(|value| {
					*column_width = usize::max(*column_width, value.len());
				})
			});
		// write header
		let line = Line {
			column_widths: &column_widths,
			padding: self.padding,
		};
		let row = Row {
			column_widths: &column_widths,
			padding: self.padding,
			values: self.header.iter(),
		};
		writeln!(f, "{}", row)?;
		writeln!(f, "{}", line)?;
		// write values
		for values in self.values.rows() {
			let row = Row {
				column_widths: &column_widths,
				padding: self.padding,
				values: values.iter(),
			};
			writeln!(f, "{}", row)?;
		}
		Ok(())
	}
}

struct Line<'a> {
	column_widths: &'a [usize],
	padding: usize,
}

impl<'a> std::fmt::Display for Line<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "|")?;
		for column_width in self.column_widths.iter() {
			for _ in 0..column_width + 2 * self.padding {
				write!(f, "-")?;
			}
			write!(f, "|")?;
		}
		Ok(())
	}
}

struct Row<'a, I>
where
	I: Iterator<Item = &'a String> + Clone,
{
	column_widths: &'a [usize],
	padding: usize,
	values: I,
}

impl<'a, I> std::fmt::Display for Row<'a, I>
where
	I: Iterator<Item = &'a String> + Clone,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "|")?;
		for (column_width, value) in self.column_widths.iter().zip(self.values.clone()) {
			for _ in 0..self.padding {
				write!(f, " ")?;
			}
			write!(f, "{}", value)?;
			for _ in 0..column_width + self.padding - value.len() {
				write!(f, " ")?;
			}
			write!(f, "|")?;
		}
		Ok(())
	}
}

#[test]
fn test_table() {
	let header = vec![String::new(), "y=1".to_owned(), "y=0".to_owned()];
	let values = arr2(&[["y^=1", "12", "3"], ["y^=0", "4", "1024"]]).mapv(|value| value.to_owned());
	let table = Table::new(header, values);
	insta::assert_snapshot!(table.to_string(), @r###"
|      | y=1 | y=0  |
|------|-----|------|
| y^=1 | 12  | 3    |
| y^=0 | 4   | 1024 |
"###);
}
