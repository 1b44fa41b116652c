pub use crate::config::*;
use crate::config::{check_columns, check_row_length};

/// A builder for assembling a survey table row by row.
///
/// This is what the file readers use: the header is checked once, and every row
/// is checked against it when it is added.
///
/// ```
/// pub use survey_report::builder::Builder;
/// # use survey_report::TableError;
///
/// let mut builder = Builder::new(&["gender".to_string(), "Q36".to_string()])?;
///
/// builder.add_row_simple(&["Female", "Yes"])?;
/// builder.add_row_simple(&["", "NA"])?;
///
/// let table = builder.build().without_empty_rows();
/// assert_eq!(table.row_count(), 1);
/// # Ok::<(), TableError>(())
/// ```
pub struct Builder {
    pub(crate) _columns: Vec<String>,
    pub(crate) _rows: Vec<Vec<Cell>>,
}

impl Builder {
    pub fn new(columns: &[String]) -> Result<Builder, TableError> {
        check_columns(columns)?;
        Ok(Builder {
            _columns: columns.to_vec(),
            _rows: Vec::new(),
        })
    }

    /// Adds a row of raw text cells.
    ///
    /// Every cell is classified as missing, numeric or text, see [Cell::parse].
    pub fn add_row_simple(&mut self, raw: &[&str]) -> Result<(), TableError> {
        self.add_row(raw.iter().map(|s| Cell::parse(s)).collect())
    }

    /// Adds a row of cells that have already been classified.
    pub fn add_row(&mut self, cells: Vec<Cell>) -> Result<(), TableError> {
        check_row_length(self._rows.len(), self._columns.len(), &cells)?;
        self._rows.push(cells);
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self._rows.len()
    }

    pub fn build(self) -> Table {
        Table {
            columns: self._columns,
            rows: self._rows,
        }
    }
}
