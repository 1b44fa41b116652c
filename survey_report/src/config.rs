// ********* Input data structures ***********

use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;

/// The content of one cell of a survey table.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    /// No answer: an empty cell or one of the conventional missing-value markers.
    Missing,
    Text(String),
    /// A numeric-coded answer, for example a rating on a 1-7 scale.
    Number(f64),
}

/// Markers read as a missing value (in addition to the empty string).
/// This is the list used by the common dataframe CSV readers, so that exports
/// from statistical packages keep their meaning.
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

impl Cell {
    /// Classifies the raw text of a cell.
    ///
    /// Only the empty string and the exact markers are missing: a cell holding
    /// spaces is a text cell. The text is trimmed for the numeric check, and a
    /// text cell keeps its original content.
    pub fn parse(raw: &str) -> Cell {
        if raw.is_empty() || MISSING_MARKERS.contains(&raw) {
            return Cell::Missing;
        }
        match raw.trim().parse::<f64>() {
            Ok(x) if x.is_finite() => Cell::Number(x),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// The label under which this cell is counted, or None if missing.
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(x) => Some(format_number(*x)),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(x) => Some(*x),
            _ => None,
        }
    }
}

/// Integral values are written without a fractional part: 5 and not 5.0
pub fn format_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{:.0}", x)
    } else {
        x.to_string()
    }
}

/// A survey table: one row per respondent, columns discovered at runtime.
///
/// Invariants: the column names are unique and every row has exactly one cell
/// per column.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Table {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Table, TableError> {
        check_columns(&columns)?;
        for (idx, row) in rows.iter().enumerate() {
            check_row_length(idx, columns.len(), row)?;
        }
        Ok(Table { columns, rows })
    }

    /// The names of the columns, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn row(&self, idx: usize) -> Option<&[Cell]> {
        self.rows.get(idx).map(|r| r.as_slice())
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// All the values of a column, in row order. Empty if the column does not exist.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |r| r.get(column))
    }

    /// Drops the rows in which every cell is missing.
    pub fn without_empty_rows(self) -> Table {
        let rows = self
            .rows
            .into_iter()
            .filter(|r| !r.iter().all(Cell::is_missing))
            .collect();
        Table {
            columns: self.columns,
            rows,
        }
    }
}

pub(crate) fn check_columns(columns: &[String]) -> Result<(), TableError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for c in columns.iter() {
        if !seen.insert(c.as_str()) {
            return Err(TableError::DuplicateColumn(c.clone()));
        }
    }
    Ok(())
}

pub(crate) fn check_row_length(row: usize, expected: usize, cells: &[Cell]) -> Result<(), TableError> {
    if cells.len() != expected {
        return Err(TableError::RowLength {
            row,
            expected,
            found: cells.len(),
        });
    }
    Ok(())
}

/// Errors that prevent a table from being assembled.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TableError {
    DuplicateColumn(String),
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl Error for TableError {}

impl Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::DuplicateColumn(name) => write!(f, "duplicate column name {:?}", name),
            TableError::RowLength {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} cells, expected {} (one per column)",
                row, found, expected
            ),
        }
    }
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// The distribution of a demographic column, by descending count.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DemographicSummary {
    pub column: String,
    pub rows: Vec<CategoryCount>,
}

impl DemographicSummary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }
}

/// How a question identifier was matched to a column of the table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ColumnResolution {
    /// A column carries exactly this name.
    Exact(String),
    /// No exact match: the first column (in table order) whose name contains
    /// the identifier, ignoring case. All the matching columns are kept so
    /// that an ambiguous match can be reported.
    Substring {
        column: String,
        candidates: Vec<String>,
    },
    Unresolved,
}

impl ColumnResolution {
    pub fn column(&self) -> Option<&str> {
        match self {
            ColumnResolution::Exact(c) => Some(c.as_str()),
            ColumnResolution::Substring { column, .. } => Some(column.as_str()),
            ColumnResolution::Unresolved => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ColumnResolution::Substring { candidates, .. } if candidates.len() > 1)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ResponseRow {
    /// The value of the grouping variable, for grouped summaries.
    pub variable: Option<String>,
    pub response: String,
    pub count: u64,
    /// Only filled after proportion enrichment.
    pub proportion: Option<f64>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ResponseSummary {
    /// The question identifier as requested.
    pub question: String,
    pub resolution: ColumnResolution,
    /// The grouping column actually used, if any.
    pub grouping: Option<String>,
    pub rows: Vec<ResponseRow>,
}

impl ResponseSummary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_grouped(&self) -> bool {
        self.grouping.is_some()
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }
}
