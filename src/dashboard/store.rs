// The survey data, loaded once per process.

use crate::dashboard::io_csv::read_csv_table;
use crate::dashboard::io_excel::read_excel_table;
use crate::dashboard::*;

use survey_report::Table;

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    pub fn parse(input_type: &str) -> DashResult<InputType> {
        match input_type.to_lowercase().as_str() {
            "csv" => Ok(InputType::Csv),
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            _ => UnknownInputTypeSnafu { input_type }.fail(),
        }
    }

    /// From the extension of the file. Anything that is not a workbook is read as csv.
    pub fn infer(path: &Path) -> InputType {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => InputType::Xlsx,
            _ => InputType::Csv,
        }
    }
}

/// Where the survey data comes from.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DataSource {
    pub path: PathBuf,
    pub input_type: InputType,
    /// Only for workbooks. The first worksheet is read when not given.
    pub worksheet: Option<String>,
}

impl DataSource {
    pub fn new(
        path: PathBuf,
        input_type: Option<&str>,
        worksheet: Option<String>,
    ) -> DashResult<DataSource> {
        let input_type = match input_type {
            Some(it) => InputType::parse(it)?,
            None => InputType::infer(&path),
        };
        Ok(DataSource {
            path,
            input_type,
            worksheet,
        })
    }
}

/// Reads the table of a source, without any caching.
///
/// Rows in which every cell is missing are dropped.
pub fn load(source: &DataSource) -> BDashResult<Table> {
    let path = source.path.display().to_string();
    if !source.path.is_file() {
        return Err(Box::new(DashboardError::DataNotFound { path }));
    }
    info!("load: reading {:?} as {:?}", path, source.input_type);
    let table = match source.input_type {
        InputType::Csv => read_csv_table(&path)?,
        InputType::Xlsx => read_excel_table(&path, source.worksheet.as_deref())?,
    };
    let num_read = table.row_count();
    let table = table.without_empty_rows();
    info!(
        "load: {:?}: {} rows ({} empty rows dropped), {} columns",
        path,
        table.row_count(),
        num_read - table.row_count(),
        table.columns().len()
    );
    Ok(table)
}

/// Lazily loaded survey data.
///
/// The file is read on the first successful call to [DataStore::table] and never
/// again. A failed load is not remembered: the next call tries again.
#[derive(Debug)]
pub struct DataStore {
    source: DataSource,
    table: OnceLock<Arc<Table>>,
}

impl DataStore {
    pub fn new(source: DataSource) -> DataStore {
        DataStore {
            source,
            table: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.source.path.as_path()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    pub fn table(&self) -> BDashResult<Arc<Table>> {
        if let Some(t) = self.table.get() {
            debug!("table: cached {:?}", self.source.path);
            return Ok(t.clone());
        }
        let loaded = Arc::new(load(&self.source)?);
        Ok(self.table.get_or_init(|| loaded).clone())
    }
}
