// Reading survey exports saved as Excel workbooks.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use survey_report::builder::Builder;
use survey_report::{format_number, Cell, Table};

use crate::dashboard::io_common::header_names;
use crate::dashboard::*;

fn read_cell(elt: &DataType) -> Cell {
    match elt {
        DataType::String(s) => Cell::parse(s),
        DataType::Float(f) => Cell::Number(*f),
        DataType::Int(i) => Cell::Number(*i as f64),
        // Dates keep their calendar form, as in the csv exports
        DataType::DateTime(f) => match elt.as_datetime() {
            Some(dt) => Cell::Text(dt.to_string()),
            None => Cell::Number(*f),
        },
        DataType::Bool(b) => Cell::Text(b.to_string()),
        // Empty and error cells
        _ => Cell::Missing,
    }
}

fn read_header_name(elt: &DataType) -> String {
    match read_cell(elt) {
        Cell::Missing => String::new(),
        Cell::Text(s) => s,
        Cell::Number(x) => format_number(x),
    }
}

fn get_range(path: &str, worksheet: Option<&str>) -> BDashResult<Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let range_o = match worksheet {
        // A worksheet name was provided, use it.
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    };
    match range_o {
        Some(range_r) => Ok(range_r.context(OpeningExcelSnafu { path })?),
        None => match worksheet {
            Some(name) => Err(Box::new(DashboardError::MissingWorksheet {
                path: path.to_string(),
                name: name.to_string(),
            })),
            None => Err(Box::new(DashboardError::EmptyData {
                path: path.to_string(),
            })),
        },
    }
}

/// Reads a worksheet whose first row holds the names of the columns.
/// Without a worksheet name, the first worksheet of the workbook is read.
pub fn read_excel_table(path: &str, worksheet: Option<&str>) -> BDashResult<Table> {
    let wrange = get_range(path, worksheet)?;
    let mut iter = wrange.rows();
    let header = match iter.next() {
        Some(h) => h,
        None => {
            return Err(Box::new(DashboardError::EmptyData {
                path: path.to_string(),
            }))
        }
    };
    let raw_names: Vec<String> = header.iter().map(read_header_name).collect();
    let columns = header_names(&raw_names);
    debug!("read_excel_table: {:?}: columns: {:?}", path, columns);

    let mut builder = Builder::new(&columns).context(MalformedTableSnafu { path })?;
    for row in iter {
        // The range is rectangular, all the rows have the width of the header.
        let cells: Vec<Cell> = row.iter().map(read_cell).collect();
        builder.add_row(cells).context(MalformedTableSnafu { path })?;
    }
    debug!("read_excel_table: {:?}: {} rows", path, builder.num_rows());
    Ok(builder.build())
}
