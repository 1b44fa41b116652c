// Primitives for reading and writing CSV files.

use survey_report::builder::Builder;
use survey_report::{format_number, Cell, Table};

use crate::dashboard::io_common::header_names;
use crate::dashboard::*;

/// Reads a CSV file with a header row.
pub fn read_csv_table(path: &str) -> BDashResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    let mut records = rdr.records();

    let header = match records.next() {
        Some(line_r) => line_r.context(CsvLineParseSnafu { path, lineno: 1_usize })?,
        None => return Err(Box::new(DashboardError::EmptyData { path: path.to_string() })),
    };
    let raw_names: Vec<String> = header.iter().map(|s| s.to_string()).collect();
    let columns = header_names(&raw_names);
    debug!("read_csv_table: {:?}: columns: {:?}", path, columns);
    let mut builder = Builder::new(&columns).context(MalformedTableSnafu { path })?;

    for (idx, line_r) in records.enumerate() {
        // The header is the first line
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let cells: Vec<&str> = line.iter().collect();
        builder
            .add_row_simple(&cells)
            .context(MalformedTableSnafu { path })?;
    }
    debug!("read_csv_table: {:?}: {} rows", path, builder.num_rows());
    Ok(builder.build())
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Missing => String::new(),
        Cell::Text(s) => s.clone(),
        Cell::Number(x) => format_number(*x),
    }
}

/// Writes a table as a flat CSV file. Returns the number of rows written
/// (not counting the header).
pub fn write_csv_table(table: &Table, path: &str) -> BDashResult<usize> {
    let mut wtr = csv::Writer::from_path(path).context(WritingCsvSnafu { path })?;
    wtr.write_record(table.columns())
        .context(WritingCsvSnafu { path })?;
    let mut num_rows = 0;
    for row in table.rows() {
        wtr.write_record(row.iter().map(cell_text))
            .context(WritingCsvSnafu { path })?;
        num_rows += 1;
    }
    wtr.flush().context(WritingOutputSnafu { path })?;
    Ok(num_rows)
}
