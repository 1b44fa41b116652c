use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::path::Path;

use text_diff::print_diff;

use survey_report::TableError;

use crate::args::Args;

mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod output;
mod pages;
mod store;

use crate::dashboard::config_reader::*;
use crate::dashboard::pages::*;
use crate::dashboard::store::*;

#[derive(Debug, Snafu)]
pub enum DashboardError {
    #[snafu(display("Survey data not found at {path}. Please ensure the data file exists."))]
    DataNotFound { path: String },
    #[snafu(display("Error opening data file {path}: {source}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading data file {path} (line {lineno}): {source}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error reading data file {path}: no header row"))]
    EmptyData { path: String },
    #[snafu(display("Error opening workbook {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Error reading workbook {path}: no worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Error reading data file {path}: {source}"))]
    MalformedTable { source: TableError, path: String },

    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV file {path}: {source}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},

    #[snafu(display("Unknown input type {input_type:?} (expected csv or xlsx)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Unknown page {page:?} (expected welcome, report or graph)"))]
    UnknownPage { page: String },
    #[snafu(display("Unknown question type {label:?}"))]
    UnknownQuestionType { label: String },
    #[snafu(display("Question {question:?} is not part of the {question_type} questions"))]
    UnknownQuestion {
        question: String,
        question_type: String,
    },
    #[snafu(display("Unknown variable {label:?}"))]
    UnknownVariable { label: String },
    #[snafu(display("Difference detected between the rendered page and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

impl DashboardError {
    /// Errors raised while loading the survey data. They stop the current page.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            DashboardError::DataNotFound { .. }
                | DashboardError::OpeningCsv { .. }
                | DashboardError::CsvLineParse { .. }
                | DashboardError::EmptyData { .. }
                | DashboardError::OpeningExcel { .. }
                | DashboardError::MissingWorksheet { .. }
                | DashboardError::MalformedTable { .. }
        )
    }
}

pub type DashResult<T> = Result<T, DashboardError>;
pub type BDashResult<T> = Result<T, Box<DashboardError>>;

fn check_convert_target(store: &DataStore, target: &str) -> DashResult<()> {
    if Path::new(target) == store.path() {
        whatever!("Refusing to overwrite the input file {}", target);
    }
    Ok(())
}

fn convert(store: &DataStore, target: &str) -> BDashResult<()> {
    check_convert_target(store, target)?;
    let table = store.table()?;
    let num_rows = io_csv::write_csv_table(&table, target)?;
    info!(
        "convert: wrote {} rows and {} columns to {:?}",
        num_rows,
        table.columns().len(),
        target
    );
    println!(
        "Converted {} rows from {} to {}",
        num_rows,
        store.path().display(),
        target
    );
    Ok(())
}

fn render(page: Page, store: &DataStore, settings: &Settings, args: &Args) -> BDashResult<Rendered> {
    match page {
        Page::Welcome => Ok(render_welcome(&settings.title)),
        Page::SurveyReport => render_survey_report(store),
        Page::BuildAGraph => {
            let selection = Selection::from_args(
                args.question_type.as_deref(),
                args.question.as_deref(),
                args.variable.as_deref(),
            )?;
            render_build_a_graph(store, &selection, args.show_structure)
        }
    }
}

/// Renders one page of the dashboard.
///
/// The page is printed on the standard output. The JSON version of the page
/// is written to the output location if one is given, and compared to the
/// reference if one is given.
pub fn run(args: &Args) -> BDashResult<()> {
    let settings = read_settings(args)?;
    debug!("run: settings: {:?}", settings);
    let store = DataStore::new(settings.source.clone());

    if let Some(target) = &args.convert {
        return convert(&store, target);
    }

    let page = Page::from_arg(args.page.as_deref())?;
    print!("{}", render_header(&settings.title, page));

    // A load failure stops the page here. It is reported by the caller.
    let rendered = render(page, &store, &settings, args).map_err(|e| {
        if e.is_load_failure() {
            warn!("run: could not load the survey data: {:?}", e);
        }
        e
    })?;
    debug!("run: rendered {:?} (data loaded: {})", page, store.is_loaded());
    print!("{}", rendered.text);

    let pretty_js = serde_json::to_string_pretty(&rendered.document).context(ParsingJsonSnafu {})?;
    if let Some(out) = &settings.output {
        output::write_document(out, &pretty_js)?;
    }

    // The reference page, if provided for comparison
    if let Some(reference_p) = &args.reference {
        check_reference(reference_p, &pretty_js)?;
    }
    Ok(())
}

fn check_reference(reference_p: &str, pretty_js: &str) -> BDashResult<()> {
    let reference = read_reference(reference_p)?;
    let pretty_reference = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    if pretty_reference != pretty_js {
        warn!("Found differences with the reference page {:?}", reference_p);
        print_diff(pretty_reference.as_str(), pretty_js, "\n");
        return Err(Box::new(DashboardError::ReferenceMismatch {
            path: reference_p.to_string(),
        }));
    }
    info!("check_reference: page identical to {:?}", reference_p);
    Ok(())
}
