use clap::Parser;

/// This is a terminal dashboard for the DEI in Tech Climate Survey.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A configuration file in JSON format. It tells where the survey data is, and
    /// where to write the rendered page. See the manual of the survey_report crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path or empty) The survey data. Setting this option overrides the data file that may be
    /// specified with the --config option. Defaults to data/survey_data.csv
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. By default, it is inferred from the extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. By default, the first worksheet.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (welcome, report or graph) The page to render. Defaults to the welcome page.
    #[clap(short, long, value_parser)]
    pub page: Option<String>,

    /// (Build-a-Graph) The type of question: Agreement, Adjectives, Course Satisfaction or Discrimination.
    #[clap(long, value_parser)]
    pub question_type: Option<String>,

    /// (Build-a-Graph) The question identifier, for example Q28_2. Defaults to the first question of the type.
    #[clap(long, value_parser)]
    pub question: Option<String>,

    /// (Build-a-Graph) The variable to break down the answers: Gender, Race, First Gen, International, Major,
    /// Preparedness, Work Status or None.
    #[clap(long, value_parser)]
    pub variable: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the rendered page will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a rendered page in JSON format. If provided, surveydash will
    /// check that the page matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path) If specified, the survey data is written as a flat CSV file to this location, and nothing
    /// else is done. This is how Excel exports are prepared for the dashboard.
    #[clap(long, value_parser)]
    pub convert: Option<String>,

    // Other arguments
    /// (Build-a-Graph) If passed as an argument, prints the first rows and the columns of the data.
    #[clap(long, takes_value = false)]
    pub show_structure: bool,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
