use crate::args::Args;
use crate::dashboard::store::DataSource;
use crate::dashboard::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

use std::fs;
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "data/survey_data.csv";
pub const DEFAULT_TITLE: &str = "DEI in Tech Climate Survey Interactive Report";

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(rename = "dataFile")]
    pub data_file: String,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "reportTitle")]
    pub report_title: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

/// Everything needed to render a page, once the configuration file and the
/// command line have been merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub source: DataSource,
    pub title: String,
    /// A file path or `stdout`.
    pub output: Option<String>,
}

pub fn read_config(path: &str) -> BDashResult<DashboardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DashboardConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    info!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_reference(path: &str) -> BDashResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_reference: {:?}", js);
    Ok(js)
}

// The data file of a configuration is relative to the directory of the configuration.
fn config_data_path(config_path: &str, config: &DashboardConfig) -> DashResult<PathBuf> {
    let data_p = Path::new(config.data_file.as_str());
    if data_p.is_absolute() {
        return Ok(data_p.to_path_buf());
    }
    let root_p = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu {})?;
    Ok(root_p.join(data_p))
}

/// Merges the configuration file (if any) with the command line.
/// The command line takes precedence.
pub fn read_settings(args: &Args) -> BDashResult<Settings> {
    let config: Option<DashboardConfig> = match &args.config {
        Some(config_path) => Some(read_config(config_path)?),
        None => None,
    };

    let path: PathBuf = match (&args.input, &args.config, &config) {
        (Some(input), _, _) => PathBuf::from(input),
        (None, Some(config_path), Some(c)) => config_data_path(config_path, c)?,
        _ => PathBuf::from(DEFAULT_DATA_FILE),
    };
    let input_type: Option<String> = args
        .input_type
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.input_type.clone()));
    let worksheet: Option<String> = args
        .excel_worksheet_name
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.excel_worksheet_name.clone()));
    let source = DataSource::new(path, input_type.as_deref(), worksheet)?;

    let title = config
        .as_ref()
        .and_then(|c| c.report_title.clone())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let output = args
        .out
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.output_path.clone()));
    Ok(Settings {
        source,
        title,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::store::InputType;
    use clap::Parser;

    fn config_path() -> String {
        format!("{}/tests/data/dashboard_config.json", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn defaults_without_configuration() {
        let args = Args::parse_from(["surveydash"]);
        let settings = read_settings(&args).unwrap();
        assert_eq!(settings.source.path, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(settings.source.input_type, InputType::Csv);
        assert_eq!(settings.title, DEFAULT_TITLE);
        assert_eq!(settings.output, None);
    }

    #[test]
    fn configuration_file_is_read() {
        let config = read_config(&config_path()).unwrap();
        assert_eq!(config.data_file, "survey_data.csv");
        assert_eq!(config.input_type.as_deref(), Some("csv"));
        assert_eq!(config.report_title.as_deref(), Some("Climate Survey (test extract)"));
        assert_eq!(config.output_path, None);
    }

    #[test]
    fn data_file_relative_to_configuration() {
        let cp = config_path();
        let args = Args::parse_from(["surveydash", "--config", cp.as_str()]);
        let settings = read_settings(&args).unwrap();
        let expected = Path::new(&cp).parent().unwrap().join("survey_data.csv");
        assert_eq!(settings.source.path, expected);
        assert!(settings.source.path.exists());
        assert_eq!(settings.title, "Climate Survey (test extract)");
    }

    #[test]
    fn command_line_overrides_configuration() {
        let cp = config_path();
        let args = Args::parse_from([
            "surveydash",
            "--config",
            cp.as_str(),
            "--input",
            "other.xlsx",
            "--out",
            "stdout",
        ]);
        let settings = read_settings(&args).unwrap();
        assert_eq!(settings.source.path, PathBuf::from("other.xlsx"));
        // The type given in the configuration file still applies.
        assert_eq!(settings.source.input_type, InputType::Csv);
        assert_eq!(settings.output.as_deref(), Some("stdout"));
    }

    #[test]
    fn missing_configuration_file() {
        let args = Args::parse_from(["surveydash", "--config", "does/not/exist.json"]);
        let err = read_settings(&args).unwrap_err();
        assert!(matches!(*err, DashboardError::OpeningJson { .. }));
    }
}
