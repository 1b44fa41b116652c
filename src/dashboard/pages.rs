// The three pages of the dashboard.
//
// Every page renders into a block of text for the terminal and a JSON document
// holding the same charts and tables.

use std::fmt::Write;

use serde_json::json;
use serde_json::Value as JSValue;

use survey_report::catalog::*;
use survey_report::chart::*;
use survey_report::*;

use crate::dashboard::io_common::simplify_file_name;
use crate::dashboard::output::*;
use crate::dashboard::store::DataStore;
use crate::dashboard::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Page {
    Welcome,
    SurveyReport,
    BuildAGraph,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Welcome => "Welcome",
            Page::SurveyReport => "Survey Report",
            Page::BuildAGraph => "Build-a-Graph",
        }
    }

    /// Accepts the short names (welcome, report, graph) and the titles. Defaults to the welcome page.
    pub fn from_arg(page: Option<&str>) -> DashResult<Page> {
        let page = match page {
            None => return Ok(Page::Welcome),
            Some(p) => p.trim(),
        };
        let all = [Page::Welcome, Page::SurveyReport, Page::BuildAGraph];
        let short = ["welcome", "report", "graph"];
        for (p, s) in all.iter().zip(short.iter()) {
            if page.eq_ignore_ascii_case(s) || page.eq_ignore_ascii_case(p.title()) {
                return Ok(*p);
            }
        }
        UnknownPageSnafu { page }.fail()
    }
}

/// The choices made on the Build-a-Graph page.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Selection {
    pub question_type: QuestionType,
    pub question: &'static Question,
    pub variable: &'static VariableOption,
    /// The column to group by, None for no grouping.
    pub grouping: Option<&'static str>,
}

impl Selection {
    /// Without a choice: the first question type, its first question, and no grouping.
    pub fn from_args(
        question_type: Option<&str>,
        question: Option<&str>,
        variable: Option<&str>,
    ) -> DashResult<Selection> {
        let question_type = match question_type {
            Some(label) => {
                QuestionType::from_label(label).context(UnknownQuestionTypeSnafu { label })?
            }
            None => QuestionType::ALL[0],
        };
        let question = match question {
            Some(id) => question_type
                .questions()
                .iter()
                .find(|q| q.id.eq_ignore_ascii_case(id.trim()))
                .context(UnknownQuestionSnafu {
                    question: id,
                    question_type: question_type.label(),
                })?,
            None => question_type
                .questions()
                .first()
                .context(UnknownQuestionSnafu {
                    question: "",
                    question_type: question_type.label(),
                })?,
        };
        let label = variable.unwrap_or(NO_VARIABLE_LABEL);
        let variable = VARIABLE_OPTIONS
            .iter()
            .find(|v| v.label.eq_ignore_ascii_case(label.trim()))
            .context(UnknownVariableSnafu { label })?;
        let grouping = grouping_column(variable.label).flatten();
        debug!(
            "from_args: {:?} {:?} {:?} grouping: {:?}",
            question_type, question.id, variable.label, grouping
        );
        Ok(Selection {
            question_type,
            question,
            variable,
            grouping,
        })
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Rendered {
    pub text: String,
    pub document: JSValue,
}

pub fn render_header(title: &str, page: Page) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    let _ = writeln!(out);
    let _ = writeln!(out, "## {}", page.title());
    let _ = writeln!(out);
    out
}

// ********* Welcome **********

const WELCOME_HEADING: &str = "Welcome to the 2022 DEI in Tech Climate Survey Report";
const COLLECTIVE_LINK: &str = "https://sites.bu.edu/dei-in-tech/";

const WELCOME_SECTIONS: [(&str, &str); 4] = [
    (
        "",
        "This report is brought to you by the DEI Tech Collective. The Collective is an opportunity \
for BU tech and computing groups to unite around efforts to educate each other and address \
inequity issues within the community.",
    ),
    (
        "What is the DEI in Tech Climate Survey?",
        "The DEI in Tech Climate Survey was curated by Shateva Long (CAS '23) and was administered \
in the Spring of 2022 by the BU DEI Tech Collective. The purpose of this survey was to assess the \
climate of tech departments at Boston University and begin to fill that data gap.",
    ),
    (
        "What can I do on this site?",
        "Navigate to the \"Survey Report\" tab to view the entire Climate Survey Report. This page \
includes:\n- Additional survey background details\n- BU population data overview\n- Display of \
respondent demographics\n- Explanations of survey sections and accompanying trends\n- Disclaimers \
and challenges to be aware of",
    ),
    (
        "",
        "Navigate to the \"Build-a-Graph\" tab to interact with the data yourself. Here you can \
select specific questions from the survey and filter by variables to better understand how \
different types of students responded.",
    ),
];

fn render_sections(out: &mut String, sections: &[(&str, &str)]) -> Vec<JSValue> {
    let mut js: Vec<JSValue> = Vec::new();
    for (heading, body) in sections.iter() {
        if !heading.is_empty() {
            let _ = writeln!(out, "### {}", heading);
        }
        let _ = writeln!(out, "{}", body);
        let _ = writeln!(out);
        js.push(json!({"heading": heading, "body": body}));
    }
    js
}

/// The welcome page is static: it does not need the survey data.
pub fn render_welcome(title: &str) -> Rendered {
    let mut text = String::new();
    let _ = writeln!(text, "### {}", WELCOME_HEADING);
    let _ = writeln!(text);
    let sections = render_sections(&mut text, &WELCOME_SECTIONS[..1]);
    let _ = writeln!(text, "DEI Tech Collective website: {}", COLLECTIVE_LINK);
    let _ = writeln!(text);
    let more = render_sections(&mut text, &WELCOME_SECTIONS[1..]);
    let all_sections: Vec<JSValue> = sections.into_iter().chain(more).collect();
    let document = json!({
        "page": Page::Welcome.title(),
        "title": title,
        "heading": WELCOME_HEADING,
        "link": COLLECTIVE_LINK,
        "sections": all_sections,
    });
    Rendered { text, document }
}

// ********* Survey Report **********

const EXECUTIVE_SUMMARY: &str = "The purpose of the DEI in Tech Climate Survey was to assess the \
climate of tech departments at Boston University and begin to fill that data gap. Areas across the \
university are determining new goals and policies to address inequity, and the data gathered here \
is meant to contribute to the evidence-based formation of effective initiatives.";

const REPORT_NARRATIVE: [(&str, &str); 2] = [
    (
        "Course and Department Satisfaction",
        "The course satisfaction section asked respondents to identify their level of satisfaction \
with instructional support (support from professors) in classes within their major. For a \
particular class, a student indicates they are extremely satisfied, somewhat satisfied, neither \
satisfied or dissatisfied, somewhat dissatisfied, extremely dissatisfied, or did not take that \
course.",
    ),
    (
        "Agreement with Experiences",
        "The agreement with experiences section asked respondents to identify their level of \
agreement with various experiences by selecting an option of strongly disagree, disagree, agree, \
and strongly agree.",
    ),
];

fn demographic_section(out: &mut String, table: &Table, label: &str) -> JSValue {
    let _ = writeln!(out, "### {}", label);
    let column = variable_column(label).unwrap_or(NO_GROUPING);
    let summary = demographic_summary(table, column);
    if summary.is_empty() {
        warn!("demographic_section: no data for {:?} ({:?})", label, column);
        let message = format!("Could not process {} data", label);
        let _ = writeln!(out, "{}", message);
        let _ = writeln!(out);
        return json!({"label": label, "column": column, "error": message});
    }
    let bar = demographic_bar(&summary, label);
    let pie = demographic_pie(&summary, label);
    let _ = writeln!(out, "{}", render_chart(&bar));
    let _ = writeln!(out, "{}", render_chart(&pie));
    let _ = writeln!(out, "{}", render_demographic_table(&summary));
    json!({
        "label": label,
        "column": column,
        "charts": [chart_to_json(&bar), chart_to_json(&pie)],
        "table": demographic_to_json(&summary),
    })
}

pub fn render_survey_report(store: &DataStore) -> BDashResult<Rendered> {
    let table = store.table()?;
    let mut text = String::new();
    let _ = writeln!(text, "### Executive Summary");
    let _ = writeln!(text, "{}", EXECUTIVE_SUMMARY);
    let _ = writeln!(text);
    let _ = writeln!(text, "### Respondent Demographics");
    let _ = writeln!(text, "Total responses: {}", table.row_count());
    let _ = writeln!(text);

    let sections: Vec<JSValue> = REPORT_DEMOGRAPHICS
        .iter()
        .map(|label| demographic_section(&mut text, &table, label))
        .collect();
    let narrative = render_sections(&mut text, &REPORT_NARRATIVE);

    let document = json!({
        "page": Page::SurveyReport.title(),
        "executiveSummary": EXECUTIVE_SUMMARY,
        "totalResponses": table.row_count(),
        "sections": sections,
        "narrative": narrative,
    });
    Ok(Rendered { text, document })
}

// ********* Build-a-Graph **********

/// The first rows and the columns of the table.
pub fn render_structure(table: &Table, path: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Data file: {}",
        simplify_file_name(&path.display().to_string())
    );
    let _ = writeln!(out, "First few rows of data:");
    let headers: Vec<&str> = table.columns().iter().map(|c| c.as_str()).collect();
    let rows: Vec<Vec<String>> = table
        .rows()
        .take(5)
        .map(|row| row.iter().map(|c| c.label().unwrap_or_default()).collect())
        .collect();
    let _ = writeln!(out, "{}", render_table(&headers, &rows));
    let _ = writeln!(out, "Column names:");
    let _ = writeln!(out, "{:?}", table.columns());
    let _ = writeln!(out);
    out
}

pub fn render_build_a_graph(
    store: &DataStore,
    selection: &Selection,
    show_structure: bool,
) -> BDashResult<Rendered> {
    let table = store.table()?;
    let question = selection.question;
    let mut text = String::new();
    if show_structure {
        text.push_str(&render_structure(&table, store.path()));
    }

    let type_label = selection.question_type.label();
    let _ = writeln!(text, "Question type: {}", type_label);
    let _ = writeln!(text, "Questions: {}", questions(type_label).join(", "));
    let _ = writeln!(text, "Question: {} ({})", question.id, question.wording);
    let _ = writeln!(text, "Variable: {}", selection.variable.label);

    let matching = matching_columns(&table, question.id);
    if !matching.is_empty() {
        let _ = writeln!(text, "Found matching columns: {:?}", matching);
    }
    let summary = response_summary(&table, question.id, selection.grouping);
    if let ColumnResolution::Substring { column, candidates } = &summary.resolution {
        if candidates.len() > 1 {
            let _ = writeln!(
                text,
                "Warning: {} matches {} columns, using {}",
                question.id,
                candidates.len(),
                column
            );
        }
    }
    let _ = writeln!(text);

    let mut document = json!({
        "page": Page::BuildAGraph.title(),
        "questionType": type_label,
        "question": question.id,
        "wording": question.wording,
        "variable": selection.variable.label,
        "grouping": summary.grouping,
        "matchingColumns": matching,
        "column": summary.resolution.column(),
        "ambiguous": summary.resolution.is_ambiguous(),
    });

    if summary.is_empty() {
        let message = "No responses available for the selected question";
        let _ = writeln!(text, "{}", message);
        let _ = writeln!(text, "Debug info:");
        let _ = writeln!(text, "Selected question: {}", question.id);
        let _ = writeln!(
            text,
            "Variable value: {}",
            selection.grouping.unwrap_or(NO_GROUPING)
        );
        document["message"] = json!(message);
        document["charts"] = json!([]);
        document["responses"] = json!([]);
        return Ok(Rendered { text, document });
    }

    let mut charts: Vec<ChartSpec> = vec![response_counts(&summary), response_proportions(&summary)];
    if selection.question_type.is_rating() {
        charts.push(rating_distribution(&table, question.id));
    }
    for chart in charts.iter() {
        let _ = writeln!(text, "{}", render_chart(chart));
    }
    let _ = writeln!(text, "#### Response Data");
    let _ = writeln!(text, "{}", render_response_table(&summary));

    let charts_js: Vec<JSValue> = charts.iter().map(chart_to_json).collect();
    document["charts"] = json!(charts_js);
    document["responses"] = json!(responses_to_json(&summary));
    Ok(Rendered { text, document })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::store::DataSource;
    use std::path::PathBuf;

    fn survey_store() -> DataStore {
        let p = format!("{}/tests/data/survey_data.csv", env!("CARGO_MANIFEST_DIR"));
        DataStore::new(DataSource::new(PathBuf::from(p), None, None).unwrap())
    }

    #[test]
    fn pages_from_arguments() {
        assert_eq!(Page::from_arg(None).unwrap(), Page::Welcome);
        assert_eq!(Page::from_arg(Some("report")).unwrap(), Page::SurveyReport);
        assert_eq!(Page::from_arg(Some("Build-a-Graph")).unwrap(), Page::BuildAGraph);
        assert_eq!(Page::from_arg(Some(" GRAPH ")).unwrap(), Page::BuildAGraph);
        assert!(Page::from_arg(Some("settings")).is_err());
    }

    #[test]
    fn default_selection() {
        let s = Selection::from_args(None, None, None).unwrap();
        assert_eq!(s.question_type, QuestionType::Agreement);
        assert_eq!(s.question.id, "Q28_2");
        assert_eq!(s.variable.label, "None");
        assert_eq!(s.grouping, None);
    }

    #[test]
    fn explicit_selection() {
        let s = Selection::from_args(Some("adjectives"), Some("q24_12"), Some("Work Status")).unwrap();
        assert_eq!(s.question_type, QuestionType::Adjectives);
        assert_eq!(s.question.id, "Q24_12");
        assert_eq!(s.grouping, Some("work_status"));
        assert!(matches!(
            Selection::from_args(Some("Adjectives"), Some("Q36"), None),
            Err(DashboardError::UnknownQuestion { .. })
        ));
        assert!(matches!(
            Selection::from_args(None, None, Some("Age")),
            Err(DashboardError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn welcome_is_static() {
        let r = render_welcome("Title");
        assert!(r.text.starts_with("### Welcome to the 2022 DEI in Tech Climate Survey Report\n"));
        assert!(r.text.contains("https://sites.bu.edu/dei-in-tech/"));
        assert_eq!(r.document["sections"].as_array().unwrap().len(), 4);
        assert_eq!(r.document["title"], json!("Title"));
    }

    #[test]
    fn welcome_points_to_the_tabs() {
        let r = render_welcome("Title");
        assert!(r.text.contains("Navigate to the \"Survey Report\" tab to view"));
        assert!(r.text.contains("Navigate to the \"Build-a-Graph\" tab to interact"));
        let body = r.document["sections"][2]["body"].as_str().unwrap();
        assert!(body.starts_with("Navigate to the \"Survey Report\" tab"));
    }

    #[test]
    fn report_sections() {
        let r = render_survey_report(&survey_store()).unwrap();
        assert!(r.text.contains("Total responses: 6\n"));
        let gender = &r.document["sections"][0];
        assert_eq!(gender["label"], json!("Gender"));
        assert_eq!(
            gender["table"],
            json!([
                {"category": "Female", "count": 3},
                {"category": "Male", "count": 1},
                {"category": "Non-binary", "count": 1}
            ])
        );
        assert_eq!(gender["charts"][0]["title"], json!("Gender Distribution"));
        assert_eq!(gender["charts"][1]["kind"], json!("pie"));
        assert!(r.text.contains("### Agreement with Experiences\n"));
    }

    #[test]
    fn graph_with_ambiguous_question() {
        let sel = Selection::from_args(Some("Discrimination"), Some("Q36"), None).unwrap();
        let r = render_build_a_graph(&survey_store(), &sel, false).unwrap();
        assert!(r
            .text
            .contains("Found matching columns: [\"Q36_discrimination\", \"Q36_text\"]\n"));
        assert!(r
            .text
            .contains("Warning: Q36 matches 2 columns, using Q36_discrimination\n"));
        assert_eq!(r.document["column"], json!("Q36_discrimination"));
        assert_eq!(
            r.document["responses"],
            json!([{"response": "Yes", "count": 3}, {"response": "No", "count": 1}])
        );
    }

    #[test]
    fn graph_for_adjectives_has_a_box_chart() {
        let sel = Selection::from_args(Some("Adjectives"), Some("Q24_1"), Some("Gender")).unwrap();
        let r = render_build_a_graph(&survey_store(), &sel, true).unwrap();
        assert!(r.text.starts_with("Data file: survey_data.csv\nFirst few rows of data:\n"));
        let charts = r.document["charts"].as_array().unwrap();
        assert_eq!(charts.len(), 3);
        assert_eq!(charts[2]["kind"], json!("box"));
        assert_eq!(charts[2]["box"]["outliers"], json!([20.0]));
        assert_eq!(charts[0]["title"], json!("Responses for Q24_1 by gender"));
    }

    #[test]
    fn graph_without_responses() {
        // No column of the test extract matches Q38.
        let sel = Selection::from_args(Some("Discrimination"), Some("Q38"), Some("Major")).unwrap();
        let r = render_build_a_graph(&survey_store(), &sel, false).unwrap();
        assert!(r.text.contains(
            "No responses available for the selected question\nDebug info:\nSelected question: Q38\nVariable value: major\n"
        ));
        assert_eq!(r.document["charts"], json!([]));
        assert_eq!(r.document["column"], JSValue::Null);
    }
}
