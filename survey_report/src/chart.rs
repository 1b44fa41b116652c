/*!
Chart specifications.

The functions in this module turn summaries into a description of a chart:
its kind, its title and axis labels, and the data series to draw. They do not
draw anything, and they do not modify the summaries they are given.
*/

use log::debug;

use crate::config::*;
use crate::{resolve_column, with_proportions};

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ChartKind {
    Bar,
    Pie,
    Box,
}

/// How the series of a bar chart are placed.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum BarMode {
    /// One series.
    Single,
    /// One series per value of the grouping variable, side by side (not stacked).
    Grouped,
}

/// One data series: a value for each label.
#[derive(PartialEq, Debug, Clone)]
pub struct Series {
    /// The value of the grouping variable, for grouped charts.
    pub name: Option<String>,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Five-number summary of a distribution, as drawn by a box plot.
///
/// The whiskers `min` and `max` are the most extreme observations within 1.5
/// interquartile ranges of the quartiles. Observations beyond are outliers.
#[derive(PartialEq, Debug, Clone)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub outliers: Vec<f64>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Only for bar charts.
    pub bar_mode: Option<BarMode>,
    pub series: Vec<Series>,
    /// Only for box charts. None when there is no numeric observation.
    pub box_stats: Option<BoxStats>,
}

impl ChartSpec {
    /// True if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self.kind {
            ChartKind::Box => self.box_stats.is_none(),
            _ => self.series.iter().all(|s| s.values.is_empty()),
        }
    }
}

fn demographic_series(summary: &DemographicSummary) -> Series {
    Series {
        name: None,
        labels: summary.rows.iter().map(|r| r.category.clone()).collect(),
        values: summary.rows.iter().map(|r| r.count as f64).collect(),
    }
}

/// Bar chart of a demographic summary. `label` is the name shown for the variable.
pub fn demographic_bar(summary: &DemographicSummary, label: &str) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: format!("{} Distribution", label),
        x_label: Some(label.to_string()),
        y_label: Some("Count".to_string()),
        bar_mode: Some(BarMode::Single),
        series: vec![demographic_series(summary)],
        box_stats: None,
    }
}

pub fn demographic_pie(summary: &DemographicSummary, label: &str) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Pie,
        title: format!("{} Distribution", label),
        x_label: None,
        y_label: None,
        bar_mode: None,
        series: vec![demographic_series(summary)],
        box_stats: None,
    }
}

// Splits the rows by variable value, in order of first appearance.
fn response_series(rows: &[ResponseRow], value: impl Fn(&ResponseRow) -> f64) -> Vec<Series> {
    let mut res: Vec<Series> = Vec::new();
    for r in rows.iter() {
        let pos = res.iter().position(|s| s.name == r.variable);
        let series = match pos {
            Some(idx) => &mut res[idx],
            None => {
                res.push(Series {
                    name: r.variable.clone(),
                    labels: Vec::new(),
                    values: Vec::new(),
                });
                let last = res.len() - 1;
                &mut res[last]
            }
        };
        series.labels.push(r.response.clone());
        series.values.push(value(r));
    }
    res
}

fn response_title(prefix: &str, summary: &ResponseSummary) -> String {
    match &summary.grouping {
        Some(g) => format!("{} {} by {}", prefix, summary.question, g),
        None => format!("{} {}", prefix, summary.question),
    }
}

fn bar_mode(summary: &ResponseSummary) -> BarMode {
    if summary.is_grouped() {
        BarMode::Grouped
    } else {
        BarMode::Single
    }
}

/// Bar chart of the counts of a response summary.
pub fn response_counts(summary: &ResponseSummary) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: response_title("Responses for", summary),
        x_label: Some("Response".to_string()),
        y_label: Some("Count".to_string()),
        bar_mode: Some(bar_mode(summary)),
        series: response_series(&summary.rows, |r| r.count as f64),
        box_stats: None,
    }
}

/// Bar chart of the proportions of a response summary.
///
/// The proportions are computed on a copy of the summary.
pub fn response_proportions(summary: &ResponseSummary) -> ChartSpec {
    let enriched = with_proportions(summary);
    ChartSpec {
        kind: ChartKind::Bar,
        title: response_title("Proportion of Responses for", summary),
        x_label: Some("Response".to_string()),
        y_label: Some("Proportion".to_string()),
        bar_mode: Some(bar_mode(summary)),
        series: response_series(&enriched.rows, |r| r.proportion.unwrap_or(0.0)),
        box_stats: None,
    }
}

/// Box chart of the numeric answers to a rating question.
///
/// The question is resolved like for [crate::response_summary]. Answers that are
/// missing or not numeric are ignored.
pub fn rating_distribution(table: &Table, question_id: &str) -> ChartSpec {
    let values: Vec<f64> = match resolve_column(table, question_id)
        .column()
        .and_then(|c| table.column_index(c))
    {
        Some(idx) => table.column_values(idx).filter_map(Cell::as_number).collect(),
        None => Vec::new(),
    };
    debug!(
        "rating_distribution: {:?}: {} numeric values",
        question_id,
        values.len()
    );
    ChartSpec {
        kind: ChartKind::Box,
        title: format!("Distribution of Ratings for {}", question_id),
        x_label: None,
        y_label: Some(question_id.to_string()),
        bar_mode: None,
        series: Vec::new(),
        box_stats: box_stats(&values),
    }
}

// Linear interpolation between the closest ranks. `sorted` must not be empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// None if there are no values.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = sorted
        .iter()
        .cloned()
        .filter(|x| *x >= low_fence && *x <= high_fence)
        .collect();
    let outliers: Vec<f64> = sorted
        .iter()
        .cloned()
        .filter(|x| *x < low_fence || *x > high_fence)
        .collect();
    // The quartiles are always inside the fences, so `inside` is never empty.
    let min = inside.first().cloned().unwrap_or(q1);
    let max = inside.last().cloned().unwrap_or(q3);
    Some(BoxStats {
        count: sorted.len(),
        min,
        q1,
        median,
        q3,
        max,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::{demographic_summary, response_summary};

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let names: Vec<String> = columns.iter().map(|s| s.to_string()).collect();
        let mut builder = Builder::new(&names).unwrap();
        for row in rows {
            builder.add_row_simple(row).unwrap();
        }
        builder.build()
    }

    fn survey() -> Table {
        table(
            &["major", "gender", "Q36_discrimination", "Q24_1"],
            &[
                &["CS", "Male", "Yes", "6"],
                &["CS", "Female", "No", "5"],
                &["Math", "Female", "Yes", "2"],
                &["Math", "", "", "7"],
                &["CS", "Non-binary", "No Response", "1"],
                &["Data Science", "Female", "Yes", "20"],
            ],
        )
    }

    #[test]
    fn demographic_charts() {
        let s = demographic_summary(&survey(), "gender");
        let bar = demographic_bar(&s, "Gender");
        assert_eq!(bar.kind, ChartKind::Bar);
        assert_eq!(bar.title, "Gender Distribution");
        assert_eq!(bar.x_label.as_deref(), Some("Gender"));
        assert_eq!(bar.y_label.as_deref(), Some("Count"));
        assert_eq!(bar.series.len(), 1);
        assert_eq!(bar.series[0].labels, vec!["Female", "Male", "Non-binary"]);
        assert_eq!(bar.series[0].values, vec![3.0, 1.0, 1.0]);

        let pie = demographic_pie(&s, "Gender");
        assert_eq!(pie.kind, ChartKind::Pie);
        assert_eq!(pie.series, bar.series);
        assert!(pie.bar_mode.is_none());
    }

    #[test]
    fn ungrouped_response_charts() {
        let s = response_summary(&survey(), "Q36", None);
        let counts = response_counts(&s);
        assert_eq!(counts.title, "Responses for Q36");
        assert_eq!(counts.bar_mode, Some(BarMode::Single));
        assert_eq!(counts.series[0].labels, vec!["Yes", "No"]);
        assert_eq!(counts.series[0].values, vec![3.0, 1.0]);

        let props = response_proportions(&s);
        assert_eq!(props.title, "Proportion of Responses for Q36");
        assert_eq!(props.y_label.as_deref(), Some("Proportion"));
        assert_eq!(props.series[0].values, vec![0.75, 0.25]);
        // The summary itself is not enriched.
        assert!(s.rows.iter().all(|r| r.proportion.is_none()));
    }

    #[test]
    fn grouped_response_charts() {
        let s = response_summary(&survey(), "Q36", Some("major"));
        let counts = response_counts(&s);
        assert_eq!(counts.title, "Responses for Q36 by major");
        assert_eq!(counts.bar_mode, Some(BarMode::Grouped));
        let names: Vec<Option<&str>> = counts.series.iter().map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec![Some("CS"), Some("Math"), Some("Data Science")]);
        assert_eq!(counts.series[0].labels, vec!["Yes", "No"]);

        let props = response_proportions(&s);
        assert_eq!(props.series[0].values, vec![0.5, 0.5]);
        assert_eq!(props.series[1].values, vec![1.0]);
        assert_eq!(props.series[2].values, vec![1.0]);
    }

    #[test]
    fn empty_summary_gives_empty_chart() {
        let s = response_summary(&survey(), "Q99", None);
        assert!(response_counts(&s).is_empty());
        assert!(response_proportions(&s).is_empty());
    }

    #[test]
    fn rating_box() {
        let chart = rating_distribution(&survey(), "Q24_1");
        assert_eq!(chart.kind, ChartKind::Box);
        assert_eq!(chart.title, "Distribution of Ratings for Q24_1");
        let stats = chart.box_stats.unwrap();
        assert_eq!(stats.count, 6);
        assert_eq!(stats.q1, 2.75);
        assert_eq!(stats.median, 5.5);
        assert_eq!(stats.q3, 6.75);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 7.0);
        assert_eq!(stats.outliers, vec![20.0]);
    }

    #[test]
    fn rating_box_without_numbers() {
        let chart = rating_distribution(&survey(), "Q36");
        assert!(chart.box_stats.is_none());
        assert!(chart.is_empty());
    }

    #[test]
    fn box_stats_single_value() {
        let stats = box_stats(&[4.0]).unwrap();
        assert_eq!((stats.min, stats.q1, stats.median, stats.q3, stats.max), (4.0, 4.0, 4.0, 4.0, 4.0));
        assert!(stats.outliers.is_empty());
        assert!(box_stats(&[]).is_none());
    }
}
