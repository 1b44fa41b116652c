// Turning summaries and charts into JSON documents and plain text.

use std::fmt::Write;
use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;

use survey_report::chart::{BarMode, BoxStats, ChartKind, ChartSpec, Series};
use survey_report::{format_number, DemographicSummary, ResponseSummary};

use crate::dashboard::*;

// Width of the longest bar, in characters.
const BAR_WIDTH: f64 = 30.0;

fn kind_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Bar => "bar",
        ChartKind::Pie => "pie",
        ChartKind::Box => "box",
    }
}

fn bar_mode_name(mode: BarMode) -> &'static str {
    match mode {
        BarMode::Single => "single",
        BarMode::Grouped => "group",
    }
}

fn series_to_json(series: &Series) -> JSValue {
    let mut js = json!({
        "labels": series.labels,
        "values": series.values,
    });
    if let Some(name) = &series.name {
        js["name"] = json!(name);
    }
    js
}

fn box_to_json(stats: &BoxStats) -> JSValue {
    json!({
        "count": stats.count,
        "min": stats.min,
        "q1": stats.q1,
        "median": stats.median,
        "q3": stats.q3,
        "max": stats.max,
        "outliers": stats.outliers,
    })
}

pub fn chart_to_json(chart: &ChartSpec) -> JSValue {
    let series: Vec<JSValue> = chart.series.iter().map(series_to_json).collect();
    let mut js = json!({
        "kind": kind_name(chart.kind),
        "title": chart.title,
    });
    if let Some(x) = &chart.x_label {
        js["xLabel"] = json!(x);
    }
    if let Some(y) = &chart.y_label {
        js["yLabel"] = json!(y);
    }
    if let Some(mode) = chart.bar_mode {
        js["barMode"] = json!(bar_mode_name(mode));
    }
    if chart.kind == ChartKind::Box {
        js["box"] = chart.box_stats.as_ref().map(box_to_json).unwrap_or(JSValue::Null);
    } else {
        js["series"] = json!(series);
    }
    js
}

pub fn demographic_to_json(summary: &DemographicSummary) -> Vec<JSValue> {
    summary
        .rows
        .iter()
        .map(|r| json!({"category": r.category, "count": r.count}))
        .collect()
}

pub fn responses_to_json(summary: &ResponseSummary) -> Vec<JSValue> {
    summary
        .rows
        .iter()
        .map(|r| {
            let mut js = json!({"response": r.response, "count": r.count});
            if let Some(v) = &r.variable {
                js["variable"] = json!(v);
            }
            if let Some(p) = r.proportion {
                js["proportion"] = json!(p);
            }
            js
        })
        .collect()
}

fn format_value(x: f64) -> String {
    if x.fract() == 0.0 {
        format_number(x)
    } else {
        format!("{:.3}", x)
    }
}

/// Aligned plain-text table.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows.iter() {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };
    let mut out = String::new();
    let _ = writeln!(out, "{}", line(headers.to_vec()));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in rows.iter() {
        let _ = writeln!(out, "{}", line(row.iter().map(|s| s.as_str()).collect()));
    }
    out
}

pub fn render_demographic_table(summary: &DemographicSummary) -> String {
    let rows: Vec<Vec<String>> = summary
        .rows
        .iter()
        .map(|r| vec![r.category.clone(), r.count.to_string()])
        .collect();
    render_table(&[summary.column.as_str(), "count"], &rows)
}

pub fn render_response_table(summary: &ResponseSummary) -> String {
    match &summary.grouping {
        Some(g) => {
            let rows: Vec<Vec<String>> = summary
                .rows
                .iter()
                .map(|r| {
                    vec![
                        r.variable.clone().unwrap_or_default(),
                        r.response.clone(),
                        r.count.to_string(),
                    ]
                })
                .collect();
            render_table(&[g.as_str(), "response", "count"], &rows)
        }
        None => {
            let rows: Vec<Vec<String>> = summary
                .rows
                .iter()
                .map(|r| vec![r.response.clone(), r.count.to_string()])
                .collect();
            render_table(&["response", "count"], &rows)
        }
    }
}

fn render_bars(out: &mut String, chart: &ChartSpec) {
    let max = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().cloned())
        .fold(0.0_f64, f64::max);
    let label_width = chart
        .series
        .iter()
        .flat_map(|s| s.labels.iter().map(|l| l.chars().count()))
        .max()
        .unwrap_or(0);
    for s in chart.series.iter() {
        if let Some(name) = &s.name {
            let _ = writeln!(out, "[{}]", name);
        }
        for (label, value) in s.labels.iter().zip(s.values.iter()) {
            let len = if max > 0.0 {
                (value / max * BAR_WIDTH).round() as usize
            } else {
                0
            };
            let _ = writeln!(
                out,
                "  {:<width$} | {} {}",
                label,
                "#".repeat(len),
                format_value(*value),
                width = label_width
            );
        }
    }
}

fn render_pie(out: &mut String, chart: &ChartSpec) {
    for s in chart.series.iter() {
        let total: f64 = s.values.iter().sum();
        for (label, value) in s.labels.iter().zip(s.values.iter()) {
            let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            let _ = writeln!(out, "  {}: {} ({:.1}%)", label, format_value(*value), share);
        }
    }
}

fn render_box(out: &mut String, stats: &BoxStats) {
    let _ = writeln!(
        out,
        "  n {} | min {} | q1 {} | median {} | q3 {} | max {}",
        stats.count,
        format_value(stats.min),
        format_value(stats.q1),
        format_value(stats.median),
        format_value(stats.q3),
        format_value(stats.max)
    );
    if !stats.outliers.is_empty() {
        let outliers: Vec<String> = stats.outliers.iter().map(|x| format_value(*x)).collect();
        let _ = writeln!(out, "  outliers: {}", outliers.join(", "));
    }
}

/// A chart drawn with characters.
pub fn render_chart(chart: &ChartSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#### {}", chart.title);
    if let (Some(x), Some(y)) = (&chart.x_label, &chart.y_label) {
        let _ = writeln!(out, "({} / {})", x, y);
    }
    if chart.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return out;
    }
    match chart.kind {
        ChartKind::Bar => render_bars(&mut out, chart),
        ChartKind::Pie => render_pie(&mut out, chart),
        ChartKind::Box => {
            if let Some(stats) = &chart.box_stats {
                render_box(&mut out, stats);
            }
        }
    }
    out
}

/// Writes the JSON document to a file, or to the standard output for `stdout`.
pub fn write_document(out: &str, pretty_js: &str) -> BDashResult<()> {
    if out == "stdout" {
        println!("{}", pretty_js);
    } else {
        fs::write(out, pretty_js).context(WritingOutputSnafu { path: out })?;
        info!("write_document: page written to {:?}", out);
    }
    Ok(())
}
