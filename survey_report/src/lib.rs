mod config;
pub mod builder;
pub mod catalog;
pub mod chart;
pub mod manual;

use log::{debug, info, warn};

use std::{collections::HashMap, hash::Hash};

pub use crate::config::*;

/// Placeholder substituted for missing answers. Rows carrying it are removed
/// from the response summaries.
pub const NO_RESPONSE: &str = "No Response";

/// The grouping token meaning that no grouping variable is selected.
pub const NO_GROUPING: &str = "none";

// **** Private structures ****

// Counts keys while remembering the order in which they were first seen.
struct OrderedCounter<K> {
    order: Vec<K>,
    counts: HashMap<K, u64>,
}

impl<K: Eq + Hash + Clone> OrderedCounter<K> {
    fn new() -> OrderedCounter<K> {
        OrderedCounter {
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }

    fn add(&mut self, key: K) {
        if let Some(c) = self.counts.get_mut(&key) {
            *c += 1;
        } else {
            self.order.push(key.clone());
            self.counts.insert(key, 1);
        }
    }

    /// By descending count. Ties keep the order of first appearance.
    fn into_sorted(self) -> Vec<(K, u64)> {
        let counts = self.counts;
        let mut res: Vec<(K, u64)> = self
            .order
            .into_iter()
            .map(|k| {
                let c = counts.get(&k).cloned().unwrap_or(0);
                (k, c)
            })
            .collect();
        // sort_by is stable.
        res.sort_by(|a, b| b.1.cmp(&a.1));
        res
    }
}

/// The columns whose name contains `question_id`, ignoring case, in table order.
pub fn matching_columns(table: &Table, question_id: &str) -> Vec<String> {
    let needle = question_id.to_lowercase();
    table
        .columns()
        .iter()
        .filter(|c| c.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Finds the column that holds the answers to a question.
///
/// An exact (case-sensitive) match on the column name is tried first. Otherwise
/// every column that contains `question_id`, ignoring case, is a candidate and
/// the first one in table order is used. Several candidates are reported as a
/// warning: the choice is then only decided by the column order of the file.
pub fn resolve_column(table: &Table, question_id: &str) -> ColumnResolution {
    if table.has_column(question_id) {
        debug!("resolve_column: exact match for {:?}", question_id);
        return ColumnResolution::Exact(question_id.to_string());
    }
    let candidates = matching_columns(table, question_id);
    match candidates.first() {
        None => {
            info!("resolve_column: no column matches {:?}", question_id);
            ColumnResolution::Unresolved
        }
        Some(first) => {
            if candidates.len() > 1 {
                warn!(
                    "resolve_column: {:?} matches {} columns {:?}, using {:?}",
                    question_id,
                    candidates.len(),
                    candidates,
                    first
                );
            } else {
                info!("resolve_column: {:?} resolved to {:?}", question_id, first);
            }
            ColumnResolution::Substring {
                column: first.clone(),
                candidates,
            }
        }
    }
}

/// Counts the distinct non-missing values of a demographic column.
///
/// An unknown column gives an empty summary.
pub fn demographic_summary(table: &Table, column: &str) -> DemographicSummary {
    let mut counter: OrderedCounter<String> = OrderedCounter::new();
    if let Some(idx) = table.column_index(column) {
        for label in table.column_values(idx).filter_map(Cell::label) {
            counter.add(label);
        }
    } else {
        info!("demographic_summary: no column {:?}", column);
    }
    let rows: Vec<CategoryCount> = counter
        .into_sorted()
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    debug!("demographic_summary: {:?}: {:?}", column, rows);
    DemographicSummary {
        column: column.to_string(),
        rows,
    }
}

fn response_label(cell: &Cell) -> String {
    cell.label().unwrap_or_else(|| NO_RESPONSE.to_string())
}

/// Tallies the answers to a question, optionally broken down by a grouping column.
///
/// Arguments:
/// * `table` the survey responses
/// * `question_id` a question identifier, resolved with [resolve_column]
/// * `grouping` the column to group by. `None` and [NO_GROUPING] mean no grouping. A
/// column that does not exist in the table is ignored and the answers are not grouped.
///
/// Missing answers are never reported. Rows of a grouped summary with a missing
/// grouping value are not counted. The rows come by descending count over the
/// whole summary. Proportions are not filled, see [with_proportions].
pub fn response_summary(
    table: &Table,
    question_id: &str,
    grouping: Option<&str>,
) -> ResponseSummary {
    let resolution = resolve_column(table, question_id);
    let grouping_idx: Option<(&str, usize)> = match grouping {
        None => None,
        Some(g) if g == NO_GROUPING => None,
        Some(g) => match table.column_index(g) {
            Some(idx) => Some((g, idx)),
            None => {
                warn!(
                    "response_summary: grouping column {:?} not found, answers are not grouped",
                    g
                );
                None
            }
        },
    };

    let mut summary = ResponseSummary {
        question: question_id.to_string(),
        resolution: resolution.clone(),
        grouping: grouping_idx.map(|(g, _)| g.to_string()),
        rows: Vec::new(),
    };

    let col_idx = match resolution.column().and_then(|c| table.column_index(c)) {
        Some(idx) => idx,
        None => return summary,
    };

    summary.rows = match grouping_idx {
        None => {
            let mut counter: OrderedCounter<String> = OrderedCounter::new();
            for cell in table.column_values(col_idx) {
                let response = response_label(cell);
                if response != NO_RESPONSE {
                    counter.add(response);
                }
            }
            counter
                .into_sorted()
                .into_iter()
                .map(|(response, count)| ResponseRow {
                    variable: None,
                    response,
                    count,
                    proportion: None,
                })
                .collect()
        }
        Some((_, g_idx)) => {
            let mut counter: OrderedCounter<(String, String)> = OrderedCounter::new();
            for row in table.rows() {
                let variable = match row[g_idx].label() {
                    Some(v) => v,
                    None => continue,
                };
                let response = response_label(&row[col_idx]);
                if response != NO_RESPONSE {
                    counter.add((variable, response));
                }
            }
            counter
                .into_sorted()
                .into_iter()
                .map(|((variable, response), count)| ResponseRow {
                    variable: Some(variable),
                    response,
                    count,
                    proportion: None,
                })
                .collect()
        }
    };
    debug!(
        "response_summary: {:?} ({:?}) grouping {:?}: {} rows",
        question_id,
        summary.resolution,
        summary.grouping,
        summary.rows.len()
    );
    summary
}

/// Returns a copy of the summary with the proportion of every row filled in.
///
/// The denominator is the total count of the summary, or for grouped summaries
/// the total count of the rows sharing the same variable value.
pub fn with_proportions(summary: &ResponseSummary) -> ResponseSummary {
    let mut totals: HashMap<Option<&str>, u64> = HashMap::new();
    for r in summary.rows.iter() {
        *totals.entry(r.variable.as_deref()).or_insert(0) += r.count;
    }
    let rows: Vec<ResponseRow> = summary
        .rows
        .iter()
        .map(|r| {
            let total = totals.get(&r.variable.as_deref()).cloned().unwrap_or(0);
            let proportion = if total == 0 {
                0.0
            } else {
                r.count as f64 / total as f64
            };
            ResponseRow {
                proportion: Some(proportion),
                ..r.clone()
            }
        })
        .collect();
    ResponseSummary {
        rows,
        ..summary.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::builder::Builder;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let names: Vec<String> = columns.iter().map(|s| s.to_string()).collect();
        let mut builder = Builder::new(&names).unwrap();
        for row in rows {
            builder.add_row_simple(row).unwrap();
        }
        builder.build()
    }

    fn sorted_by_count<T>(rows: &[T], count: impl Fn(&T) -> u64) -> bool {
        rows.windows(2).all(|w| count(&w[0]) >= count(&w[1]))
    }

    fn pairs(summary: &ResponseSummary) -> Vec<(Option<&str>, &str, u64)> {
        summary
            .rows
            .iter()
            .map(|r| (r.variable.as_deref(), r.response.as_str(), r.count))
            .collect()
    }

    #[test]
    fn demographic_counts_skip_missing() {
        init();
        let t = table(&["gender"], &[&["Male"], &["Female"], &["Female"], &[""]]);
        let s = demographic_summary(&t, "gender");
        assert_eq!(
            s.rows,
            vec![
                CategoryCount {
                    category: "Female".to_string(),
                    count: 2
                },
                CategoryCount {
                    category: "Male".to_string(),
                    count: 1
                }
            ]
        );
        assert_eq!(s.total(), 3);
    }

    #[test]
    fn demographic_ties_keep_first_seen_order() {
        let t = table(
            &["race"],
            &[&["White"], &["Asian"], &["Black"], &["Asian"], &["Black"], &["NA"]],
        );
        let s = demographic_summary(&t, "race");
        let names: Vec<&str> = s.rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["Asian", "Black", "White"]);
        assert!(sorted_by_count(&s.rows, |r| r.count));
    }

    #[test]
    fn demographic_unknown_column_is_empty() {
        let t = table(&["gender"], &[&["Male"]]);
        let s = demographic_summary(&t, "major");
        assert!(s.is_empty());
        assert_eq!(s.column, "major");
    }

    #[test]
    fn demographic_total_matches_non_missing() {
        let t = table(
            &["major", "Q1"],
            &[&["CS", "1"], &["", "2"], &["Math", ""], &["CS", "3"], &["n/a", "4"]],
        );
        let s = demographic_summary(&t, "major");
        let non_missing = t.column_values(0).filter(|c| !c.is_missing()).count() as u64;
        assert_eq!(s.total(), non_missing);
        assert_eq!(s.total(), 3);
    }

    #[test]
    fn numeric_categories_are_labelled_without_fraction() {
        let t = table(&["prep"], &[&["1"], &["1.0"], &["2.5"]]);
        let s = demographic_summary(&t, "prep");
        assert_eq!(s.rows[0].category, "1");
        assert_eq!(s.rows[0].count, 2);
        assert_eq!(s.rows[1].category, "2.5");
    }

    #[test]
    fn resolve_exact_before_substring() {
        let t = table(&["Q24_12", "Q24_1"], &[]);
        assert_eq!(
            resolve_column(&t, "Q24_1"),
            ColumnResolution::Exact("Q24_1".to_string())
        );
    }

    #[test]
    fn resolve_substring_ignores_case() {
        let t = table(&["id", "q36_Discrimination"], &[]);
        let r = resolve_column(&t, "Q36");
        assert_eq!(r.column(), Some("q36_Discrimination"));
        assert!(!r.is_ambiguous());
    }

    #[test]
    fn resolve_reports_ambiguity_and_uses_first_column() {
        let t = table(&["Q38_text", "Q36_text", "Q36_discrimination"], &[]);
        let r = resolve_column(&t, "Q36");
        assert!(r.is_ambiguous());
        assert_eq!(
            r,
            ColumnResolution::Substring {
                column: "Q36_text".to_string(),
                candidates: vec!["Q36_text".to_string(), "Q36_discrimination".to_string()]
            }
        );
    }

    #[test]
    fn matching_columns_include_exact_match() {
        let t = table(&["Q24_1", "gender", "q24_13"], &[]);
        assert_eq!(matching_columns(&t, "Q24_1"), vec!["Q24_1", "q24_13"]);
        assert!(matching_columns(&t, "Q38").is_empty());
    }

    #[test]
    fn resolve_unknown_question() {
        let t = table(&["gender"], &[]);
        assert_eq!(resolve_column(&t, "Q99"), ColumnResolution::Unresolved);
    }

    #[test]
    fn responses_substring_match_and_missing_dropped() {
        init();
        let t = table(
            &["Q36_discrimination"],
            &[&["Yes"], &["No"], &["Yes"], &[""]],
        );
        let s = response_summary(&t, "Q36", None);
        assert_eq!(pairs(&s), vec![(None, "Yes", 2), (None, "No", 1)]);
        assert!(!s.is_grouped());
    }

    #[test]
    fn responses_drop_literal_placeholder() {
        let t = table(&["Q38"], &[&["No Response"], &["Yes"], &["no response"]]);
        let s = response_summary(&t, "Q38", None);
        assert_eq!(pairs(&s), vec![(None, "Yes", 1), (None, "no response", 1)]);
    }

    #[test]
    fn responses_unresolved_question_is_empty() {
        let t = table(&["gender"], &[&["Male"]]);
        let s = response_summary(&t, "Q11_1", Some("gender"));
        assert!(s.is_empty());
        assert_eq!(s.resolution, ColumnResolution::Unresolved);
    }

    #[test]
    fn responses_all_missing_is_empty() {
        let t = table(&["id", "Q11_1"], &[&["1", ""], &["2", "NA"]]);
        let s = response_summary(&t, "Q11_1", None);
        assert!(s.is_empty());
        assert_eq!(s.resolution.column(), Some("Q11_1"));
    }

    #[test]
    fn responses_grouped_by_major() {
        let t = table(
            &["major", "Q36_discrimination"],
            &[&["CS", "Yes"], &["CS", "No"], &["Math", "Yes"], &["Math", ""]],
        );
        let s = response_summary(&t, "Q36", Some("major"));
        assert!(s.is_grouped());
        assert_eq!(
            pairs(&s),
            vec![
                (Some("CS"), "Yes", 1),
                (Some("CS"), "No", 1),
                (Some("Math"), "Yes", 1)
            ]
        );
        let p = with_proportions(&s);
        let props: Vec<f64> = p.rows.iter().map(|r| r.proportion.unwrap()).collect();
        assert_eq!(props, vec![0.5, 0.5, 1.0]);
    }

    #[test]
    fn responses_grouped_sorted_over_whole_summary() {
        let t = table(
            &["gender", "Q28_2"],
            &[
                &["Male", "Agree"],
                &["Female", "Disagree"],
                &["Female", "Disagree"],
                &["Female", "Disagree"],
                &["Male", "Agree"],
                &["", "Agree"],
                &["Female", "Agree"],
            ],
        );
        let s = response_summary(&t, "Q28_2", Some("gender"));
        assert_eq!(
            pairs(&s),
            vec![
                (Some("Female"), "Disagree", 3),
                (Some("Male"), "Agree", 2),
                (Some("Female"), "Agree", 1)
            ]
        );
        assert!(sorted_by_count(&s.rows, |r| r.count));
    }

    #[test]
    fn responses_none_sentinel_and_unknown_grouping_are_ungrouped() {
        let t = table(&["gender", "Q36"], &[&["Male", "Yes"], &["Female", "Yes"]]);
        for g in [Some(NO_GROUPING), Some("work_status"), None] {
            let s = response_summary(&t, "Q36", g);
            assert!(!s.is_grouped());
            assert_eq!(pairs(&s), vec![(None, "Yes", 2)]);
        }
    }

    #[test]
    fn proportions_sum_to_one() {
        let t = table(
            &["Q11_1"],
            &[
                &["Extremely satisfied"],
                &["Somewhat satisfied"],
                &["Extremely satisfied"],
                &["Did not take"],
                &[""],
                &["Somewhat satisfied"],
                &["Extremely satisfied"],
            ],
        );
        let s = with_proportions(&response_summary(&t, "Q11_1", None));
        let sum: f64 = s.rows.iter().filter_map(|r| r.proportion).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(s
            .rows
            .iter()
            .all(|r| (0.0..=1.0).contains(&r.proportion.unwrap())));
    }

    #[test]
    fn grouped_proportions_sum_to_one_per_group() {
        let t = table(
            &["international", "Q33_1"],
            &[
                &["Yes", "Agree"],
                &["No", "Agree"],
                &["No", "Disagree"],
                &["Yes", "Strongly agree"],
                &["No", "Agree"],
                &["Yes", "Agree"],
            ],
        );
        let s = with_proportions(&response_summary(&t, "Q33_1", Some("international")));
        let mut sums: HashMap<String, f64> = HashMap::new();
        for r in s.rows.iter() {
            *sums.entry(r.variable.clone().unwrap()).or_insert(0.0) += r.proportion.unwrap();
        }
        assert_eq!(sums.len(), 2);
        for total in sums.values() {
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn proportions_leave_input_untouched() {
        let t = table(&["Q36"], &[&["Yes"], &["No"]]);
        let s = response_summary(&t, "Q36", None);
        let p = with_proportions(&s);
        assert!(s.rows.iter().all(|r| r.proportion.is_none()));
        assert!(p.rows.iter().all(|r| r.proportion == Some(0.5)));
    }
}
