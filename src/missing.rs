//! Missing-value report, the diagnostic shown before cleaning.

use serde::Serialize;

use crate::{data::Dataset, schema::Column};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingEntry {
    pub column: &'static str,
    pub count: usize,
    pub percent: f64,
}

/// Per-column missing counts, largest first. Ties keep schema order.
pub fn missings(dataset: &Dataset) -> Vec<MissingEntry> {
    let total = dataset.len();
    let mut entries = Column::all()
        .map(|column| {
            let count = dataset.missing_count(column);
            let percent = if total == 0 {
                0.0
            } else {
                (count as f64 / total as f64) * 100.0
            };
            MissingEntry {
                column: column.name(),
                count,
                percent,
            }
        })
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

pub fn render_rows(entries: &[MissingEntry], precision: usize) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|entry| {
            vec![
                entry.column.to_string(),
                entry.count.to_string(),
                format!("{:.precision$}%", entry.percent),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::Record, schema::NumericColumn};

    #[test]
    fn sorts_by_descending_count_with_schema_order_ties() {
        let dataset = Dataset::new(vec![
            Record::new("A", "x", "Other").with(NumericColumn::Protein, 1.0),
            Record::new("A", "y", "Other"),
        ]);
        let report = missings(&dataset);
        assert_eq!(report.len(), Column::COUNT);
        assert_eq!(report[0].column, "calories");
        assert_eq!(report[0].count, 2);
        assert_eq!(report[0].percent, 100.0);
        let protein = report.iter().find(|e| e.column == "protein").unwrap();
        assert_eq!(protein.count, 1);
        assert_eq!(protein.percent, 50.0);
        let tail = &report[report.len() - 3..];
        assert_eq!(
            tail.iter().map(|e| e.column).collect::<Vec<_>>(),
            vec!["restaurant", "item", "salad"]
        );
    }

    #[test]
    fn empty_dataset_reports_zero_percent() {
        let report = missings(&Dataset::default());
        assert!(report.iter().all(|e| e.count == 0 && e.percent == 0.0));
    }

    #[test]
    fn renders_percent_with_precision() {
        let entries = vec![MissingEntry {
            column: "vit_a",
            count: 214,
            percent: 41.553_398,
        }];
        assert_eq!(
            render_rows(&entries, 2),
            vec![vec!["vit_a".to_string(), "214".to_string(), "41.55%".to_string()]]
        );
    }
}
