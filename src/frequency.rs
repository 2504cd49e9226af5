use std::collections::HashMap;

use serde::Serialize;

use crate::{
    data::Dataset,
    error::{NutritionError, Result},
    schema::Column,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    pub percent: f64,
}

/// Items per restaurant, smallest group first. Equal counts keep the order in
/// which the restaurants first appear.
pub fn category_counts(dataset: &Dataset) -> Result<Vec<CategoryCount>> {
    let mut counts = count_column(dataset, Column::Restaurant)?;
    counts.sort_by(|a, b| a.count.cmp(&b.count));
    Ok(counts)
}

/// Value counts of the salad indicator, largest first.
pub fn salad_counts(dataset: &Dataset) -> Result<Vec<CategoryCount>> {
    let mut counts = count_column(dataset, Column::Salad)?;
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(counts)
}

fn count_column(dataset: &Dataset, column: Column) -> Result<Vec<CategoryCount>> {
    let mut accumulator = FrequencyAccumulator::default();
    for (row_idx, record) in dataset.records().iter().enumerate() {
        let value = record
            .text(column)
            .ok_or_else(|| NutritionError::SchemaViolation {
                column: column.name().to_string(),
                row: row_idx + 1,
            })?;
        accumulator.ingest(value);
    }
    Ok(accumulator.into_counts())
}

#[derive(Default)]
struct FrequencyAccumulator {
    order: Vec<String>,
    counts: HashMap<String, usize>,
    total: usize,
}

impl FrequencyAccumulator {
    fn ingest(&mut self, value: &str) {
        self.total += 1;
        match self.counts.get_mut(value) {
            Some(count) => *count += 1,
            None => {
                self.order.push(value.to_string());
                self.counts.insert(value.to_string(), 1);
            }
        }
    }

    /// Counts in first-seen order.
    fn into_counts(self) -> Vec<CategoryCount> {
        let total = self.total;
        let counts = self.counts;
        self.order
            .into_iter()
            .map(|value| {
                let count = counts.get(&value).copied().unwrap_or_default();
                let percent = (count as f64 / total as f64) * 100.0;
                CategoryCount {
                    value,
                    count,
                    percent,
                }
            })
            .collect()
    }
}

pub fn render_rows(counts: &[CategoryCount], precision: usize, bar_width: usize) -> Vec<Vec<String>> {
    let max = counts.iter().map(|c| c.count).max().unwrap_or_default() as f64;
    counts
        .iter()
        .map(|entry| {
            vec![
                entry.value.clone(),
                entry.count.to_string(),
                format!("{:.precision$}%", entry.percent),
                crate::render::bar(entry.count as f64, max, bar_width),
            ]
        })
        .collect()
}
