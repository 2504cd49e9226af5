//! Top-N extraction over a single nutrient.

use clap::ValueEnum;
use serde::Serialize;

use crate::{
    data::{Dataset, Record},
    error::Result,
    schema::NumericColumn,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum Order {
    /// Largest values first.
    Highest,
    /// Smallest values first.
    Lowest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord {
    /// Zero-based position in the source dataset.
    pub row: usize,
    pub value: f64,
    pub record: Record,
}

/// The `n` records with the most extreme `column` values. Ties keep row order;
/// `n` beyond the dataset size returns every row.
pub fn top_n(
    dataset: &Dataset,
    column: NumericColumn,
    n: usize,
    order: Order,
) -> Result<Vec<RankedRecord>> {
    dataset.require_imputed("top-n")?;
    let mut ranked = dataset
        .records()
        .iter()
        .enumerate()
        .map(|(row, record)| (row, record.value(column).unwrap_or_default()))
        .collect::<Vec<_>>();
    match order {
        Order::Highest => ranked.sort_by(|a, b| b.1.total_cmp(&a.1)),
        Order::Lowest => ranked.sort_by(|a, b| a.1.total_cmp(&b.1)),
    }
    Ok(ranked
        .into_iter()
        .take(n)
        .map(|(row, value)| RankedRecord {
            row,
            value,
            record: dataset.records()[row].clone(),
        })
        .collect())
}

pub fn render_rows(ranked: &[RankedRecord], precision: usize) -> Vec<Vec<String>> {
    ranked
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            vec![
                (position + 1).to_string(),
                entry.record.restaurant.clone().unwrap_or_default(),
                entry.record.item.clone().unwrap_or_default(),
                format!("{:.precision$}", entry.value),
            ]
        })
        .collect()
}
