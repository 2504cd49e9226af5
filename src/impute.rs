//! Mean imputation of missing numeric cells.
//!
//! Fill values are computed from a snapshot of the non-missing values before
//! any cell is replaced, so the outcome does not depend on fill order and a
//! second pass over the result changes nothing.

use log::info;
use serde::Serialize;

use crate::{
    data::Dataset,
    error::{NutritionError, Result},
    schema::{Column, NumericColumn},
};

/// One column's fill: the mean written into its gaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnFill {
    pub column: NumericColumn,
    pub filled: usize,
    pub value: f64,
}

/// Columns touched by an imputation pass, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImputationSummary {
    pub fills: Vec<ColumnFill>,
}

impl ImputationSummary {
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    pub fn cells_filled(&self) -> usize {
        self.fills.iter().map(|fill| fill.filled).sum()
    }

    pub fn render_rows(&self, precision: usize) -> Vec<Vec<String>> {
        self.fills
            .iter()
            .map(|fill| {
                vec![
                    fill.column.name().to_string(),
                    fill.filled.to_string(),
                    format!("{:.precision$}", fill.value),
                ]
            })
            .collect()
    }
}

/// Returns a copy of `dataset` with every missing numeric cell replaced by its
/// column mean. The input is left untouched on success and on failure.
pub fn impute(dataset: &Dataset) -> Result<Dataset> {
    impute_with_summary(dataset).map(|(imputed, _)| imputed)
}

pub fn impute_with_summary(dataset: &Dataset) -> Result<(Dataset, ImputationSummary)> {
    dataset.require_categorical()?;

    let plan = plan_fills(dataset)?;
    if plan.is_empty() {
        return Ok((dataset.clone(), ImputationSummary::default()));
    }

    let mut records = dataset.records().to_vec();
    for fill in &plan.fills {
        for record in records.iter_mut() {
            if record.value(fill.column).is_none() {
                record.set_value(fill.column, Some(fill.value));
            }
        }
        info!(
            "Filled {} missing value(s) in '{}' with mean {}",
            fill.filled,
            fill.column.name(),
            fill.value
        );
    }
    Ok((Dataset::new(records), plan))
}

/// Computes every fill value from the untouched dataset.
fn plan_fills(dataset: &Dataset) -> Result<ImputationSummary> {
    let mut fills = Vec::new();
    for column in NumericColumn::ALL {
        let missing = dataset.missing_count(Column::Numeric(column));
        if missing == 0 {
            continue;
        }
        let value = present_mean(dataset, column)?;
        fills.push(ColumnFill {
            column,
            filled: missing,
            value,
        });
    }
    Ok(ImputationSummary { fills })
}

fn present_mean(dataset: &Dataset, column: NumericColumn) -> Result<f64> {
    let present = dataset.column_values(column);
    if present.is_empty() {
        return Err(NutritionError::insufficient(
            column.name(),
            "no non-missing values to compute a mean from",
        ));
    }
    Ok(present.iter().sum::<f64>() / present.len() as f64)
}
