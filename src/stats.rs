//! Distribution summaries for a single nutrient: the `describe` table, box plot
//! figures per restaurant, histogram bins, and the least-squares fit drawn over
//! scatter plots.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    correlation::{is_constant, pearson},
    data::{Dataset, format_number},
    error::{NutritionError, Result},
    schema::NumericColumn,
};

const WHISKER_IQR_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub column: NumericColumn,
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl Summary {
    pub fn render_rows(&self, precision: usize) -> Vec<Vec<String>> {
        let cell = |value: Option<f64>| {
            value
                .map(|v| format!("{v:.precision$}"))
                .unwrap_or_default()
        };
        vec![
            vec!["count".to_string(), self.count.to_string()],
            vec!["mean".to_string(), cell(self.mean)],
            vec!["std".to_string(), cell(self.std_dev)],
            vec!["min".to_string(), cell(self.min)],
            vec!["25%".to_string(), cell(self.q1)],
            vec!["50%".to_string(), cell(self.median)],
            vec!["75%".to_string(), cell(self.q3)],
            vec!["max".to_string(), cell(self.max)],
        ]
    }
}

struct ColumnStats {
    values: Vec<f64>,
    sum: f64,
}

impl ColumnStats {
    fn from_values(mut values: Vec<f64>) -> Self {
        values.sort_by(|a, b| a.total_cmp(b));
        let sum = values.iter().sum();
        Self { values, sum }
    }

    fn count(&self) -> usize {
        self.values.len()
    }

    fn mean(&self) -> Option<f64> {
        if self.count() > 0 {
            Some(self.sum / self.count() as f64)
        } else {
            None
        }
    }

    /// Sample standard deviation (n - 1 denominator), summed over deviations
    /// from the mean so a large offset does not swamp a small spread.
    fn std_dev(&self) -> Option<f64> {
        if self.count() < 2 {
            return None;
        }
        let mean = self.mean()?;
        let squares = self.values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
        Some((squares / (self.count() - 1) as f64).sqrt())
    }

    fn quantile(&self, q: f64) -> Option<f64> {
        quantile_sorted(&self.values, q)
    }

    fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }

    fn max(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Linear interpolation between the closest ranks of an ascending slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

pub fn describe(dataset: &Dataset, column: NumericColumn) -> Result<Summary> {
    dataset.require_imputed("describe")?;
    let stats = ColumnStats::from_values(dataset.column_values(column));
    Ok(Summary {
        column,
        count: stats.count(),
        mean: stats.mean(),
        std_dev: stats.std_dev(),
        min: stats.min(),
        q1: stats.quantile(0.25),
        median: stats.quantile(0.5),
        q3: stats.quantile(0.75),
        max: stats.max(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub restaurant: String,
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: usize,
}

impl BoxSummary {
    fn from_sorted(restaurant: String, sorted: &[f64]) -> Option<Self> {
        let q1 = quantile_sorted(sorted, 0.25)?;
        let median = quantile_sorted(sorted, 0.5)?;
        let q3 = quantile_sorted(sorted, 0.75)?;
        let reach = (q3 - q1) * WHISKER_IQR_FACTOR;
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);
        let inside = sorted
            .iter()
            .copied()
            .filter(|v| *v >= low_fence && *v <= high_fence)
            .collect::<Vec<_>>();
        Some(Self {
            restaurant,
            count: sorted.len(),
            lower_whisker: inside.first().copied().unwrap_or(q1),
            q1,
            median,
            q3,
            upper_whisker: inside.last().copied().unwrap_or(q3),
            outliers: sorted.len() - inside.len(),
        })
    }
}

/// Box plot figures of `column` per restaurant, sorted by restaurant name.
pub fn box_summary(dataset: &Dataset, column: NumericColumn) -> Result<Vec<BoxSummary>> {
    dataset.require_imputed("box summary")?;
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (row_idx, record) in dataset.records().iter().enumerate() {
        let restaurant = record
            .restaurant
            .as_deref()
            .ok_or_else(|| NutritionError::SchemaViolation {
                column: "restaurant".to_string(),
                row: row_idx + 1,
            })?;
        if let Some(value) = record.value(column) {
            groups.entry(restaurant).or_default().push(value);
        }
    }
    Ok(groups
        .into_iter()
        .filter_map(|(restaurant, mut values)| {
            values.sort_by(|a, b| a.total_cmp(b));
            BoxSummary::from_sorted(restaurant.to_string(), &values)
        })
        .collect())
}

pub fn render_box_rows(summaries: &[BoxSummary], precision: usize) -> Vec<Vec<String>> {
    summaries
        .iter()
        .map(|b| {
            vec![
                b.restaurant.clone(),
                b.count.to_string(),
                format!("{:.precision$}", b.lower_whisker),
                format!("{:.precision$}", b.q1),
                format!("{:.precision$}", b.median),
                format!("{:.precision$}", b.q3),
                format!("{:.precision$}", b.upper_whisker),
                b.outliers.to_string(),
            ]
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]`; the last bin includes `max`.
pub fn histogram(dataset: &Dataset, column: NumericColumn, bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(NutritionError::InvalidArgument(
            "histogram needs at least one bin".to_string(),
        ));
    }
    dataset.require_imputed("histogram")?;
    let values = dataset.column_values(column);
    let Some((min, max)) = values.iter().fold(None, |acc: Option<(f64, f64)>, v| match acc {
        Some((lo, hi)) => Some((lo.min(*v), hi.max(*v))),
        None => Some((*v, *v)),
    }) else {
        return Ok(Vec::new());
    };
    if max == min {
        return Ok(vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }]);
    }
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in &values {
        let slot = (((value - min) / width).floor() as usize).min(bins - 1);
        counts[slot] += 1;
    }
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + width * idx as f64,
            end: if idx + 1 == bins {
                max
            } else {
                min + width * (idx + 1) as f64
            },
            count,
        })
        .collect())
}

pub fn render_histogram_rows(
    bins: &[HistogramBin],
    precision: usize,
    bar_width: usize,
) -> Vec<Vec<String>> {
    let max = bins.iter().map(|b| b.count).max().unwrap_or_default() as f64;
    bins.iter()
        .map(|bin| {
            vec![
                format!("{:.precision$}", bin.start),
                format!("{:.precision$}", bin.end),
                bin.count.to_string(),
                crate::render::bar(bin.count as f64, max, bar_width),
            ]
        })
        .collect()
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearFit {
    pub x: NumericColumn,
    pub y: NumericColumn,
    pub slope: f64,
    pub intercept: f64,
    pub r: Option<f64>,
    pub count: usize,
}

impl LinearFit {
    pub fn render_row(&self, precision: usize) -> Vec<String> {
        vec![
            self.x.name().to_string(),
            self.y.name().to_string(),
            format!("{:.precision$}", self.slope),
            format!("{:.precision$}", self.intercept),
            self.r
                .map(|r| format!("{r:.precision$}"))
                .unwrap_or_else(|| "n/a".to_string()),
            format_number(self.count as f64),
        ]
    }
}

pub fn linear_fit(dataset: &Dataset, x: NumericColumn, y: NumericColumn) -> Result<LinearFit> {
    dataset.require_imputed("linear fit")?;
    let xs = dataset.column_values(x);
    let ys = dataset.column_values(y);
    let n = xs.len();
    if n == 0 {
        return Err(NutritionError::insufficient(x.name(), "no rows to fit"));
    }
    if is_constant(&xs) {
        return Err(NutritionError::insufficient(
            x.name(),
            "all values are equal, so no line can be fitted",
        ));
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (xv, yv) in xs.iter().zip(&ys) {
        sxy += (xv - mean_x) * (yv - mean_y);
        sxx += (xv - mean_x) * (xv - mean_x);
    }
    let slope = sxy / sxx;
    Ok(LinearFit {
        x,
        y,
        slope,
        intercept: mean_y - slope * mean_x,
        r: pearson(&xs, &ys),
        count: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn dataset(rows: &[(&str, f64, f64)]) -> Dataset {
        Dataset::new(
            rows.iter()
                .map(|(restaurant, calories, fat)| {
                    let mut record = Record::new(restaurant, "item", "Other");
                    for column in NumericColumn::ALL {
                        record.set_value(column, Some(1.0));
                    }
                    record.set_value(NumericColumn::Calories, Some(*calories));
                    record.set_value(NumericColumn::TotalFat, Some(*fat));
                    record
                })
                .collect(),
        )
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn describe_matches_sample_statistics() {
        let data = dataset(&[("A", 2.0, 0.0), ("A", 4.0, 0.0), ("B", 4.0, 0.0), ("B", 4.0, 0.0), ("C", 5.0, 0.0), ("C", 5.0, 0.0), ("C", 7.0, 0.0), ("C", 9.0, 0.0)]);
        let summary = describe(&data, NumericColumn::Calories).unwrap();
        assert_eq!(summary.count, 8);
        assert_eq!(summary.mean, Some(5.0));
        let std = summary.std_dev.unwrap();
        assert!((std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(summary.min, Some(2.0));
        assert_eq!(summary.median, Some(4.5));
        assert_eq!(summary.max, Some(9.0));
        assert_eq!(summary.render_rows(1)[1], vec!["mean", "5.0"]);
    }

    #[test]
    fn std_dev_survives_large_offset() {
        let data = dataset(&[("A", 1e9 + 1.0, 0.0), ("A", 1e9 + 2.0, 0.0), ("A", 1e9 + 3.0, 0.0)]);
        let summary = describe(&data, NumericColumn::Calories).unwrap();
        assert_eq!(summary.std_dev, Some(1.0));
    }

    #[test]
    fn single_value_has_no_std_dev() {
        let summary = describe(&dataset(&[("A", 3.0, 1.0)]), NumericColumn::Calories).unwrap();
        assert_eq!(summary.std_dev, None);
        assert_eq!(summary.q1, Some(3.0));
    }

    #[test]
    fn box_summary_flags_outliers() {
        let data = dataset(&[("A", 10.0, 0.0), ("A", 11.0, 0.0), ("A", 12.0, 0.0), ("A", 13.0, 0.0), ("A", 100.0, 0.0), ("B", 5.0, 0.0)]);
        let boxes = box_summary(&data, NumericColumn::Calories).unwrap();
        assert_eq!(boxes.len(), 2);
        let a = &boxes[0];
        assert_eq!(a.restaurant, "A");
        assert_eq!(a.median, 12.0);
        assert_eq!(a.outliers, 1);
        assert_eq!(a.upper_whisker, 13.0);
        assert_eq!(a.lower_whisker, 10.0);
        assert_eq!(boxes[1].count, 1);
        assert_eq!(boxes[1].outliers, 0);
    }

    #[test]
    fn histogram_closes_last_bin() {
        let data = dataset(&[("A", 0.0, 0.0), ("A", 5.0, 0.0), ("A", 9.9, 0.0), ("A", 10.0, 0.0)]);
        let bins = histogram(&data, NumericColumn::Calories, 2).unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 3);
        assert_eq!(bins[1].end, 10.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
    }

    #[test]
    fn histogram_handles_constant_column_and_zero_bins() {
        let data = dataset(&[("A", 3.0, 0.0), ("B", 3.0, 0.0)]);
        let bins = histogram(&data, NumericColumn::Calories, 5).unwrap();
        assert_eq!(bins, vec![HistogramBin { start: 3.0, end: 3.0, count: 2 }]);
        assert!(matches!(
            histogram(&data, NumericColumn::Calories, 0),
            Err(NutritionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn linear_fit_recovers_exact_line() {
        let data = dataset(&[("A", 100.0, 10.0), ("A", 190.0, 20.0), ("B", 280.0, 30.0)]);
        let fit = linear_fit(&data, NumericColumn::TotalFat, NumericColumn::Calories).unwrap();
        assert!((fit.slope - 9.0).abs() < 1e-12);
        assert!((fit.intercept - 10.0).abs() < 1e-9);
        assert_eq!(fit.r, Some(1.0));
    }

    #[test]
    fn linear_fit_needs_spread_in_x() {
        let data = dataset(&[("A", 100.0, 10.0), ("B", 200.0, 10.0)]);
        let err = linear_fit(&data, NumericColumn::TotalFat, NumericColumn::Calories).unwrap_err();
        assert!(matches!(err, NutritionError::InsufficientData { .. }));
        let inexact = dataset(&[("A", 100.0, 0.1), ("B", 200.0, 0.1), ("C", 300.0, 0.1)]);
        assert!(linear_fit(&inexact, NumericColumn::TotalFat, NumericColumn::Calories).is_err());
    }
}
