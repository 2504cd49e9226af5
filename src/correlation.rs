//! Pearson correlation between every pair of nutrients.

use serde::Serialize;

use crate::{data::Dataset, error::Result, schema::NumericColumn};

/// Symmetric matrix over [`NumericColumn::ALL`]. `None` marks a pair where one
/// side has zero variance; the diagonal is always 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    pub values: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPair {
    pub left: NumericColumn,
    pub right: NumericColumn,
    pub r: f64,
}

impl CorrelationMatrix {
    pub fn get(&self, left: NumericColumn, right: NumericColumn) -> Option<f64> {
        self.values[left.index()][right.index()]
    }

    /// Pairs with |r| at or above `threshold`, each unordered pair once,
    /// strongest first.
    pub fn strong_pairs(&self, threshold: f64) -> Vec<CorrelationPair> {
        let mut pairs = Vec::new();
        for (i, left) in self.columns.iter().enumerate() {
            for (j, right) in self.columns.iter().enumerate().skip(i + 1) {
                if let Some(r) = self.values[i][j]
                    && r.abs() >= threshold
                {
                    pairs.push(CorrelationPair {
                        left: *left,
                        right: *right,
                        r,
                    });
                }
            }
        }
        pairs.sort_by(|a, b| b.r.abs().total_cmp(&a.r.abs()));
        pairs
    }

    pub fn render_rows(&self, precision: usize) -> Vec<Vec<String>> {
        self.columns
            .iter()
            .zip(&self.values)
            .map(|(column, row)| {
                let mut cells = Vec::with_capacity(row.len() + 1);
                cells.push(column.name().to_string());
                cells.extend(row.iter().map(|value| match value {
                    Some(r) => format!("{r:.precision$}"),
                    None => "n/a".to_string(),
                }));
                cells
            })
            .collect()
    }
}

pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix> {
    dataset.require_imputed("correlation matrix")?;
    let series = NumericColumn::ALL
        .iter()
        .map(|column| dataset.column_values(*column))
        .collect::<Vec<_>>();
    let size = NumericColumn::COUNT;
    let mut values = vec![vec![None; size]; size];
    for i in 0..size {
        values[i][i] = Some(1.0);
        for j in (i + 1)..size {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    Ok(CorrelationMatrix {
        columns: NumericColumn::ALL.to_vec(),
        values,
    })
}

/// Pearson's r over paired samples, clamped to [-1, 1]. Returns `None` when
/// either side has no variance or the slices are empty.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n == 0 || is_constant(&xs[..n]) || is_constant(&ys[..n]) {
        return None;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// True when every value equals the first. Checked on the raw values, since a
/// summed mean of a constant like 0.1 leaves rounding residue in the deviations.
pub fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}
