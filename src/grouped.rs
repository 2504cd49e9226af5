//! Per-restaurant averages of every nutrient.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    data::Dataset,
    error::{NutritionError, Result},
    schema::NumericColumn,
};

#[derive(Debug, Clone, PartialEq)]
struct GroupTotals {
    count: usize,
    sums: [f64; NumericColumn::COUNT],
}

impl GroupTotals {
    fn new() -> Self {
        Self {
            count: 0,
            sums: [0.0; NumericColumn::COUNT],
        }
    }

    fn mean(&self, column: NumericColumn) -> f64 {
        self.sums[column.index()] / self.count as f64
    }
}

/// Means keyed by restaurant name (sorted), nutrients in schema order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupedMeans {
    groups: BTreeMap<String, GroupTotals>,
}

impl GroupedMeans {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn restaurants(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn mean(&self, restaurant: &str, column: NumericColumn) -> Option<f64> {
        self.groups.get(restaurant).map(|group| group.mean(column))
    }

    pub fn item_count(&self, restaurant: &str) -> Option<usize> {
        self.groups.get(restaurant).map(|group| group.count)
    }

    /// One nutrient across restaurants, ascending by mean; equal means keep
    /// name order.
    pub fn ranked(&self, column: NumericColumn) -> Vec<(&str, f64)> {
        let mut values = self
            .groups
            .iter()
            .map(|(name, group)| (name.as_str(), group.mean(column)))
            .collect::<Vec<_>>();
        values.sort_by(|a, b| a.1.total_cmp(&b.1));
        values
    }

    pub fn render_rows(&self, columns: &[NumericColumn], precision: usize) -> Vec<Vec<String>> {
        self.groups
            .iter()
            .map(|(name, group)| {
                let mut row = Vec::with_capacity(columns.len() + 1);
                row.push(name.clone());
                row.extend(
                    columns
                        .iter()
                        .map(|column| format!("{:.precision$}", group.mean(*column))),
                );
                row
            })
            .collect()
    }
}

struct GroupRow<'a>(&'a GroupTotals);

impl Serialize for GroupRow<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(NumericColumn::COUNT))?;
        for column in NumericColumn::ALL {
            map.serialize_entry(column.name(), &self.0.mean(column))?;
        }
        map.end()
    }
}

impl Serialize for GroupedMeans {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (name, group) in &self.groups {
            map.serialize_entry(name, &GroupRow(group))?;
        }
        map.end()
    }
}

/// Requires an imputed dataset; a gap would silently bias the averages.
pub fn grouped_means(dataset: &Dataset) -> Result<GroupedMeans> {
    dataset.require_imputed("grouped means")?;
    let mut groups: BTreeMap<String, GroupTotals> = BTreeMap::new();
    for (row_idx, record) in dataset.records().iter().enumerate() {
        let restaurant = record
            .restaurant
            .as_deref()
            .ok_or_else(|| NutritionError::SchemaViolation {
                column: "restaurant".to_string(),
                row: row_idx + 1,
            })?;
        let group = groups
            .entry(restaurant.to_string())
            .or_insert_with(GroupTotals::new);
        group.count += 1;
        for column in NumericColumn::ALL {
            group.sums[column.index()] += record.value(column).unwrap_or_default();
        }
    }
    Ok(GroupedMeans { groups })
}
