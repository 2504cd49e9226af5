use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeMap};
use sha2::{Digest, Sha256};

use crate::{
    error::{NutritionError, Result},
    schema::{Column, ColumnKind, NumericColumn},
};

/// One menu item.
///
/// Categorical fields are optional so that a blank cell survives loading and
/// can be reported by the imputer; after imputation every field is present.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub restaurant: Option<String>,
    pub item: Option<String>,
    pub salad: Option<String>,
    nutrients: [Option<f64>; NumericColumn::COUNT],
}

impl Record {
    pub fn new(restaurant: &str, item: &str, salad: &str) -> Self {
        Self {
            restaurant: Some(restaurant.to_string()),
            item: Some(item.to_string()),
            salad: Some(salad.to_string()),
            nutrients: [None; NumericColumn::COUNT],
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            restaurant: None,
            item: None,
            salad: None,
            nutrients: [None; NumericColumn::COUNT],
        }
    }

    /// Builder-style setter used when assembling records by hand.
    pub fn with(mut self, column: NumericColumn, value: f64) -> Self {
        self.set_value(column, Some(value));
        self
    }

    pub fn value(&self, column: NumericColumn) -> Option<f64> {
        self.nutrients[column.index()]
    }

    pub fn set_value(&mut self, column: NumericColumn, value: Option<f64>) {
        self.nutrients[column.index()] = value;
    }

    pub fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::Restaurant => self.restaurant.as_deref(),
            Column::Item => self.item.as_deref(),
            Column::Salad => self.salad.as_deref(),
            Column::Numeric(_) => None,
        }
    }

    pub(crate) fn set_text(&mut self, column: Column, value: Option<String>) {
        match column {
            Column::Restaurant => self.restaurant = value,
            Column::Item => self.item = value,
            Column::Salad => self.salad = value,
            Column::Numeric(_) => {}
        }
    }

    pub fn is_missing(&self, column: Column) -> bool {
        match column {
            Column::Numeric(numeric) => self.value(numeric).is_none(),
            other => self.text(other).is_none(),
        }
    }

    /// Renders one cell the way the tabular preview shows it.
    pub fn display(&self, column: Column) -> String {
        match column {
            Column::Numeric(numeric) => self.value(numeric).map(format_number).unwrap_or_default(),
            other => self.text(other).unwrap_or_default().to_string(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Column::COUNT))?;
        for column in Column::all() {
            match column {
                Column::Numeric(numeric) => map.serialize_entry(column.name(), &self.value(numeric))?,
                other => map.serialize_entry(other.name(), &self.text(other))?,
            }
        }
        map.end()
    }
}

/// SHA-256 digest of a dataset's contents; stands in for a version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Ordered collection of records sharing the fixed schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn missing_count(&self, column: Column) -> usize {
        self.records
            .iter()
            .filter(|record| record.is_missing(column))
            .count()
    }

    /// True once no numeric cell is missing.
    pub fn is_imputed(&self) -> bool {
        NumericColumn::ALL
            .into_iter()
            .all(|column| self.missing_count(Column::Numeric(column)) == 0)
    }

    /// Fails with [`NutritionError::Precondition`] naming the first numeric
    /// column that still has gaps.
    pub fn require_imputed(&self, operation: &str) -> Result<()> {
        for column in NumericColumn::ALL {
            let missing = self.missing_count(Column::Numeric(column));
            if missing > 0 {
                return Err(NutritionError::Precondition {
                    operation: operation.to_string(),
                    column: column.name().to_string(),
                    missing,
                });
            }
        }
        Ok(())
    }

    /// Fails with [`NutritionError::SchemaViolation`] at the first blank
    /// categorical or indicator cell.
    pub fn require_categorical(&self) -> Result<()> {
        for (row_idx, record) in self.records.iter().enumerate() {
            for column in Column::all().filter(|c| c.kind() != ColumnKind::Numeric) {
                if record.is_missing(column) {
                    return Err(NutritionError::SchemaViolation {
                        column: column.name().to_string(),
                        row: row_idx + 1,
                    });
                }
            }
        }
        Ok(())
    }

    /// Values of a fully populated numeric column, in row order.
    ///
    /// Callers check [`Dataset::require_imputed`] first; any gap left here is
    /// skipped rather than guessed.
    pub fn column_values(&self, column: NumericColumn) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|record| record.value(column))
            .collect()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Sha256::new();
        hasher.update((self.records.len() as u64).to_le_bytes());
        for record in &self.records {
            for column in Column::all() {
                match column {
                    Column::Numeric(numeric) => match record.value(numeric) {
                        Some(value) => {
                            hasher.update([1u8]);
                            hasher.update(value.to_bits().to_le_bytes());
                        }
                        None => hasher.update([0u8]),
                    },
                    other => match record.text(other) {
                        Some(text) => {
                            hasher.update([1u8]);
                            hasher.update((text.len() as u64).to_le_bytes());
                            hasher.update(text.as_bytes());
                        }
                        None => hasher.update([0u8]),
                    },
                }
            }
        }
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Fingerprint(bytes)
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Record::new("Mcdonalds", "Big Mac", "Other").with(NumericColumn::Calories, 540.0),
            Record::new("Sonic", "Corn Dog", "Other"),
        ])
    }

    #[test]
    fn missing_count_tracks_numeric_and_text_cells() {
        let mut dataset = sample();
        assert_eq!(dataset.missing_count(Column::Numeric(NumericColumn::Calories)), 1);
        assert_eq!(dataset.missing_count(Column::Restaurant), 0);
        dataset.records[1].restaurant = None;
        assert_eq!(dataset.missing_count(Column::Restaurant), 1);
    }

    #[test]
    fn require_imputed_names_first_gap() {
        let err = sample().require_imputed("top-n").unwrap_err();
        match err {
            NutritionError::Precondition {
                operation,
                column,
                missing,
            } => {
                assert_eq!(operation, "top-n");
                assert_eq!(column, "calories");
                assert_eq!(missing, 1);
            }
            other => panic!("expected precondition error, got {other:?}"),
        }
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let original = sample();
        let mut changed = original.clone();
        changed.records[0].set_value(NumericColumn::Calories, Some(541.0));
        assert_eq!(original.fingerprint(), sample().fingerprint());
        assert_ne!(original.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn record_serializes_with_schema_names() {
        let record = Record::new("Arbys", "Roast Beef", "Other").with(NumericColumn::Sodium, 950.0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["restaurant"], "Arbys");
        assert_eq!(json["sodium"], 950.0);
        assert!(json["fiber"].is_null());
    }

    #[test]
    fn format_number_trims_whole_values() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(1.23456), "1.2346");
    }
}
